//! HTML rendering. View models flatten the forest and board state into what
//! the templates need; templates are compiled into the binary.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use minijinja::Environment;
use serde::Serialize;

use crate::errors::AppError;
use crate::forms::{EmployeeForm, FieldErrors, FormMode, TeamForm};
use crate::models::team::Team;
use crate::roster::{Forest, TeamNode};
use crate::ui::{Banner, BoardState};

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("board.html", include_str!("../../templates/board.html"))?;
        env.add_template("team_form.html", include_str!("../../templates/team_form.html"))?;
        env.add_template("employee_form.html", include_str!("../../templates/employee_form.html"))?;
        Ok(Templates { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, AppError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}

/// `1. 6. 2024`, or `N/A` when unset.
pub fn display_date(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%-d. %-m. %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Whole seconds for page hints such as `<meta http-equiv="refresh">`,
/// rounded up.
pub fn whole_secs(remaining: Duration) -> i64 {
    (remaining.num_milliseconds().max(0) + 999) / 1000
}

pub fn employee_chip(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 zamestnanec".to_string()),
        n => Some(format!("{} zamestnanci", n)),
    }
}

pub fn subteam_chip(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 tím".to_string()),
        n => Some(format!("{} tímy", n)),
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeView {
    pub id: String,
    pub full_name: String,
    pub position: String,
    pub created: String,
    pub start: String,
    pub end: Option<String>,
    pub former: bool,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub expanded: bool,
    pub employees_expanded: bool,
    pub employee_chip: Option<String>,
    pub subteam_chip: Option<String>,
    pub delete_pending: bool,
    pub employees: Vec<EmployeeView>,
    pub children: Vec<TeamView>,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub banner: Option<Banner>,
    pub edit_mode: bool,
    pub selected_count: usize,
    pub bulk_delete_pending: bool,
    pub cycle_breaks: Vec<String>,
    pub teams: Vec<TeamView>,
}

/// Board-wide inputs for [`board_view`] besides the forest itself.
pub struct BoardContext<'a> {
    pub board: &'a BoardState,
    pub banner: Option<Banner>,
    pub selected_count: usize,
    pub pending_team_deletes: &'a HashSet<String>,
    pub bulk_delete_pending: bool,
    pub now: DateTime<Utc>,
}

fn team_view(node: &TeamNode, ctx: &BoardContext<'_>) -> TeamView {
    TeamView {
        id: node.team.id.clone(),
        name: node.team.name.clone(),
        expanded: ctx.board.is_team_expanded(node.id()),
        employees_expanded: ctx.board.employees_expanded(node.id()),
        employee_chip: employee_chip(node.employees.len()),
        subteam_chip: subteam_chip(node.children.len()),
        delete_pending: ctx.pending_team_deletes.contains(node.id()),
        employees: node
            .employees
            .iter()
            .map(|employee| EmployeeView {
                id: employee.id.clone(),
                full_name: employee.full_name(),
                position: employee.position.clone(),
                created: display_date(Some(employee.created_at)),
                start: display_date(employee.start_date),
                end: employee.end_date.map(|end| display_date(Some(end))),
                former: employee.is_former_at(ctx.now),
                selected: ctx.board.is_selected(&employee.id),
            })
            .collect(),
        children: node.children.iter().map(|child| team_view(child, ctx)).collect(),
    }
}

pub fn board_view(forest: &Forest, ctx: BoardContext<'_>) -> BoardView {
    BoardView {
        edit_mode: ctx.board.is_edit_mode(),
        selected_count: ctx.selected_count,
        bulk_delete_pending: ctx.bulk_delete_pending,
        cycle_breaks: forest.cycle_breaks.clone(),
        teams: forest.roots.iter().map(|root| team_view(root, &ctx)).collect(),
        banner: ctx.banner,
    }
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Select options with a leading "Žiadny" (none) entry. Teams in `exclude`
/// are left out.
pub fn team_options(teams: &[Team], current: &str, exclude: &HashSet<String>) -> Vec<OptionView> {
    let mut options = vec![OptionView {
        value: String::new(),
        label: "Žiadny".to_string(),
        selected: current.is_empty(),
    }];
    options.extend(
        teams
            .iter()
            .filter(|team| !exclude.contains(&team.id))
            .map(|team| OptionView {
                value: team.id.clone(),
                label: team.name.clone(),
                selected: team.id == current,
            }),
    );
    options
}

/// Where a form posts and how it is titled.
#[derive(Debug, Serialize)]
pub struct FormChrome {
    pub edit: bool,
    pub collection: &'static str,
    pub id: Option<String>,
    pub banner: Option<Banner>,
    pub submitting: bool,
    /// Reload the page after this many seconds to pick up the end of the
    /// banner window.
    pub refresh_secs: Option<i64>,
    /// Hide the banner after this many seconds without reloading, so the
    /// submitted input stays on the page.
    pub banner_secs: Option<i64>,
}

impl FormChrome {
    pub fn new(mode: &FormMode, collection: &'static str) -> Self {
        let id = match mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id.clone()),
        };
        FormChrome {
            edit: mode.is_edit(),
            collection,
            id,
            banner: None,
            submitting: false,
            refresh_secs: None,
            banner_secs: None,
        }
    }

    pub fn flash(&mut self, banner: Banner, window: Duration) {
        self.banner = Some(banner);
        self.banner_secs = Some(whole_secs(window));
    }
}

#[derive(Debug, Serialize)]
pub struct TeamFormView<'a> {
    pub chrome: FormChrome,
    pub form: &'a TeamForm,
    pub errors: &'a FieldErrors,
    pub parents: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeFormView<'a> {
    pub chrome: FormChrome,
    pub form: &'a EmployeeForm,
    pub errors: &'a FieldErrors,
    pub teams: Vec<OptionView>,
}
