use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use super::transient::{Banner, Transient};
use crate::models::employee::Employee;
use crate::roster::Forest;

/// Employee lists up to this size open on their own.
pub const AUTO_EXPAND_MAX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmployeeSection {
    expanded: bool,
    count: usize,
}

/// Interactive state of the team board: selection, edit mode, accordions and
/// the board level feedback banner.
#[derive(Debug, Default)]
pub struct BoardState {
    selected: BTreeSet<String>,
    edit_mode: bool,
    expanded_teams: HashSet<String>,
    employee_sections: HashMap<String, EmployeeSection>,
    banner: Transient<Banner>,
}

fn auto_expands(count: usize) -> bool {
    (1..=AUTO_EXPAND_MAX).contains(&count)
}

impl BoardState {
    pub fn new() -> Self {
        BoardState::default()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    pub fn set_selected(&mut self, employee_id: &str, checked: bool) {
        if checked {
            self.selected.insert(employee_id.to_string());
        } else {
            self.selected.remove(employee_id);
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, employee_id: &str) -> bool {
        self.selected.contains(employee_id)
    }

    /// Selected identifiers that still name an existing employee.
    pub fn resolved_selection(&self, employees: &[Employee]) -> Vec<String> {
        let known: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        self.selected
            .iter()
            .filter(|id| known.contains(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn toggle_team(&mut self, team_id: &str) -> bool {
        if self.expanded_teams.remove(team_id) {
            false
        } else {
            self.expanded_teams.insert(team_id.to_string());
            true
        }
    }

    pub fn is_team_expanded(&self, team_id: &str) -> bool {
        self.expanded_teams.contains(team_id)
    }

    /// Flips an employee section the board has already seen. Unknown teams
    /// are ignored and `None` is returned.
    pub fn toggle_employees(&mut self, team_id: &str) -> Option<bool> {
        let section = self.employee_sections.get_mut(team_id)?;
        section.expanded = !section.expanded;
        Some(section.expanded)
    }

    pub fn employees_expanded(&self, team_id: &str) -> bool {
        self.employee_sections
            .get(team_id)
            .map(|section| section.expanded)
            .unwrap_or(false)
    }

    /// Recomputes the automatic expansion for every team whose employee count
    /// changed since the last render and forgets teams that are gone.
    pub fn reconcile(&mut self, forest: &Forest) {
        let mut seen = HashSet::new();
        for node in forest.nodes() {
            let count = node.employees.len();
            seen.insert(node.id());
            match self.employee_sections.get_mut(node.id()) {
                Some(section) if section.count == count => {}
                Some(section) => {
                    section.count = count;
                    section.expanded = auto_expands(count);
                }
                None => {
                    self.employee_sections.insert(
                        node.team.id.clone(),
                        EmployeeSection { expanded: auto_expands(count), count },
                    );
                }
            }
        }
        self.employee_sections.retain(|id, _| seen.contains(id.as_str()));
    }

    pub fn flash(&mut self, banner: Banner, now: DateTime<Utc>, window: Duration) {
        self.banner.show(banner, now, window);
    }

    pub fn banner(&mut self, now: DateTime<Utc>) -> Option<Banner> {
        self.banner.get(now).cloned()
    }
}
