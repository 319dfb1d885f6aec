use std::collections::HashSet;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{error, warn};

use super::{html, see_other, teams_for_resubmit};
use crate::errors::AppError;
use crate::forms::{self, FieldErrors, FormKey, FormMode, FormStatus, TeamForm};
use crate::models::team::Team;
use crate::roster::build_team_forest;
use crate::state::AppState;
use crate::ui::{Banner, PendingAction};
use crate::views::{team_options, whole_secs, FormChrome, TeamFormView};

fn form_path(mode: &FormMode) -> String {
    match mode {
        FormMode::Create => "/teams/new".to_string(),
        FormMode::Edit(id) => format!("/teams/{}/edit", id),
    }
}

async fn render_form(
    state: &AppState,
    mode: &FormMode,
    form: &TeamForm,
    errors: &FieldErrors,
    chrome: FormChrome,
    status: StatusCode,
    teams: &[Team],
) -> Result<HttpResponse, AppError> {
    // A team cannot move under itself or its own subtree.
    let exclude = match mode {
        FormMode::Create => HashSet::new(),
        FormMode::Edit(id) => build_team_forest(teams).descendant_ids(id),
    };
    let view = TeamFormView {
        chrome,
        form,
        errors,
        parents: team_options(teams, &form.parent_team, &exclude),
    };
    let body = state.templates.render("team_form.html", &view)?;
    Ok(html(status, body))
}

async fn show_form(state: &AppState, mode: FormMode) -> Result<HttpResponse, AppError> {
    let key = FormKey::team(mode.clone());
    let mut chrome = FormChrome::new(&mode, "teams");
    if state.pending.is_pending(&PendingAction::SubmitForm(key.clone())) {
        chrome.submitting = true;
    }

    let status = state.forms().poll(&key, Utc::now());
    match status {
        FormStatus::Completed => return Ok(see_other("/")),
        FormStatus::Showing { banner, remaining } => {
            chrome.banner = Some(banner);
            chrome.refresh_secs = Some(whole_secs(remaining));
        }
        FormStatus::Ready => {}
    }

    let form = match &mode {
        FormMode::Create => TeamForm::default(),
        FormMode::Edit(id) => {
            let team = state
                .api
                .get_team(id)
                .await
                .map_err(|err| err.not_found_or("Team not found"))?;
            TeamForm::from_team(&team)
        }
    };
    let teams = state.teams().await?;
    render_form(state, &mode, &form, &FieldErrors::default(), chrome, StatusCode::OK, &teams).await
}

async fn submit_form(state: &AppState, mode: FormMode, form: TeamForm) -> Result<HttpResponse, AppError> {
    let payload = match form.check() {
        Ok(payload) => payload,
        Err(errors) => {
            let chrome = FormChrome::new(&mode, "teams");
            let teams = teams_for_resubmit(state, &form.parent_team).await;
            return render_form(state, &mode, &form, &errors, chrome, StatusCode::UNPROCESSABLE_ENTITY, &teams).await;
        }
    };

    let key = FormKey::team(mode.clone());
    let _guard = match state.pending.try_begin(PendingAction::SubmitForm(key.clone())) {
        Some(guard) => guard,
        None => {
            warn!("team form {:?} submitted while a submission is in flight", mode);
            return Ok(see_other(&form_path(&mode)));
        }
    };

    let result = forms::team::submit(state.api.as_ref(), &state.cache, &mode, &payload).await;
    let now = Utc::now();
    match result {
        Ok(_) => {
            let banner = Banner::success(forms::team::success_message(&mode));
            state.forms().succeed(&key, banner, now, state.feedback_window);
            Ok(see_other(&form_path(&mode)))
        }
        Err(err) => {
            error!("{}: {}", forms::team::error_message(&mode), err);
            let banner = Banner::error(forms::team::error_message(&mode));
            state.forms().fail(&key, banner.clone(), now, state.feedback_window);

            let mut chrome = FormChrome::new(&mode, "teams");
            chrome.flash(banner, state.feedback_window);
            let teams = teams_for_resubmit(state, &form.parent_team).await;
            render_form(state, &mode, &form, &FieldErrors::default(), chrome, StatusCode::OK, &teams).await
        }
    }
}

pub async fn new_team_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    show_form(&state, FormMode::Create).await
}

pub async fn edit_team_form(
    state: web::Data<AppState>,
    team_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    show_form(&state, FormMode::Edit(team_id.into_inner())).await
}

pub async fn create_team(
    state: web::Data<AppState>,
    form: web::Form<TeamForm>,
) -> Result<HttpResponse, AppError> {
    submit_form(&state, FormMode::Create, form.into_inner()).await
}

pub async fn update_team(
    state: web::Data<AppState>,
    team_id: web::Path<String>,
    form: web::Form<TeamForm>,
) -> Result<HttpResponse, AppError> {
    submit_form(&state, FormMode::Edit(team_id.into_inner()), form.into_inner()).await
}
