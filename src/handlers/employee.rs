use std::collections::HashSet;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{error, warn};

use super::{html, see_other, teams_for_resubmit};
use crate::errors::AppError;
use crate::forms::{self, EmployeeForm, FieldErrors, FormKey, FormMode, FormStatus};
use crate::models::team::Team;
use crate::state::AppState;
use crate::ui::{Banner, PendingAction};
use crate::views::{team_options, whole_secs, EmployeeFormView, FormChrome};

fn form_path(mode: &FormMode) -> String {
    match mode {
        FormMode::Create => "/employees/new".to_string(),
        FormMode::Edit(id) => format!("/employees/{}/edit", id),
    }
}

async fn render_form(
    state: &AppState,
    form: &EmployeeForm,
    errors: &FieldErrors,
    chrome: FormChrome,
    status: StatusCode,
    teams: &[Team],
) -> Result<HttpResponse, AppError> {
    let view = EmployeeFormView {
        chrome,
        form,
        errors,
        teams: team_options(teams, &form.team, &HashSet::new()),
    };
    let body = state.templates.render("employee_form.html", &view)?;
    Ok(html(status, body))
}

async fn show_form(state: &AppState, mode: FormMode) -> Result<HttpResponse, AppError> {
    let key = FormKey::employee(mode.clone());
    let mut chrome = FormChrome::new(&mode, "employees");
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
        FormMode::Create => EmployeeForm::default(),
        FormMode::Edit(id) => {
            let employee = state
                .api
                .get_employee(id)
                .await
                .map_err(|err| err.not_found_or("Employee not found"))?;
            EmployeeForm::from_employee(&employee)
        }
    };
    let teams = state.teams().await?;
    render_form(state, &form, &FieldErrors::default(), chrome, StatusCode::OK, &teams).await
}

async fn submit_form(state: &AppState, mode: FormMode, form: EmployeeForm) -> Result<HttpResponse, AppError> {
    let payload = match form.check() {
        Ok(payload) => payload,
        Err(errors) => {
            let chrome = FormChrome::new(&mode, "employees");
            let teams = teams_for_resubmit(state, &form.team).await;
            return render_form(state, &form, &errors, chrome, StatusCode::UNPROCESSABLE_ENTITY, &teams).await;
        }
    };

    let key = FormKey::employee(mode.clone());
    let _guard = match state.pending.try_begin(PendingAction::SubmitForm(key.clone())) {
        Some(guard) => guard,
        None => {
            warn!("employee form {:?} submitted while a submission is in flight", mode);
            return Ok(see_other(&form_path(&mode)));
        }
    };

    let result = forms::employee::submit(state.api.as_ref(), &state.cache, &mode, &payload).await;
    let now = Utc::now();
    match result {
        Ok(_) => {
            let banner = Banner::success(forms::employee::success_message(&mode));
            state.forms().succeed(&key, banner, now, state.feedback_window);
            Ok(see_other(&form_path(&mode)))
        }
        Err(err) => {
            error!("{}: {}", forms::employee::error_message(&mode), err);
            let banner = Banner::error(forms::employee::error_message(&mode));
            state.forms().fail(&key, banner.clone(), now, state.feedback_window);

            let mut chrome = FormChrome::new(&mode, "employees");
            chrome.flash(banner, state.feedback_window);
            let teams = teams_for_resubmit(state, &form.team).await;
            render_form(state, &form, &FieldErrors::default(), chrome, StatusCode::OK, &teams).await
        }
    }
}

pub async fn new_employee_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    show_form(&state, FormMode::Create).await
}

pub async fn edit_employee_form(
    state: web::Data<AppState>,
    employee_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    show_form(&state, FormMode::Edit(employee_id.into_inner())).await
}

pub async fn create_employee(
    state: web::Data<AppState>,
    form: web::Form<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    submit_form(&state, FormMode::Create, form.into_inner()).await
}

pub async fn update_employee(
    state: web::Data<AppState>,
    employee_id: web::Path<String>,
    form: web::Form<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    submit_form(&state, FormMode::Edit(employee_id.into_inner()), form.into_inner()).await
}
