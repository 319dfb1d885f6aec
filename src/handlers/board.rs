use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures_util::future::join_all;
use log::{error, info, warn};
use serde::Deserialize;

use super::{html, see_other};
use crate::api::RosterApi;
use crate::cache::CollectionKey;
use crate::errors::AppError;
use crate::state::AppState;
use crate::ui::{Banner, PendingAction};
use crate::views::{self, BoardContext};

#[derive(Deserialize)]
pub struct SelectEmployee {
    checked: bool,
}

pub async fn show_board(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let roster = state.load_roster().await?;
    let now = Utc::now();
    let pending_team_deletes = state.pending.team_deletes();
    let bulk_delete_pending = state.pending.is_pending(&PendingAction::DeleteSelectedEmployees);

    let view = {
        let mut board = state.board();
        board.reconcile(&roster.forest);
        let banner = board.banner(now);
        let selected_count = board.resolved_selection(&roster.employees).len();
        views::board_view(
            &roster.forest,
            BoardContext {
                board: &board,
                banner,
                selected_count,
                pending_team_deletes: &pending_team_deletes,
                bulk_delete_pending,
                now,
            },
        )
    };

    let body = state.templates.render("board.html", &view)?;
    Ok(html(StatusCode::OK, body))
}

pub async fn toggle_edit_mode(state: web::Data<AppState>) -> HttpResponse {
    state.board().toggle_edit_mode();
    see_other("/")
}

pub async fn toggle_team(state: web::Data<AppState>, team_id: web::Path<String>) -> HttpResponse {
    state.board().toggle_team(&team_id);
    see_other("/")
}

pub async fn toggle_employees(state: web::Data<AppState>, team_id: web::Path<String>) -> HttpResponse {
    state.board().toggle_employees(&team_id);
    see_other("/")
}

pub async fn select_employee(
    state: web::Data<AppState>,
    employee_id: web::Path<String>,
    form: web::Form<SelectEmployee>,
) -> HttpResponse {
    state.board().set_selected(&employee_id, form.checked);
    see_other("/")
}

pub async fn delete_team(state: web::Data<AppState>, team_id: web::Path<String>) -> HttpResponse {
    let team_id = team_id.into_inner();
    let _guard = match state.pending.try_begin(PendingAction::DeleteTeam(team_id.clone())) {
        Some(guard) => guard,
        None => {
            warn!("delete of team {} already in flight", team_id);
            return see_other("/");
        }
    };

    match state.api.delete_team(&team_id).await {
        Ok(()) => {
            state.cache.invalidate(CollectionKey::Teams);
            info!("deleted team {}", team_id);
        }
        Err(err) => {
            error!("Error deleting team {}: {}", team_id, err);
            state
                .board()
                .flash(Banner::error("Error deleting team"), Utc::now(), state.feedback_window);
        }
    }
    see_other("/")
}

/// Deletes every selected employee that still exists. The batch fails as a
/// whole when any single deletion fails.
pub async fn delete_selected(state: web::Data<AppState>) -> HttpResponse {
    if !state.board().has_selection() {
        return see_other("/");
    }

    let _guard = match state.pending.try_begin(PendingAction::DeleteSelectedEmployees) {
        Some(guard) => guard,
        None => {
            warn!("bulk employee delete already in flight");
            return see_other("/");
        }
    };

    let employees = match state.employees().await {
        Ok(employees) => employees,
        Err(err) => {
            error!("Error deleting employees: {}", err);
            flash_delete_failure(&state);
            return see_other("/");
        }
    };
    let ids = state.board().resolved_selection(&employees);
    if ids.is_empty() {
        return see_other("/");
    }

    let result = delete_employees(state.api.as_ref(), &ids).await;

    // Part of a failed batch may already be gone remotely.
    state.cache.invalidate(CollectionKey::Employees);
    match result {
        Ok(()) => {
            state.board().clear_selection();
            info!("deleted {} employees", ids.len());
        }
        Err(err) => {
            error!("Error deleting employees: {}", err);
            flash_delete_failure(&state);
        }
    }
    see_other("/")
}

fn flash_delete_failure(state: &AppState) {
    state
        .board()
        .flash(Banner::error("Error deleting employees"), Utc::now(), state.feedback_window);
}

/// Issues every deletion concurrently and waits for all of them. Returns the
/// first failure once the whole batch has settled.
async fn delete_employees(api: &dyn RosterApi, ids: &[String]) -> Result<(), AppError> {
    let results = join_all(ids.iter().map(|id| api.delete_employee(id))).await;
    let mut failures = results.into_iter().filter_map(Result::err);
    match failures.next() {
        Some(first) => {
            let others = failures.count();
            if others > 0 {
                warn!("{} more employee deletions failed", others);
            }
            Err(first)
        }
        None => Ok(()),
    }
}
