pub mod board;
pub mod employee;
pub mod team;

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use log::warn;

use crate::models::team::Team;
use crate::state::AppState;

/// Registers every page and action. Fixed paths come before `{id}` paths so
/// they are matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(board::show_board)),
    )
    .service(
        web::resource("/edit-mode")
            .route(web::post().to(board::toggle_edit_mode)),
    )
    .service(
        web::resource("/teams")
            .route(web::post().to(team::create_team)),
    )
    .service(
        web::resource("/teams/new")
            .route(web::get().to(team::new_team_form)),
    )
    .service(
        web::resource("/teams/{id}")
            .route(web::post().to(team::update_team)),
    )
    .service(
        web::resource("/teams/{id}/edit")
            .route(web::get().to(team::edit_team_form)),
    )
    .service(
        web::resource("/teams/{id}/delete")
            .route(web::post().to(board::delete_team)),
    )
    .service(
        web::resource("/teams/{id}/expand")
            .route(web::post().to(board::toggle_team)),
    )
    .service(
        web::resource("/teams/{id}/employees/expand")
            .route(web::post().to(board::toggle_employees)),
    )
    .service(
        web::resource("/employees")
            .route(web::post().to(employee::create_employee)),
    )
    .service(
        web::resource("/employees/new")
            .route(web::get().to(employee::new_employee_form)),
    )
    .service(
        web::resource("/employees/delete-selected")
            .route(web::post().to(board::delete_selected)),
    )
    .service(
        web::resource("/employees/{id}")
            .route(web::post().to(employee::update_employee)),
    )
    .service(
        web::resource("/employees/{id}/edit")
            .route(web::get().to(employee::edit_employee_form)),
    )
    .service(
        web::resource("/employees/{id}/select")
            .route(web::post().to(board::select_employee)),
    );
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Team choices for re-rendering a submitted form. When the list cannot be
/// read, only the submitted team is offered so the user's input survives.
pub(crate) async fn teams_for_resubmit(state: &AppState, current: &str) -> Arc<Vec<Team>> {
    match state.teams().await {
        Ok(teams) => teams,
        Err(err) => {
            warn!("team list unavailable while re-rendering a form: {}", err);
            let kept = Some(current).filter(|id| !id.is_empty()).map(|id| Team {
                id: id.to_string(),
                name: id.to_string(),
                parent_team_id: None,
            });
            Arc::new(kept.into_iter().collect())
        }
    }
}
