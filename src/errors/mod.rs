use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("API request to {endpoint} failed with status {status}")]
    Api { status: u16, endpoint: String },
    #[error("Transport Error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Template Error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Not Found: {0}")]
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// A remote 404 is a missing record, everything else stays an API failure.
    pub fn not_found_or(self, what: &str) -> AppError {
        match self {
            AppError::Api { status: 404, .. } => AppError::NotFound(what.to_string()),
            other => other,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Api { .. } | AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: self.to_string() })
    }
}
