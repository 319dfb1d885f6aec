use std::env;

use chrono::Duration;
use url::Url;

use crate::api::auth::BearerToken;
use crate::errors::AppError;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FEEDBACK_WINDOW_MS: i64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub api_token: BearerToken,
    pub bind_addr: String,
    /// How long success/error banners stay visible.
    pub feedback_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("ROSTER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = Url::parse(&raw_url)
            .map_err(|err| AppError::Config(format!("ROSTER_API_URL is not a valid URL: {}", err)))?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Config("ROSTER_API_URL must be an http(s) URL".to_string()));
        }

        let api_token = lookup("ROSTER_API_TOKEN")
            .and_then(BearerToken::new)
            .ok_or_else(|| AppError::Config("ROSTER_API_TOKEN must be set and non-empty".to_string()))?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let feedback_ms = match lookup("FEEDBACK_WINDOW_MS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ms| *ms >= 0)
                .ok_or_else(|| AppError::Config(format!("FEEDBACK_WINDOW_MS must be a non-negative integer, got {}", raw)))?,
            None => DEFAULT_FEEDBACK_WINDOW_MS,
        };

        Ok(Config {
            api_base_url,
            api_token,
            bind_addr,
            feedback_window: Duration::milliseconds(feedback_ms),
        })
    }
}
