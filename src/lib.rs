pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod roster;
pub mod state;
pub mod ui;
pub mod views;
