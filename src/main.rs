use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use teamtree_admin::api::RosterClient;
use teamtree_admin::config::Config;
use teamtree_admin::handlers;
use teamtree_admin::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let client = RosterClient::new(config.api_base_url.clone(), config.api_token.clone());
    let state = AppState::new(Arc::new(client), config.feedback_window)
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    info!("Using roster API at {}", config.api_base_url);
    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
