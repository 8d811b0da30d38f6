mod config;
mod error;
mod identity;
mod import;
mod rooms;
mod services;
mod state;
mod store;

use crate::config::AppConfig;
use crate::import::Importer;
use crate::rooms::RoomOrder;
use crate::state::AppState;
use crate::store::SqliteResidentStore;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    let aliases = config.load_aliases().map_err(io::Error::other)?;
    info!(
        "Using column alias table v{} ({})",
        aliases.version,
        config
            .aliases_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );

    let store = SqliteResidentStore::open(&config.database).map_err(io::Error::other)?;
    info!("Resident database at {}", config.database.display());

    let state = AppState::new(
        Arc::new(store),
        Importer::new(aliases, config.max_skip_details),
        RoomOrder::new().map_err(io::Error::other)?,
        config.max_upload_bytes,
    );

    info!("Server running at {}", config.url());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .service(services::residents::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
