#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime trends explorer.
//!
//! Holds one working dataset in memory and serves the filter options, a
//! preview of the filtered rows, the aggregate views, and the filtered CSV
//! export. Every request filters the shared dataset afresh; nothing is
//! written back.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_trends_loader::{LoadError, SchemaConfig, WorkingDataset};

/// Environment variable naming the incident CSV to serve.
pub const DATA_ENV: &str = "CRIME_TRENDS_DATA";

/// Environment variable naming a schema TOML file overriding the built-in
/// one.
pub const SCHEMA_ENV: &str = "CRIME_TRENDS_SCHEMA";

/// Shared application state.
pub struct AppState {
    /// The loaded incidents every request filters.
    pub dataset: Arc<WorkingDataset>,
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `127.0.0.1`.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults for
    /// anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        Self { bind_addr, port }
    }
}

/// The data path from [`DATA_ENV`], if set.
#[must_use]
pub fn data_path_from_env() -> Option<PathBuf> {
    std::env::var_os(DATA_ENV).map(PathBuf::from)
}

/// The schema from [`SCHEMA_ENV`], or the built-in St. Louis schema.
///
/// # Errors
///
/// Returns [`LoadError`] if the named schema file cannot be read or parsed.
pub fn schema_from_env() -> Result<SchemaConfig, LoadError> {
    match std::env::var_os(SCHEMA_ENV) {
        Some(path) => SchemaConfig::from_path(&PathBuf::from(path)),
        None => Ok(SchemaConfig::st_louis()),
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filters))
            .route("/preview", web::get().to(handlers::preview))
            .route("/views", web::get().to(handlers::views))
            .route("/export", web::get().to(handlers::export)),
    );
}

/// Starts the crime trends API server over an already-loaded dataset.
///
/// This is a regular async function; the caller provides the runtime (via
/// `#[actix_web::main]` or an `actix_web::rt::System`) and initializes
/// logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(dataset: Arc<WorkingDataset>, config: ServerConfig) -> std::io::Result<()> {
    log::info!(
        "Serving {} incidents from {}",
        dataset.len(),
        dataset
            .source()
            .map_or_else(|| "memory".to_string(), |p| p.display().to_string()),
    );

    let state = web::Data::new(AppState { dataset });
    let ServerConfig { bind_addr, port } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_localhost_8080() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }
}
