#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the crime trends API server.
//!
//! Reads the data path from `CRIME_TRENDS_DATA` and an optional schema file
//! from `CRIME_TRENDS_SCHEMA`, loads the dataset once, then serves it on
//! `BIND_ADDR:PORT`.

use crime_trends_loader::global_cache;
use crime_trends_server::{
    DATA_ENV, ServerConfig, data_path_from_env, run_server, schema_from_env,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let Some(data_path) = data_path_from_env() else {
        return Err(format!("{DATA_ENV} must point at an incident CSV file").into());
    };
    let schema = schema_from_env()?;

    let dataset = global_cache().get_or_load(&data_path, &schema)?;
    run_server(dataset, ServerConfig::from_env()).await?;

    Ok(())
}
