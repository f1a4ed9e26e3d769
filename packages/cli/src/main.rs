#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line explorer for crime incident trends.
//!
//! Loads an incident CSV, filters it by year and season, and either prints
//! the aggregate views, exports the filtered rows, or serves them over
//! HTTP. Run without a subcommand for the interactive explorer.
//!
//! Uses `indicatif-log-bridge` (via [`crime_trends_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod commands;
mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{SelectionArgs, SourceArgs};
use crime_trends_export::EXPORT_FILE_NAME;
use crime_trends_server::ServerConfig;

#[derive(Parser)]
#[command(name = "crime_trends", about = "Crime incident trends explorer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered preview and all aggregate views
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Write the filtered incidents to a CSV file
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Serve the dataset over the HTTP API
    Serve {
        #[command(flatten)]
        source: SourceArgs,
        /// Interface to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_trends_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Summary { source, selection } => {
            let schema = commands::schema(source.schema.as_deref())?;
            let dataset = commands::load(&multi, &source.data, &schema)?;
            commands::summary(&dataset, &selection.selection(&dataset));
        }
        Commands::Export {
            source,
            selection,
            output,
        } => {
            let schema = commands::schema(source.schema.as_deref())?;
            let dataset = commands::load(&multi, &source.data, &schema)?;
            let rows = commands::export(&dataset, &selection.selection(&dataset), &output)?;
            println!("Exported {rows} rows to {}", output.display());
        }
        Commands::Serve { source, bind, port } => {
            let schema = commands::schema(source.schema.as_deref())?;
            let dataset = commands::load(&multi, &source.data, &schema)?;

            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            commands::serve(dataset, config)?;
        }
    }

    Ok(())
}
