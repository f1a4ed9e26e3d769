//! Interactive explorer.
//!
//! Prompts for a data file, lets the user tick the years and seasons to
//! keep (everything ticked by default), prints the preview and views, and
//! offers to export the filtered rows.

use std::path::PathBuf;

use crime_trends_analytics::{compute_views, filter, filter_options};
use crime_trends_cli_utils::{MultiProgress, select_all_by_default};
use crime_trends_export::EXPORT_FILE_NAME;
use crime_trends_incident_models::FilterSelection;
use crime_trends_server::{data_path_from_env, schema_from_env};
use dialoguer::{Confirm, Input};

use crate::{commands, render};

/// Runs the interactive explorer.
///
/// # Errors
///
/// Returns an error if a prompt fails, the data cannot be loaded, or the
/// export cannot be written.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Trends Explorer");
    println!();

    let default_path = data_path_from_env()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let data: String = Input::new()
        .with_prompt("Incident CSV file")
        .with_initial_text(default_path)
        .interact_text()?;

    let schema = schema_from_env()?;
    let dataset = commands::load(multi, &PathBuf::from(data.trim()), &schema)?;
    println!("{}", render::report(dataset.report()));

    if dataset.is_empty() {
        println!("No incidents to explore.");
        return Ok(());
    }

    loop {
        let options = filter_options(dataset.incidents());
        let years = select_all_by_default("Years", &options.years)?;
        let seasons = select_all_by_default("Seasons", &options.seasons)?;

        let selection = FilterSelection::new(years, seasons);
        let filtered = filter(dataset.incidents(), &selection);

        println!();
        print!("{}", render::preview(filtered.preview(), filtered.len()));
        println!();
        print!("{}", render::views(&compute_views(&filtered)));
        println!();

        if Confirm::new()
            .with_prompt("Export the filtered rows?")
            .default(false)
            .interact()?
        {
            let output: String = Input::new()
                .with_prompt("Output file")
                .default(EXPORT_FILE_NAME.to_string())
                .interact_text()?;
            let rows = commands::export_filtered(&filtered, &PathBuf::from(output.trim()))?;
            println!("Exported {rows} rows.");
        }

        if !Confirm::new()
            .with_prompt("Change the filters?")
            .default(false)
            .interact()?
        {
            break;
        }
    }

    Ok(())
}
