//! Command implementations shared by the flag-driven and interactive modes.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use crime_trends_analytics::{FilteredDataset, compute_views, default_selection, filter};
use crime_trends_cli_utils::{IndicatifProgress, MultiProgress};
use crime_trends_export::{ExportError, write_csv};
use crime_trends_incident_models::FilterSelection;
use crime_trends_loader::{LoadError, SchemaConfig, WorkingDataset, global_cache};
use crime_trends_server::{ServerConfig, run_server};
use crime_trends_server_models::SelectionQueryParams;

use crate::render;

/// Where the incidents come from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Incident CSV file
    #[arg(long)]
    pub data: PathBuf,
    /// Schema TOML overriding the built-in St. Louis column layout
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Which incidents to keep.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Comma-separated years to keep (default: all; empty: none)
    #[arg(long)]
    pub years: Option<String>,
    /// Comma-separated seasons to keep, e.g. "Winter,Summer" (default: all; empty: none)
    #[arg(long)]
    pub seasons: Option<String>,
}

impl SelectionArgs {
    /// Resolves the flags against the years and seasons in `dataset`.
    #[must_use]
    pub fn selection(&self, dataset: &WorkingDataset) -> FilterSelection {
        SelectionQueryParams {
            years: self.years.clone(),
            seasons: self.seasons.clone(),
        }
        .selection(&default_selection(dataset.incidents()))
    }
}

/// Reads the schema at `path`, or the built-in one.
///
/// # Errors
///
/// Returns [`LoadError`] if the schema file cannot be read or parsed.
pub fn schema(path: Option<&Path>) -> Result<SchemaConfig, LoadError> {
    path.map_or_else(|| Ok(SchemaConfig::st_louis()), SchemaConfig::from_path)
}

/// Loads `data` through the process-wide cache with a progress bar.
///
/// # Errors
///
/// Returns [`LoadError`] if loading fails.
pub fn load(
    multi: &MultiProgress,
    data: &Path,
    schema: &SchemaConfig,
) -> Result<Arc<WorkingDataset>, LoadError> {
    let progress = IndicatifProgress::load_bar(multi, "Loading incidents");
    global_cache().get_or_load_with_progress(data, schema, &progress)
}

/// Prints the load report, the preview, and every view for `selection`.
pub fn summary(dataset: &WorkingDataset, selection: &FilterSelection) {
    let filtered = filter(dataset.incidents(), selection);

    println!("{}", render::report(dataset.report()));
    println!();
    print!("{}", render::preview(filtered.preview(), filtered.len()));
    println!();
    print!("{}", render::views(&compute_views(&filtered)));
}

/// Writes the incidents passing `selection` to `output`. Returns the number
/// of rows written.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn export(
    dataset: &WorkingDataset,
    selection: &FilterSelection,
    output: &Path,
) -> Result<u64, ExportError> {
    let filtered = filter(dataset.incidents(), selection);
    export_filtered(&filtered, output)
}

/// Writes an already-filtered dataset to `output`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn export_filtered(filtered: &FilteredDataset<'_>, output: &Path) -> Result<u64, ExportError> {
    let file = File::create(output)?;
    let rows = write_csv(BufWriter::new(file), filtered.iter())?;
    log::info!("Wrote {rows} rows to {}", output.display());
    Ok(rows)
}

/// Serves `dataset` over HTTP until the server stops.
///
/// # Errors
///
/// Returns an `std::io::Error` if the server fails to bind or run.
pub fn serve(dataset: Arc<WorkingDataset>, config: ServerConfig) -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(run_server(dataset, config))
}
