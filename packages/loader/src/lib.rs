#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident CSV loading, normalization and feature derivation.
//!
//! [`load_path`] turns a raw incident CSV into a [`WorkingDataset`]: the
//! irrelevant columns are dropped, the canonical columns resolved via a
//! [`SchemaConfig`], dates parsed, out-of-scope and incomplete rows
//! excluded, and every surviving row enriched with its temporal features.
//! [`DatasetCache`] keeps loaded datasets around so each distinct source is
//! only read once per process.

pub mod cache;
pub mod derive;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod schema;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crime_trends_incident_models::{Incident, Season};
use serde::Serialize;

pub use cache::{DatasetCache, global_cache};
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use schema::SchemaConfig;

/// Errors that abort loading. No partial dataset is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited text could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The schema config is not valid TOML for a [`SchemaConfig`].
    #[error("Schema error: {0}")]
    Schema(#[from] toml::de::Error),

    /// Required canonical columns are absent after dropping and renaming.
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Canonical names of the missing columns.
        columns: Vec<String>,
    },
}

/// Row counts from one load, broken down by exclusion reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the source.
    pub total_rows: u64,
    /// Rows whose date was empty or matched no known format.
    pub unparseable_date: u64,
    /// Rows with a valid date outside the schema's year range.
    pub out_of_range_year: u64,
    /// In-range rows with an empty crime type.
    pub missing_crime_type: u64,
    /// Rows that made it into the working dataset.
    pub loaded: u64,
}

impl LoadReport {
    /// Total rows excluded for any reason.
    #[must_use]
    pub const fn excluded(&self) -> u64 {
        self.unparseable_date + self.out_of_range_year + self.missing_crime_type
    }
}

/// The normalized, feature-enriched incidents loaded from one source.
///
/// Immutable once built. Share it behind an [`Arc`] and hand out borrowed
/// views for filtering.
#[derive(Debug, Clone)]
pub struct WorkingDataset {
    source: Option<PathBuf>,
    incidents: Vec<Incident>,
    report: LoadReport,
}

impl WorkingDataset {
    /// Wraps already-normalized incidents. The report records every row as
    /// loaded.
    #[must_use]
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        let count = incidents.len() as u64;
        Self {
            source: None,
            incidents,
            report: LoadReport {
                total_rows: count,
                loaded: count,
                ..LoadReport::default()
            },
        }
    }

    /// All incidents, in source order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Returns `true` if no row survived loading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Exclusion counts from the load that produced this dataset.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// The file this dataset was read from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Distinct years present, ascending.
    #[must_use]
    pub fn years(&self) -> BTreeSet<i32> {
        self.incidents.iter().map(|i| i.year).collect()
    }

    /// Distinct seasons present, in calendar order.
    #[must_use]
    pub fn seasons(&self) -> BTreeSet<Season> {
        self.incidents.iter().map(|i| i.season).collect()
    }
}

/// Loads a CSV file with the given schema.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or read, or lacks a
/// required column.
pub fn load_path(path: &Path, schema: &SchemaConfig) -> Result<WorkingDataset, LoadError> {
    load_path_with_progress(path, schema, &null_progress())
}

/// Loads a CSV file with the given schema, reporting byte progress.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or read, or lacks a
/// required column.
pub fn load_path_with_progress(
    path: &Path,
    schema: &SchemaConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<WorkingDataset, LoadError> {
    log::info!("[{}] Loading {}", schema.id, path.display());

    let file = File::open(path)?;
    progress.set_total(file.metadata()?.len());
    progress.set_message(format!("Loading {}", path.display()));

    let (incidents, report) = normalize::load_reader(BufReader::new(file), schema, progress)?;

    log::info!(
        "[{}] Loaded {} of {} rows ({} unparseable date, {} out of range, {} missing crime type)",
        schema.id,
        report.loaded,
        report.total_rows,
        report.unparseable_date,
        report.out_of_range_year,
        report.missing_crime_type,
    );
    progress.finish(format!(
        "[{}] loaded {} incidents",
        schema.id, report.loaded
    ));

    Ok(WorkingDataset {
        source: Some(path.to_path_buf()),
        incidents,
        report,
    })
}
