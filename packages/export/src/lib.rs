#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV export of filtered incidents.
//!
//! The export carries every retained column, source and derived, under a
//! fixed header. Its `Date`, `Time` and `CrimeType` columns use the
//! canonical names, so an exported file loads again as a working dataset.

use std::io::{Read, Write};

use chrono::NaiveDate;
use crime_trends_incident_models::{DayOfWeek, Incident, Season};
use serde::{Deserialize, Serialize};

/// Suggested file name for a download of the export.
pub const EXPORT_FILE_NAME: &str = "filtered_crime_data.csv";

/// MIME type of the export.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Header row written by [`write_csv`].
pub const EXPORT_HEADER: [&str; 8] = [
    "Date",
    "Time",
    "CrimeType",
    "Year",
    "Month",
    "Day",
    "DayOfWeek",
    "Season",
];

/// Errors that can occur while writing or reading an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The delimited text could not be written or parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error on the underlying writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportRecord {
    date: NaiveDate,
    time: Option<String>,
    crime_type: String,
    year: i32,
    month: u32,
    day: u32,
    day_of_week: DayOfWeek,
    season: Season,
}

impl From<&Incident> for ExportRecord {
    fn from(incident: &Incident) -> Self {
        Self {
            date: incident.date,
            time: incident.time.clone(),
            crime_type: incident.crime_type.clone(),
            year: incident.year,
            month: incident.month,
            day: incident.day,
            day_of_week: incident.day_of_week,
            season: incident.season,
        }
    }
}

impl From<ExportRecord> for Incident {
    fn from(record: ExportRecord) -> Self {
        Self {
            date: record.date,
            time: record.time,
            crime_type: record.crime_type,
            year: record.year,
            month: record.month,
            day: record.day,
            day_of_week: record.day_of_week,
            season: record.season,
        }
    }
}

/// Writes `incidents` as CSV to `writer`, header first, and returns the
/// number of data rows written.
///
/// The header is written even when there are no incidents.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the underlying writer fails.
pub fn write_csv<'a, W: Write>(
    writer: W,
    incidents: impl IntoIterator<Item = &'a Incident>,
) -> Result<u64, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;

    let mut rows = 0;
    for incident in incidents {
        csv_writer.serialize(ExportRecord::from(incident))?;
        rows += 1;
    }
    csv_writer.flush()?;

    log::debug!("Exported {rows} rows");
    Ok(rows)
}

/// Serializes `incidents` into an in-memory CSV buffer.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn to_csv_bytes<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, incidents)?;
    Ok(buf)
}

/// Parses an export produced by [`write_csv`] back into incidents.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the input is not a valid export.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Incident>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<ExportRecord>()
        .map(|record| record.map(Incident::from).map_err(ExportError::from))
        .collect()
}
