//! Feature derivation.
//!
//! Turns normalized rows into [`Incident`]s by computing year, month, day,
//! weekday and season from each row's date. Runs over every surviving row
//! before any filtering happens.

use chrono::NaiveDate;
use crime_trends_incident_models::Incident;

/// A row that survived normalization: valid in-range date, non-empty
/// crime type, optional time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    /// Parsed incident date.
    pub date: NaiveDate,
    /// Time-of-day label, untouched apart from trimming.
    pub time: Option<String>,
    /// Offense label.
    pub crime_type: String,
}

/// Enriches every row with its temporal features, preserving order.
#[must_use]
pub fn derive_features(rows: Vec<NormalizedRow>) -> Vec<Incident> {
    rows.into_iter()
        .map(|row| Incident::new(row.date, row.time, row.crime_type))
        .collect()
}
