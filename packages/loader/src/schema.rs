//! Config-driven source schema.
//!
//! [`SchemaConfig`] captures everything source-specific about a crime CSV:
//! which columns to throw away, which headers hold the date, time and
//! offense, which years are in scope, and how dates are written. The
//! St. Louis schema is baked into the binary at compile time; other
//! sources can supply their own TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::LoadError;

/// Canonical name of the incident date column.
pub const DATE_COLUMN: &str = "Date";
/// Canonical name of the occurrence time column.
pub const TIME_COLUMN: &str = "Time";
/// Canonical name of the offense column.
pub const CRIME_TYPE_COLUMN: &str = "CrimeType";

const ST_LOUIS_TOML: &str = include_str!("../schemas/st_louis.toml");

/// Missing-value tokens used when a schema file has no `na_values` list.
const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|&s| s.to_owned()).collect()
}

/// A complete description of one source's CSV layout.
///
/// Two schemas compare equal only if every field matches, so a custom
/// schema that reuses an `id` is still told apart from the built-in one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct SchemaConfig {
    /// Unique identifier (e.g., `"st_louis"`).
    pub id: String,
    /// Human-readable name for log messages.
    pub name: String,
    /// Source columns removed before renaming.
    #[serde(default)]
    pub drop_columns: Vec<String>,
    /// `chrono` format strings tried in order when parsing the date column.
    pub date_formats: Vec<String>,
    /// Cell contents treated as missing, compared after trimming.
    #[serde(default = "default_na_values")]
    pub na_values: Vec<String>,
    /// Source header names for each canonical field.
    pub fields: FieldMapping,
    /// Inclusive range of years kept in the working dataset.
    pub years: YearRange,
}

/// Source header aliases for each canonical column.
///
/// Aliases are tried in order and the first header present in the file
/// wins. The canonical name itself is always accepted after the aliases,
/// so files written by the exporter load with any schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct FieldMapping {
    /// Headers that hold the incident date.
    pub date: Vec<String>,
    /// Headers that hold the time-of-day label.
    pub time: Vec<String>,
    /// Headers that hold the offense label.
    pub crime_type: Vec<String>,
}

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct YearRange {
    /// First year kept.
    pub min: i32,
    /// Last year kept.
    pub max: i32,
}

impl YearRange {
    /// Returns `true` if `year` lies within the range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

impl SchemaConfig {
    /// Returns the built-in St. Louis schema.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the config is embedded).
    #[must_use]
    pub fn st_louis() -> Self {
        Self::from_toml_str(ST_LOUIS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse st_louis.toml: {e}"))
    }

    /// Parses a schema from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Schema`] if the text is not a valid schema.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LoadError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a schema file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Schema`] if its contents are not a valid schema.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Returns `true` if `cell` is blank or one of the missing-value tokens.
    #[must_use]
    pub fn is_na(&self, cell: &str) -> bool {
        let cell = cell.trim();
        cell.is_empty() || self.na_values.iter().any(|na| na == cell)
    }

    /// Returns `true` if `header` is on the drop list.
    #[must_use]
    pub fn is_dropped(&self, header: &str) -> bool {
        self.drop_columns.iter().any(|c| c == header)
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::st_louis()
    }
}

impl FieldMapping {
    /// Returns `(canonical name, aliases)` for every required column.
    #[must_use]
    pub fn canonical(&self) -> [(&'static str, &[String]); 3] {
        [
            (DATE_COLUMN, self.date.as_slice()),
            (TIME_COLUMN, self.time.as_slice()),
            (CRIME_TYPE_COLUMN, self.crime_type.as_slice()),
        ]
    }
}
