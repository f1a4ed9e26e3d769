#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate view types produced by the crime trends analytics.
//!
//! Every view is a plain keyed structure with no rendering concerns: the
//! caller decides whether it becomes a line chart, a stacked bar, a
//! heatmap or a text table.

use crime_trends_incident_models::{DayOfWeek, Season};
use serde::{Deserialize, Serialize};

/// Incident count for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of incidents.
    pub count: u64,
}

/// A dense two-dimensional table of counts.
///
/// `counts[r][c]` is the count for `rows[r]` and `columns[c]`. Cells for
/// key combinations that never occurred are zero; a key only appears on an
/// axis if the view's axis rule puts it there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountMatrix<R, C> {
    /// Row keys, in display order.
    pub rows: Vec<R>,
    /// Column keys, in display order.
    pub columns: Vec<C>,
    /// Row-major counts, `rows.len()` by `columns.len()`.
    pub counts: Vec<Vec<u64>>,
}

impl<R: PartialEq, C: PartialEq> CountMatrix<R, C> {
    /// Creates a matrix with every cell set to zero.
    #[must_use]
    pub fn zeroed(rows: Vec<R>, columns: Vec<C>) -> Self {
        let counts = vec![vec![0; columns.len()]; rows.len()];
        Self {
            rows,
            columns,
            counts,
        }
    }

    /// Returns the count for `(row, column)`, or zero if either key is not
    /// on its axis.
    #[must_use]
    pub fn get(&self, row: &R, column: &C) -> u64 {
        let Some(r) = self.rows.iter().position(|k| k == row) else {
            return 0;
        };
        let Some(c) = self.columns.iter().position(|k| k == column) else {
            return 0;
        };
        self.counts[r][c]
    }

    /// Sum of one row, or zero if the key is not on the row axis.
    #[must_use]
    pub fn row_total(&self, row: &R) -> u64 {
        self.rows
            .iter()
            .position(|k| k == row)
            .map_or(0, |r| self.counts[r].iter().sum())
    }

    /// Sum of one column, or zero if the key is not on the column axis.
    #[must_use]
    pub fn column_total(&self, column: &C) -> u64 {
        self.columns
            .iter()
            .position(|k| k == column)
            .map_or(0, |c| self.counts.iter().map(|row| row[c]).sum())
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Returns `true` if every cell is zero (including the no-cell case).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates over the non-zero cells as `(row, column, count)`.
    pub fn non_zero(&self) -> impl Iterator<Item = (&R, &C, u64)> {
        self.rows.iter().zip(&self.counts).flat_map(move |(r, row)| {
            self.columns
                .iter()
                .zip(row)
                .filter(|(_, n)| **n > 0)
                .map(move |(c, n)| (r, c, *n))
        })
    }
}

/// Incidents per year and season.
pub type YearSeasonMatrix = CountMatrix<i32, Season>;

/// Incidents per year and crime type.
pub type YearCrimeTypeMatrix = CountMatrix<i32, String>;

/// Incidents per weekday and time-of-day label.
pub type WeekdayTimeMatrix = CountMatrix<DayOfWeek, String>;

/// Incidents per year and month number.
pub type YearMonthMatrix = CountMatrix<i32, u32>;

/// One crime type's share of the filtered incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeTypeShare {
    /// Offense label.
    pub crime_type: String,
    /// Number of incidents.
    pub count: u64,
    /// `count / total * 100`.
    pub percentage: f64,
}

/// Crime types ranked by how often they occur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeTypeDistribution {
    /// Number of incidents the shares are relative to.
    pub total: u64,
    /// Shares, most frequent first.
    pub shares: Vec<CrimeTypeShare>,
}

impl CrimeTypeDistribution {
    /// Returns the share for `crime_type`, if present.
    #[must_use]
    pub fn share(&self, crime_type: &str) -> Option<&CrimeTypeShare> {
        self.shares.iter().find(|s| s.crime_type == crime_type)
    }

    /// Sum of all percentages; 100 up to floating point rounding unless
    /// the distribution is empty.
    #[must_use]
    pub fn percentage_sum(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }
}

/// All six aggregate views over one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateViews {
    /// Number of incidents the views were computed from.
    pub row_count: u64,
    /// Total incidents per year.
    pub yearly_totals: Vec<YearCount>,
    /// Incidents per year and season.
    pub year_season: YearSeasonMatrix,
    /// Incidents per year and crime type.
    pub year_crime_type: YearCrimeTypeMatrix,
    /// Incidents per weekday and time-of-day label.
    pub weekday_time: WeekdayTimeMatrix,
    /// Crime types ranked by frequency.
    pub crime_type_distribution: CrimeTypeDistribution,
    /// Incidents per year and month.
    pub monthly_trends: YearMonthMatrix,
}

/// The selectable values present in a dataset. Selecting all of them is
/// the default filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct seasons, in calendar order.
    pub seasons: Vec<Season>,
}
