#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime trends server.
//!
//! These types are serialized to JSON for the REST API. They are kept apart
//! from the loader and analytics types so the API contract can evolve
//! independently.

use std::collections::BTreeSet;
use std::str::FromStr;

use crime_trends_incident_models::{FilterSelection, Incident, Season};
use serde::{Deserialize, Serialize};

/// Rows returned by the preview endpoint when no limit is given.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// Upper bound on the preview limit.
pub const MAX_PREVIEW_LIMIT: usize = 100;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Query parameters selecting years and seasons.
///
/// Both are comma-separated lists. An absent parameter selects everything
/// available; a present but empty one selects nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionQueryParams {
    /// Comma-separated years, e.g. `2021,2023`.
    pub years: Option<String>,
    /// Comma-separated season names, e.g. `Winter,Summer`.
    pub seasons: Option<String>,
}

impl SelectionQueryParams {
    /// Resolves these parameters against `all`, the selection of every
    /// available value. Entries that do not parse are skipped.
    #[must_use]
    pub fn selection(&self, all: &FilterSelection) -> FilterSelection {
        FilterSelection {
            years: resolve(self.years.as_deref(), &all.years),
            seasons: resolve(self.seasons.as_deref(), &all.seasons),
        }
    }
}

/// Query parameters for the preview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQueryParams {
    /// Comma-separated years.
    pub years: Option<String>,
    /// Comma-separated season names.
    pub seasons: Option<String>,
    /// Maximum number of rows, capped at [`MAX_PREVIEW_LIMIT`].
    pub limit: Option<usize>,
}

impl PreviewQueryParams {
    /// The year/season part of the query.
    #[must_use]
    pub fn selection_params(&self) -> SelectionQueryParams {
        SelectionQueryParams {
            years: self.years.clone(),
            seasons: self.seasons.clone(),
        }
    }

    /// The effective row limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PREVIEW_LIMIT)
            .min(MAX_PREVIEW_LIMIT)
    }
}

fn resolve<T: FromStr + Ord + Clone>(param: Option<&str>, all: &BTreeSet<T>) -> BTreeSet<T> {
    param.map_or_else(
        || all.clone(),
        |s| {
            s.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .filter_map(|v| v.parse().ok())
                .collect()
        },
    )
}

/// Row counts from loading the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoadReport {
    /// Data rows in the source file.
    pub total_rows: u64,
    /// Rows dropped for an unparseable date.
    pub unparseable_date: u64,
    /// Rows dropped for a year outside the supported range.
    pub out_of_range_year: u64,
    /// Rows dropped for a missing crime type.
    pub missing_crime_type: u64,
    /// Rows in the working dataset.
    pub loaded: u64,
}

/// Available filter values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilters {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct seasons, in calendar order.
    pub seasons: Vec<Season>,
    /// How the dataset was loaded.
    pub report: ApiLoadReport,
}

/// The first rows of a filtered dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPreview {
    /// Number of rows that passed the filter.
    pub total: usize,
    /// Up to `limit` rows, in dataset order.
    pub rows: Vec<Incident>,
}
