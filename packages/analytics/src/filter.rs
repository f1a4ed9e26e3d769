//! Year/season filtering.

use std::collections::BTreeSet;

use crime_trends_analytics_models::FilterOptions;
use crime_trends_incident_models::{FilterSelection, Incident, Season};

/// Number of rows shown by [`FilteredDataset::preview`].
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// A borrowed subset of the working dataset, in working-dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredDataset<'a> {
    rows: Vec<&'a Incident>,
}

impl<'a> FilteredDataset<'a> {
    /// A view over every incident.
    #[must_use]
    pub fn all(incidents: &'a [Incident]) -> Self {
        Self {
            rows: incidents.iter().collect(),
        }
    }

    /// The visible incidents.
    #[must_use]
    pub fn rows(&self) -> &[&'a Incident] {
        &self.rows
    }

    /// Iterates over the visible incidents.
    pub fn iter(&self) -> impl Iterator<Item = &'a Incident> + '_ {
        self.rows.iter().copied()
    }

    /// Number of visible incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing passed the filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` visible incidents.
    #[must_use]
    pub fn head(&self, n: usize) -> &[&'a Incident] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// The first [`DEFAULT_PREVIEW_ROWS`] visible incidents.
    #[must_use]
    pub fn preview(&self) -> &[&'a Incident] {
        self.head(DEFAULT_PREVIEW_ROWS)
    }
}

/// Returns the incidents whose year and season are both selected.
#[must_use]
pub fn filter<'a>(incidents: &'a [Incident], selection: &FilterSelection) -> FilteredDataset<'a> {
    if selection.is_empty() {
        log::debug!("Empty selection, nothing to show");
        return FilteredDataset::default();
    }

    let rows: Vec<&Incident> = incidents.iter().filter(|i| selection.matches(i)).collect();

    log::debug!(
        "Filter years={:?} seasons={:?}: {} of {} incidents",
        selection.years,
        selection.seasons,
        rows.len(),
        incidents.len()
    );

    FilteredDataset { rows }
}

/// The selection that shows everything: every year and season present.
#[must_use]
pub fn default_selection(incidents: &[Incident]) -> FilterSelection {
    FilterSelection {
        years: incidents.iter().map(|i| i.year).collect(),
        seasons: incidents.iter().map(|i| i.season).collect(),
    }
}

/// The distinct years and seasons a caller can choose from.
#[must_use]
pub fn filter_options(incidents: &[Incident]) -> FilterOptions {
    let years: BTreeSet<i32> = incidents.iter().map(|i| i.year).collect();
    let seasons: BTreeSet<Season> = incidents.iter().map(|i| i.season).collect();
    FilterOptions {
        years: years.into_iter().collect(),
        seasons: seasons.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{incident, three_rows};

    #[test]
    fn default_selection_is_identity() {
        let incidents = three_rows();
        let filtered = filter(&incidents, &default_selection(&incidents));
        assert_eq!(filtered, FilteredDataset::all(&incidents));
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn filters_by_year() {
        let incidents = three_rows();
        let filtered = filter(
            &incidents,
            &FilterSelection::new([2022], [Season::Winter, Season::Summer]),
        );
        assert_eq!(filtered.len(), 1);
        assert!(std::ptr::eq(filtered.rows()[0], &incidents[2]));
    }

    #[test]
    fn filters_by_season() {
        let incidents = three_rows();
        let filtered = filter(&incidents, &FilterSelection::new([2021, 2022], [Season::Winter]));
        let crime_types: Vec<&str> = filtered.iter().map(|i| i.crime_type.as_str()).collect();
        assert_eq!(crime_types, ["Theft", "Theft"]);
    }

    #[test]
    fn empty_years_yield_empty_dataset() {
        let incidents = three_rows();
        let filtered = filter(&incidents, &FilterSelection::new([], Season::all().to_vec()));
        assert!(filtered.is_empty());
    }

    #[test]
    fn empty_seasons_yield_empty_dataset() {
        let incidents = three_rows();
        let filtered = filter(&incidents, &FilterSelection::new([2021, 2022], []));
        assert!(filtered.is_empty());
    }

    #[test]
    fn unknown_year_matches_nothing() {
        let incidents = three_rows();
        let filtered = filter(&incidents, &FilterSelection::new([1999], Season::all().to_vec()));
        assert!(filtered.is_empty());
    }

    #[test]
    fn preserves_relative_order() {
        let incidents = vec![
            incident(2023, 12, 1, "C", None),
            incident(2021, 6, 1, "A", None),
            incident(2023, 1, 1, "B", None),
        ];
        let filtered = filter(&incidents, &FilterSelection::new([2023], [Season::Winter]));
        let crime_types: Vec<&str> = filtered.iter().map(|i| i.crime_type.as_str()).collect();
        assert_eq!(crime_types, ["C", "B"]);
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let incidents = vec![
            incident(2023, 9, 1, "A", None),
            incident(2021, 1, 1, "A", None),
            incident(2023, 4, 1, "A", None),
            incident(2021, 2, 1, "A", None),
        ];
        let options = filter_options(&incidents);
        assert_eq!(options.years, [2021, 2023]);
        assert_eq!(options.seasons, [Season::Winter, Season::Spring, Season::Fall]);
    }

    #[test]
    fn head_is_bounded() {
        let incidents = three_rows();
        let filtered = FilteredDataset::all(&incidents);
        assert_eq!(filtered.head(2).len(), 2);
        assert_eq!(filtered.head(10).len(), 3);
        assert_eq!(filtered.preview().len(), 3);
        assert!(FilteredDataset::default().preview().is_empty());
    }
}
