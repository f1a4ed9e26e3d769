//! The six aggregate views.
//!
//! Each view tallies the filtered incidents into a `BTreeMap` keyed by its
//! grouping columns and then materializes the tally on the view's axes.
//! Views are independent of each other and of incident order.

use std::collections::{BTreeMap, BTreeSet};

use crime_trends_analytics_models::{
    AggregateViews, CountMatrix, CrimeTypeDistribution, CrimeTypeShare, WeekdayTimeMatrix,
    YearCount, YearCrimeTypeMatrix, YearMonthMatrix, YearSeasonMatrix,
};
use crime_trends_incident_models::{DayOfWeek, Incident};

use crate::filter::FilteredDataset;

/// Computes every view over `data`.
#[must_use]
pub fn compute_views(data: &FilteredDataset<'_>) -> AggregateViews {
    AggregateViews {
        row_count: data.len() as u64,
        yearly_totals: yearly_totals(data),
        year_season: year_season(data),
        year_crime_type: year_crime_type(data),
        weekday_time: weekday_time(data),
        crime_type_distribution: crime_type_distribution(data),
        monthly_trends: monthly_trends(data),
    }
}

/// Incidents per year, ascending. Only years that occur are listed.
#[must_use]
pub fn yearly_totals(data: &FilteredDataset<'_>) -> Vec<YearCount> {
    let mut tally: BTreeMap<i32, u64> = BTreeMap::new();
    for incident in data.iter() {
        *tally.entry(incident.year).or_default() += 1;
    }
    tally
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Incidents per year (rows) and season (columns, calendar order).
#[must_use]
pub fn year_season(data: &FilteredDataset<'_>) -> YearSeasonMatrix {
    let rows = distinct(data, |i| i.year);
    let columns = distinct(data, |i| i.season);
    tally_matrix(data, rows, columns, |i| Some((i.year, i.season)))
}

/// Incidents per year (rows) and crime type (columns, lexicographic).
#[must_use]
pub fn year_crime_type(data: &FilteredDataset<'_>) -> YearCrimeTypeMatrix {
    let rows = distinct(data, |i| i.year);
    let columns = distinct(data, |i| i.crime_type.clone());
    tally_matrix(data, rows, columns, |i| Some((i.year, i.crime_type.clone())))
}

/// Incidents per weekday (all seven rows, Monday first) and time-of-day
/// label (columns, lexicographic).
///
/// Time labels are opaque categories: no bucketing is applied, and
/// incidents without a time label are left out of this view.
#[must_use]
pub fn weekday_time(data: &FilteredDataset<'_>) -> WeekdayTimeMatrix {
    let columns: Vec<String> = data
        .iter()
        .filter_map(|i| i.time.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    tally_matrix(data, DayOfWeek::all().to_vec(), columns, |i| {
        i.time.clone().map(|t| (i.day_of_week, t))
    })
}

/// Crime types ranked by count (descending, ties by name) with their share
/// of the total.
#[must_use]
pub fn crime_type_distribution(data: &FilteredDataset<'_>) -> CrimeTypeDistribution {
    let mut tally: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in data.iter() {
        *tally.entry(incident.crime_type.as_str()).or_default() += 1;
    }

    let total = data.len() as u64;
    let mut ranked: Vec<(&str, u64)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    #[allow(clippy::cast_precision_loss)]
    let shares = ranked
        .into_iter()
        .map(|(crime_type, count)| CrimeTypeShare {
            crime_type: crime_type.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    CrimeTypeDistribution { total, shares }
}

/// Incidents per year (rows) and month (columns, always 1 through 12).
#[must_use]
pub fn monthly_trends(data: &FilteredDataset<'_>) -> YearMonthMatrix {
    let rows = distinct(data, |i| i.year);
    tally_matrix(data, rows, (1..=12).collect(), |i| Some((i.year, i.month)))
}

/// Distinct values of `key` over `data`, in key order.
fn distinct<K: Ord>(data: &FilteredDataset<'_>, key: impl Fn(&Incident) -> K) -> Vec<K> {
    data.iter()
        .map(key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts `data` into a matrix with the given axes.
///
/// `key` returns `None` for incidents that have no cell in this view.
/// Keys that fall outside the axes are ignored.
fn tally_matrix<R, C>(
    data: &FilteredDataset<'_>,
    rows: Vec<R>,
    columns: Vec<C>,
    key: impl Fn(&Incident) -> Option<(R, C)>,
) -> CountMatrix<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    let row_index: BTreeMap<R, usize> = rows.iter().cloned().zip(0..).collect();
    let column_index: BTreeMap<C, usize> = columns.iter().cloned().zip(0..).collect();

    let mut matrix = CountMatrix::zeroed(rows, columns);
    for (r, c) in data.iter().filter_map(key) {
        if let (Some(&r), Some(&c)) = (row_index.get(&r), column_index.get(&c)) {
            matrix.counts[r][c] += 1;
        }
    }
    matrix
}
