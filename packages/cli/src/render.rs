//! Plain-text rendering of the preview and aggregate views.

use std::fmt::{Display, Write as _};

use crime_trends_analytics_models::{AggregateViews, CountMatrix, CrimeTypeDistribution, YearCount};
use crime_trends_incident_models::Incident;
use crime_trends_loader::LoadReport;

/// Renders the load report as a one-line summary.
#[must_use]
pub fn report(report: &LoadReport) -> String {
    format!(
        "Loaded {} of {} rows ({} excluded: {} unparseable date, {} out of range, {} missing crime type)",
        report.loaded,
        report.total_rows,
        report.excluded(),
        report.unparseable_date,
        report.out_of_range_year,
        report.missing_crime_type,
    )
}

/// Renders preview rows as a table.
#[must_use]
pub fn preview(rows: &[&Incident], total: usize) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|i| {
            vec![
                i.date.to_string(),
                i.time.clone().unwrap_or_default(),
                i.crime_type.clone(),
                i.day_of_week.to_string(),
                i.season.to_string(),
            ]
        })
        .collect();

    let mut out = format!("Preview ({} of {total} rows)\n", rows.len());
    out.push_str(&table(
        &["Date", "Time", "CrimeType", "DayOfWeek", "Season"],
        &cells,
    ));
    out
}

/// Renders all six views, one titled block each.
#[must_use]
pub fn views(views: &AggregateViews) -> String {
    [
        yearly_totals(&views.yearly_totals),
        matrix("Incidents by year and season", &views.year_season),
        matrix("Incidents by year and crime type", &views.year_crime_type),
        matrix("Incidents by weekday and time", &views.weekday_time),
        distribution(&views.crime_type_distribution),
        matrix("Monthly trends", &views.monthly_trends),
    ]
    .join("\n")
}

fn yearly_totals(totals: &[YearCount]) -> String {
    let cells: Vec<Vec<String>> = totals
        .iter()
        .map(|y| vec![y.year.to_string(), y.count.to_string()])
        .collect();
    titled("Yearly totals", &table(&["Year", "Count"], &cells))
}

fn distribution(dist: &CrimeTypeDistribution) -> String {
    let cells: Vec<Vec<String>> = dist
        .shares
        .iter()
        .map(|s| {
            vec![
                s.crime_type.clone(),
                s.count.to_string(),
                format!("{:.1}%", s.percentage),
            ]
        })
        .collect();
    titled(
        "Crime type distribution",
        &table(&["CrimeType", "Count", "Share"], &cells),
    )
}

/// Renders a count matrix with row keys down the left.
#[must_use]
pub fn matrix<R: Display, C: Display>(title: &str, m: &CountMatrix<R, C>) -> String {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(m.columns.iter().map(ToString::to_string))
        .collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();

    let cells: Vec<Vec<String>> = m
        .rows
        .iter()
        .zip(&m.counts)
        .map(|(r, counts)| {
            std::iter::once(r.to_string())
                .chain(counts.iter().map(ToString::to_string))
                .collect()
        })
        .collect();

    titled(title, &table(&header, &cells))
}

fn titled(title: &str, body: &str) -> String {
    format!("{title}\n{}\n{body}", "-".repeat(title.len()))
}

fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, header.iter().copied(), &widths);
    for row in rows {
        write_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let parts: Vec<String> = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", parts.join("  ").trim_end());
}
