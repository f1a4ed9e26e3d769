#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine and aggregate views over the working incident dataset.
//!
//! [`filter::filter`] narrows the working dataset to a
//! [`FilterSelection`](crime_trends_incident_models::FilterSelection)
//! without copying any rows, and the functions in [`views`] summarize the
//! result. Both are total: any selection, including an empty one, yields a
//! valid (possibly empty) result.

pub mod filter;
pub mod views;

pub use filter::{FilteredDataset, default_selection, filter, filter_options};
pub use views::compute_views;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use crime_trends_incident_models::Incident;

    pub fn incident(y: i32, m: u32, d: u32, crime_type: &str, time: Option<&str>) -> Incident {
        Incident::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            time.map(String::from),
            crime_type.to_string(),
        )
    }

    /// The three-row dataset used throughout the view tests.
    pub fn three_rows() -> Vec<Incident> {
        vec![
            incident(2021, 1, 5, "Theft", Some("10:00")),
            incident(2021, 7, 20, "Assault", Some("14:00")),
            incident(2022, 1, 10, "Theft", Some("09:00")),
        ]
    }
}
