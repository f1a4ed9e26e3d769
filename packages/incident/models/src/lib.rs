#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record, temporal feature and filter selection types.
//!
//! This crate defines the normalized [`Incident`] row that every other
//! crate in the workspace works with, the calendar-derived attributes
//! ([`Season`], [`DayOfWeek`], [`TemporalFeatures`]) attached to it, and
//! the [`FilterSelection`] a caller uses to narrow the working dataset.

use std::collections::BTreeSet;

use chrono::{Datelike as _, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Meteorological season, derived purely from the month of an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Fall,
}

impl Season {
    /// Maps a month number to its season.
    ///
    /// Total over `u32`: anything that is not a winter, spring or summer
    /// month is treated as fall.
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Returns all variants of this enum in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Fall]
    }
}

/// Day of the week, ordered Monday first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// Returns all variants of this enum, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Calendar attributes computed from an incident date.
///
/// Pure function of the date: no timezone or locale is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFeatures {
    /// Calendar year.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
    /// Day of the month (1-31).
    pub day: u32,
    /// Day of the week.
    pub day_of_week: DayOfWeek,
    /// Season of [`Self::month`].
    pub season: Season,
}

impl TemporalFeatures {
    /// Derives every temporal attribute from `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            year: date.year(),
            month,
            day: date.day(),
            day_of_week: date.weekday().into(),
            season: Season::from_month(month),
        }
    }
}

/// A crime incident normalized to the canonical schema and enriched with
/// its temporal features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Calendar date the incident occurred on.
    pub date: NaiveDate,
    /// Time-of-day label exactly as recorded by the source. `None` when the
    /// source cell was empty.
    pub time: Option<String>,
    /// Offense label as recorded by the source.
    pub crime_type: String,
    /// Year of [`Self::date`].
    pub year: i32,
    /// Month of [`Self::date`] (1-12).
    pub month: u32,
    /// Day of the month of [`Self::date`].
    pub day: u32,
    /// Weekday of [`Self::date`].
    pub day_of_week: DayOfWeek,
    /// Season of [`Self::month`].
    pub season: Season,
}

impl Incident {
    /// Builds an incident from its source fields, deriving the temporal
    /// attributes from `date`.
    #[must_use]
    pub fn new(date: NaiveDate, time: Option<String>, crime_type: String) -> Self {
        let features = TemporalFeatures::from_date(date);
        Self {
            date,
            time,
            crime_type,
            year: features.year,
            month: features.month,
            day: features.day,
            day_of_week: features.day_of_week,
            season: features.season,
        }
    }
}

/// The years and seasons a caller wants to see.
///
/// An incident is visible when both its year and its season are selected,
/// so an empty set on either axis hides everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected calendar years.
    pub years: BTreeSet<i32>,
    /// Selected seasons.
    pub seasons: BTreeSet<Season>,
}

impl FilterSelection {
    /// Creates a selection from any iterables of years and seasons.
    #[must_use]
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        seasons: impl IntoIterator<Item = Season>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            seasons: seasons.into_iter().collect(),
        }
    }

    /// Returns `true` if `incident` passes this selection.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        self.years.contains(&incident.year) && self.seasons.contains(&incident.season)
    }

    /// Returns `true` if nothing can pass this selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.seasons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn season_is_total_over_months() {
        for m in [12, 1, 2] {
            assert_eq!(Season::from_month(m), Season::Winter, "month {m}");
        }
        for m in [3, 4, 5] {
            assert_eq!(Season::from_month(m), Season::Spring, "month {m}");
        }
        for m in [6, 7, 8] {
            assert_eq!(Season::from_month(m), Season::Summer, "month {m}");
        }
        for m in [9, 10, 11] {
            assert_eq!(Season::from_month(m), Season::Fall, "month {m}");
        }
        assert_eq!(Season::from_month(0), Season::Fall);
        assert_eq!(Season::from_month(13), Season::Fall);
    }

    #[test]
    fn season_names_roundtrip_through_strum() {
        for season in Season::all() {
            let name = season.to_string();
            assert_eq!(name.parse::<Season>().unwrap(), *season);
        }
        assert_eq!(Season::Winter.as_ref(), "Winter");
        assert!("winter".parse::<Season>().is_err());
    }

    #[test]
    fn weekday_names_are_full_english() {
        let names: Vec<String> = DayOfWeek::all().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    #[test]
    fn derives_features_from_date() {
        // 2021-01-05 was a Tuesday.
        let features = TemporalFeatures::from_date(date(2021, 1, 5));
        assert_eq!(features.year, 2021);
        assert_eq!(features.month, 1);
        assert_eq!(features.day, 5);
        assert_eq!(features.day_of_week, DayOfWeek::Tuesday);
        assert_eq!(features.season, Season::Winter);

        let features = TemporalFeatures::from_date(date(2023, 7, 20));
        assert_eq!(features.day_of_week, DayOfWeek::Thursday);
        assert_eq!(features.season, Season::Summer);
    }

    #[test]
    fn incident_new_fills_derived_fields() {
        let incident = Incident::new(date(2022, 11, 30), Some("23:15".to_string()), "Theft".into());
        assert_eq!(incident.year, 2022);
        assert_eq!(incident.month, 11);
        assert_eq!(incident.day, 30);
        assert_eq!(incident.day_of_week, DayOfWeek::Wednesday);
        assert_eq!(incident.season, Season::Fall);
    }

    #[test]
    fn selection_requires_both_axes() {
        let incident = Incident::new(date(2021, 7, 20), None, "Assault".into());

        let both = FilterSelection::new([2021], [Season::Summer]);
        assert!(both.matches(&incident));

        let wrong_year = FilterSelection::new([2022], [Season::Summer]);
        assert!(!wrong_year.matches(&incident));

        let no_seasons = FilterSelection::new([2021], []);
        assert!(no_seasons.is_empty());
        assert!(!no_seasons.matches(&incident));
    }
}
