//! CSV reading and normalization.
//!
//! The steps run in a fixed order: drop the irrelevant columns, resolve
//! the canonical `Date`/`Time`/`CrimeType` columns, parse each date,
//! exclude out-of-range years, then exclude rows that still lack a date or
//! a crime type. Excluded rows are counted in the [`LoadReport`], never
//! reported as errors.

use std::io::Read;
use std::sync::Arc;

use chrono::Datelike as _;
use crime_trends_incident_models::Incident;

use crate::derive::{NormalizedRow, derive_features};
use crate::parsing::{parse_date, present};
use crate::progress::ProgressCallback;
use crate::schema::SchemaConfig;
use crate::{LoadError, LoadReport};

/// Rows between progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Positions of the canonical columns in a source header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Index of the `Date` column.
    pub date: usize,
    /// Index of the `Time` column.
    pub time: usize,
    /// Index of the `CrimeType` column.
    pub crime_type: usize,
}

impl ColumnPlan {
    /// Resolves the canonical columns against a header row.
    ///
    /// Headers on the schema's drop list are removed first, so a dropped
    /// column can never satisfy a rename. Each canonical column then takes
    /// the first of its aliases (or its canonical name) that is present.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingColumns`] naming every canonical column
    /// that has no matching header.
    pub fn resolve(headers: &[String], schema: &SchemaConfig) -> Result<Self, LoadError> {
        let retained: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                let dropped = schema.is_dropped(h);
                if dropped {
                    log::trace!("[{}] Dropping column {h}", schema.id);
                }
                !dropped
            })
            .map(|(i, h)| (i, h.as_str()))
            .collect();

        let mut indices = [None; 3];
        let mut missing = Vec::new();

        for (slot, (canonical, aliases)) in indices.iter_mut().zip(schema.fields.canonical()) {
            *slot = aliases
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(canonical))
                .find_map(|name| retained.iter().find(|(_, h)| *h == name).map(|(i, _)| *i));
            if slot.is_none() {
                missing.push(canonical.to_string());
            }
        }

        match indices {
            [Some(date), Some(time), Some(crime_type)] => Ok(Self {
                date,
                time,
                crime_type,
            }),
            _ => Err(LoadError::MissingColumns { columns: missing }),
        }
    }
}

/// Reads delimited text from `reader` and returns the normalized,
/// feature-enriched incidents along with the exclusion counts.
///
/// `progress` receives the byte offset of the reader every
/// [`PROGRESS_INTERVAL`] rows; the caller sets the total.
///
/// # Errors
///
/// Returns [`LoadError`] if the text cannot be read or a required column
/// is missing.
pub fn load_reader<R: Read>(
    reader: R,
    schema: &SchemaConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<Incident>, LoadReport), LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_owned())
        .collect();

    let plan = ColumnPlan::resolve(&headers, schema)?;
    log::debug!(
        "[{}] Resolved columns: Date={} Time={} CrimeType={}",
        schema.id,
        headers[plan.date],
        headers[plan.time],
        headers[plan.crime_type],
    );

    let mut report = LoadReport::default();
    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();

    while csv_reader.read_byte_record(&mut record)? {
        report.total_rows += 1;
        if report.total_rows % PROGRESS_INTERVAL == 0 {
            progress.set_position(csv_reader.position().byte());
        }

        let cell = |idx: usize| record.get(idx).map(String::from_utf8_lossy);

        let date = cell(plan.date).and_then(|s| parse_date(&s, &schema.date_formats));
        let Some(date) = date else {
            report.unparseable_date += 1;
            continue;
        };
        if !schema.years.contains(date.year()) {
            report.out_of_range_year += 1;
            continue;
        }
        let crime_type = cell(plan.crime_type);
        let Some(crime_type) = present(crime_type.as_deref(), schema) else {
            report.missing_crime_type += 1;
            continue;
        };
        let crime_type = crime_type.trim().to_owned();
        let time = cell(plan.time);
        let time = present(time.as_deref(), schema).map(str::to_owned);

        rows.push(NormalizedRow {
            date,
            time,
            crime_type,
        });
    }

    let incidents = derive_features(rows);
    report.loaded = incidents.len() as u64;

    progress.set_position(csv_reader.position().byte());

    Ok((incidents, report))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_trends_incident_models::Season;

    use super::*;
    use crate::progress::null_progress;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn load(text: &str) -> Result<(Vec<Incident>, LoadReport), LoadError> {
        load_reader(text.as_bytes(), &SchemaConfig::st_louis(), &null_progress())
    }

    #[test]
    fn resolves_source_names() {
        let plan = ColumnPlan::resolve(
            &headers(&["IncidentNum", "IncidentDate", "Offense", "OccurredFromTime"]),
            &SchemaConfig::st_louis(),
        )
        .unwrap();
        assert_eq!(
            plan,
            ColumnPlan {
                date: 1,
                time: 3,
                crime_type: 2
            }
        );
    }

    #[test]
    fn resolves_canonical_names() {
        let plan = ColumnPlan::resolve(
            &headers(&["Date", "Time", "CrimeType", "Year"]),
            &SchemaConfig::st_louis(),
        )
        .unwrap();
        assert_eq!(plan.date, 0);
        assert_eq!(plan.time, 1);
        assert_eq!(plan.crime_type, 2);
    }

    #[test]
    fn source_alias_wins_over_canonical_name() {
        let plan = ColumnPlan::resolve(
            &headers(&["Date", "IncidentDate", "Time", "Offense"]),
            &SchemaConfig::st_louis(),
        )
        .unwrap();
        assert_eq!(plan.date, 1);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = ColumnPlan::resolve(&headers(&["IncidentDate"]), &SchemaConfig::st_louis())
            .unwrap_err();
        match err {
            LoadError::MissingColumns { columns } => {
                assert_eq!(columns, ["Time", "CrimeType"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dropped_column_cannot_satisfy_rename() {
        let mut schema = SchemaConfig::st_louis();
        schema.fields.crime_type = vec!["NIBRSCategory".to_string()];
        let err = ColumnPlan::resolve(
            &headers(&["IncidentDate", "OccurredFromTime", "NIBRSCategory"]),
            &schema,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumns { .. }));
    }

    #[test]
    fn loads_and_derives() {
        let (incidents, report) = load(
            "IncidentNum,IncidentDate,OccurredFromTime,Offense,District,Latitude\n\
             1,2021-01-05,10:00,Theft,3,38.6\n\
             2,2021-07-20,14:00,Assault,4,38.7\n\
             3,2022-01-10,09:00,Theft,5,38.5\n",
        )
        .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded, 3);
        assert_eq!(report.excluded(), 0);
        assert_eq!(incidents.len(), 3);
        assert_eq!(incidents[1].crime_type, "Assault");
        assert_eq!(incidents[1].time.as_deref(), Some("14:00"));
        assert_eq!(incidents[1].season, Season::Summer);
        assert_eq!(incidents[2].year, 2022);
    }

    #[test]
    fn excludes_and_counts_each_reason() {
        let (incidents, report) = load(
            "IncidentDate,OccurredFromTime,Offense\n\
             2021-01-05,10:00,Theft\n\
             garbage,10:00,Theft\n\
             ,11:00,Theft\n\
             2020-12-31,10:00,Theft\n\
             2024-01-01,10:00,Theft\n\
             2022-06-01,10:00,\n\
             2022-06-02,10:00,   \n\
             2022-06-03,10:00,N/A\n\
             2022-06-04,10:00,NULL\n\
             2023-12-31,,Burglary\n",
        )
        .unwrap();

        assert_eq!(report.total_rows, 10);
        assert_eq!(report.unparseable_date, 2);
        assert_eq!(report.out_of_range_year, 2);
        assert_eq!(report.missing_crime_type, 4);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.excluded(), 8);

        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[1].crime_type, "Burglary");
        assert_eq!(incidents[1].time, None);
    }

    #[test]
    fn accepts_every_listed_date_shape() {
        let (incidents, report) = load(
            "IncidentDate,OccurredFromTime,Offense\n\
             2021-01-05T10:00:00Z,10:00,Theft\n\
             2021-01-05 10:00:00-06:00,10:00,Theft\n\
             2021/01/05,10:00,Theft\n\
             01/05/2021 10:00 AM,10:00,Theft\n\
             2021-01-05,10:00,Theft\n\
             01/05/2021,10:00,Theft\n",
        )
        .unwrap();
        assert_eq!(report.unparseable_date, 0);
        assert_eq!(report.loaded, 6);
        assert!(
            incidents
                .iter()
                .all(|i| i.date == NaiveDate::from_ymd_opt(2021, 1, 5).unwrap())
        );
    }

    #[test]
    fn na_time_is_missing_and_other_times_are_kept_verbatim() {
        let (incidents, _) = load(
            "IncidentDate,OccurredFromTime,Offense\n\
             2021-01-05, 10:00 ,Theft\n\
             2021-01-06,N/A,Theft\n\
             2021-01-07,null,Theft\n\
             2021-01-08,  ,Theft\n",
        )
        .unwrap();
        assert_eq!(incidents.len(), 4);
        assert_eq!(incidents[0].time.as_deref(), Some(" 10:00 "));
        assert!(incidents[1..].iter().all(|i| i.time.is_none()));
    }

    #[test]
    fn crime_type_is_trimmed() {
        let (incidents, _) =
            load("IncidentDate,OccurredFromTime,Offense\n2021-01-05,10:00, Theft \n").unwrap();
        assert_eq!(incidents[0].crime_type, "Theft");
    }

    #[test]
    fn out_of_range_wins_over_missing_crime_type() {
        let (_, report) =
            load("IncidentDate,OccurredFromTime,Offense\n2019-05-05,10:00,\n").unwrap();
        assert_eq!(report.out_of_range_year, 1);
        assert_eq!(report.missing_crime_type, 0);
    }

    #[test]
    fn tolerates_short_rows() {
        let (incidents, report) = load(
            "IncidentDate,Offense,OccurredFromTime\n\
             2021-03-03,Fraud\n\
             2021-03-04\n",
        )
        .unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].time, None);
        assert_eq!(report.missing_crime_type, 1);
    }

    #[test]
    fn every_loaded_row_satisfies_invariants() {
        let (incidents, _) = load(
            "IncidentDate,OccurredFromTime,Offense\n\
             2021-01-01,00:01,A\n\
             2023-12-31,23:59,B\n\
             2020-06-06,12:00,C\n\
             bad,12:00,D\n\
             2022-02-02,12:00,\n",
        )
        .unwrap();
        assert_eq!(incidents.len(), 2);
        for incident in &incidents {
            assert!((2021..=2023).contains(&incident.year));
            assert!(!incident.crime_type.is_empty());
        }
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let (incidents, report) = load("IncidentDate,OccurredFromTime,Offense\n").unwrap();
        assert!(incidents.is_empty());
        assert_eq!(report.total_rows, 0);
    }

    #[test]
    fn empty_file_is_missing_columns() {
        let err = load("").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumns { .. }));
    }
}
