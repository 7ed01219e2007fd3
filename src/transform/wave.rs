//! Wave assignment: week-bucketing respondents by completion date.
//!
//! Wave 1 is the week commencing the fieldwork anchor Monday; each later
//! Monday starts the next wave. Dates before the anchor are clamped to
//! wave 1 rather than going negative; early soft-launch completes belong to
//! the first week.
//!
//! The completion timestamp is also normalized to `YYYY-MM-DD HH:MM:SS`
//! text for output; this is a display normalization only.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::model::{Cell, Dataset};
use crate::questionnaire::{COMPLETED_DATE, WAVE, WAVE_ANCHOR};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp layouts seen across survey-platform exports.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Derive the wave column from the completion timestamp and canonicalize the
/// timestamp text. The wave column is inserted directly before the
/// completion timestamp, matching the target schema order. Skipped when the
/// dataset carries no completion timestamp.
pub fn assign_wave(ds: &mut Dataset) {
    if !ds.has_column(COMPLETED_DATE) {
        warn!("completion timestamp column absent, wave not assigned");
        return;
    }

    ds.insert_column_before(WAVE, COMPLETED_DATE, Cell::Missing);

    for row in 0..ds.n_rows() {
        let parsed = ds
            .get(row, COMPLETED_DATE)
            .and_then(Cell::as_str)
            .and_then(parse_timestamp);

        match parsed {
            Some(dt) => {
                ds.set(row, WAVE, Cell::Int(week_index(dt.date())));
                ds.set(
                    row,
                    COMPLETED_DATE,
                    Cell::Text(dt.format(OUTPUT_FORMAT).to_string()),
                );
            }
            None => {
                if !ds.get(row, COMPLETED_DATE).map_or(true, Cell::is_missing) {
                    warn!(row, "unparseable completion timestamp, wave left missing");
                }
            }
        }
    }
}

/// Week index relative to the anchor Monday, minimum 1.
pub fn week_index(date: NaiveDate) -> i64 {
    let delta_days = (date - *WAVE_ANCHOR).num_days();
    (delta_days.div_euclid(7) + 1).max(1)
}

/// Parse a completion timestamp in any accepted layout.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    for format in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_ONLY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_index_on_anchor_is_one() {
        assert_eq!(week_index(date(2025, 8, 4)), 1);
    }

    #[test]
    fn test_week_index_buckets() {
        assert_eq!(week_index(date(2025, 8, 5)), 1);
        assert_eq!(week_index(date(2025, 8, 10)), 1); // Sunday of week 1
        assert_eq!(week_index(date(2025, 8, 11)), 2); // next Monday
        assert_eq!(week_index(date(2025, 8, 25)), 4);
    }

    #[test]
    fn test_week_index_clamped_before_anchor() {
        assert_eq!(week_index(date(2025, 8, 1)), 1);
        assert_eq!(week_index(date(2025, 7, 1)), 1);
    }

    #[test]
    fn test_week_index_monotone_in_date() {
        let mut last = 0;
        for offset in 0..60 {
            let d = date(2025, 7, 20) + chrono::Duration::days(offset);
            let w = week_index(d);
            assert!(w >= last, "wave decreased at {d}");
            assert!(w >= 1);
            last = w;
        }
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert!(parse_timestamp("2025-08-05 10:00:00").is_some());
        assert!(parse_timestamp("2025-08-05T10:00:00").is_some());
        assert!(parse_timestamp("05/08/2025 10:00").is_some());
        assert!(parse_timestamp("2025-08-05").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_assign_wave_and_canonicalize() {
        let mut ds = Dataset::new(vec!["ID".into(), COMPLETED_DATE.into()]);
        ds.push_row(vec![
            Cell::Text("1".into()),
            Cell::Text("05/08/2025 10:00".into()),
        ]);
        ds.push_row(vec![
            Cell::Text("2".into()),
            Cell::Text("2025-08-12 09:30:00".into()),
        ]);
        assign_wave(&mut ds);

        // wave sits before the timestamp
        assert_eq!(ds.columns(), &["ID", WAVE, COMPLETED_DATE]);
        assert_eq!(ds.get(0, WAVE), Some(&Cell::Int(1)));
        assert_eq!(ds.get(1, WAVE), Some(&Cell::Int(2)));
        assert_eq!(
            ds.get(0, COMPLETED_DATE),
            Some(&Cell::Text("2025-08-05 10:00:00".into()))
        );
    }

    #[test]
    fn test_unparseable_timestamp_leaves_wave_missing() {
        let mut ds = Dataset::new(vec![COMPLETED_DATE.into()]);
        ds.push_row(vec![Cell::Text("not a date".into())]);
        assign_wave(&mut ds);
        assert_eq!(ds.get(0, WAVE), Some(&Cell::Missing));
        assert_eq!(ds.get(0, COMPLETED_DATE), Some(&Cell::Text("not a date".into())));
    }

    #[test]
    fn test_missing_timestamp_column_skips_stage() {
        let mut ds = Dataset::new(vec!["ID".into()]);
        ds.push_row(vec![Cell::Text("1".into())]);
        assign_wave(&mut ds);
        assert!(!ds.has_column(WAVE));
    }
}
