//! Label → numeric code conversion.
//!
//! Every scalar categorical column is recoded through its fixed mapping from
//! the questionnaire definition. A value outside the mapping's domain is not
//! an error: it becomes missing, same as a blank answer. The 0–10 recommend
//! scale gets a specialized parse because the endpoints carry text labels
//! ("0 - Not at all likely" … "10 - Extremely likely") that platforms render
//! inconsistently.

use tracing::{debug, warn};

use crate::model::{Cell, Dataset};
use crate::questionnaire::{CODED_QUESTIONS, RECOMMEND};

/// Recode all scalar categorical columns in place.
pub fn convert_labels_to_codes(ds: &mut Dataset) {
    for question in CODED_QUESTIONS {
        if !ds.has_column(question.column) {
            warn!(column = question.column, "coded column absent, skipped");
            continue;
        }
        ds.map_column(question.column, |cell| match cell {
            Cell::Text(text) => match lookup(question.map, text) {
                Some(code) => Cell::Int(code),
                None => Cell::Missing,
            },
            // already-numeric cells pass through untouched
            other => other.clone(),
        });
        debug!(column = question.column, "recoded");
    }

    if ds.has_column(RECOMMEND) {
        ds.map_column(RECOMMEND, |cell| match cell {
            Cell::Text(text) => match parse_recommendation(text) {
                Some(score) => Cell::Int(score),
                None => Cell::Missing,
            },
            other => other.clone(),
        });
    }
}

fn lookup(map: &[(&str, i64)], text: &str) -> Option<i64> {
    map.iter()
        .find(|(label, _)| *label == text)
        .map(|(_, code)| *code)
}

/// Parse a recommend-likelihood answer to its 0–10 score.
///
/// Endpoint texts are matched case-insensitively as substrings, so
/// "Extremely likely", "10 - Extremely likely" and "extremely likely" all
/// map to 10. Anything else is parsed numerically (floats truncate), and
/// unparseable input yields `None`, never an error.
pub fn parse_recommendation(text: &str) -> Option<i64> {
    let lower = text.to_lowercase();
    if lower.contains("not at all likely") {
        return Some(0);
    }
    if lower.contains("extremely likely") {
        return Some(10);
    }
    text.trim().parse::<f64>().ok().map(|v| v as i64)
}

// =============================================================================
// Tests
// =============================================================================
