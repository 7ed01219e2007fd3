//! Multi-response expansion (one-hot encoding).
//!
//! A multi-select answer arrives as a single delimited text field listing the
//! chosen option labels. Each catalog option becomes its own binary column
//! `{question_code}_{option_code}`, set to 1 when the option label occurs in
//! the answer text as a literal substring. The "Other (please specify)"
//! option is different: the platform stores its text in a companion column,
//! so its indicator reflects whether that companion is answered.
//!
//! Labels are regex-escaped before matching so punctuation like
//! "Outdoor (billboards, bus stops, etc.)" is matched literally.

use regex::Regex;
use tracing::{debug, warn};

use crate::model::{Cell, Dataset};
use crate::questionnaire::{other_column, MultiQuestion, MULTI_QUESTIONS, OTHER_LABEL};

/// Expand every multi-select question in the instrument.
pub fn expand_multiresponse(ds: &mut Dataset) {
    for question in MULTI_QUESTIONS {
        expand_question(ds, question);
    }
}

/// Expand one multi-select question into its indicator columns, then drop
/// the source column. A question whose source column is absent from this
/// export is skipped.
pub fn expand_question(ds: &mut Dataset, question: &MultiQuestion) {
    if !ds.has_column(question.column) {
        warn!(question = question.code, "multi-select source column absent, skipped");
        return;
    }

    for (label, option_code) in question.options {
        let indicator = format!("{}_{}", question.code, option_code);
        if *label == OTHER_LABEL {
            expand_other_option(ds, question, &indicator);
        } else {
            expand_listed_option(ds, question, label, &indicator);
        }
    }

    debug!(question = question.code, "expanded, dropping source column");
    ds.drop_column(question.column);
}

/// Indicator from literal substring presence of the option label.
fn expand_listed_option(ds: &mut Dataset, question: &MultiQuestion, label: &str, indicator: &str) {
    let pattern = Regex::new(&regex::escape(label)).expect("escaped literal is a valid pattern");
    let source = question.column;

    let hits: Vec<bool> = (0..ds.n_rows())
        .map(|row| {
            ds.get(row, source)
                .and_then(Cell::as_str)
                .is_some_and(|text| pattern.is_match(text))
        })
        .collect();

    ds.add_column(indicator, Cell::Int(0));
    for (row, hit) in hits.into_iter().enumerate() {
        if hit {
            ds.set(row, indicator, Cell::Int(1));
        }
    }
}

/// Indicator from the companion free-text column being answered. A missing
/// companion column means nobody chose "Other" in this export.
fn expand_other_option(ds: &mut Dataset, question: &MultiQuestion, indicator: &str) {
    let companion = other_column(question.column);

    let hits: Vec<bool> = (0..ds.n_rows())
        .map(|row| {
            ds.get(row, &companion)
                .map(|cell| !cell.is_missing())
                .unwrap_or(false)
        })
        .collect();

    ds.add_column(indicator, Cell::Int(0));
    for (row, hit) in hits.into_iter().enumerate() {
        if hit {
            ds.set(row, indicator, Cell::Int(1));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{self as q};

    fn awareness_dataset(answers: &[&str]) -> Dataset {
        let mut ds = Dataset::new(vec![
            "ID".into(),
            q::AWARENESS.into(),
            other_column(q::AWARENESS),
        ]);
        for (i, answer) in answers.iter().enumerate() {
            ds.push_row(vec![
                Cell::Text((i + 1).to_string()),
                Cell::from_raw(answer),
                Cell::Missing,
            ]);
        }
        ds
    }

    #[test]
    fn test_indicators_from_substring() {
        let mut ds = awareness_dataset(&["Origin, AGL", "Synergy", ""]);
        expand_question(&mut ds, &q::Q1_MULTI);

        assert_eq!(ds.get(0, "Q1_4"), Some(&Cell::Int(1))); // Origin
        assert_eq!(ds.get(0, "Q1_3"), Some(&Cell::Int(1))); // AGL
        assert_eq!(ds.get(0, "Q1_1"), Some(&Cell::Int(0))); // Synergy
        assert_eq!(ds.get(1, "Q1_1"), Some(&Cell::Int(1)));
        assert_eq!(ds.get(2, "Q1_4"), Some(&Cell::Int(0))); // missing answer
    }

    #[test]
    fn test_expansion_is_order_independent() {
        let mut ds = awareness_dataset(&["AGL, Origin", "Origin, AGL"]);
        expand_question(&mut ds, &q::Q1_MULTI);
        for row in 0..2 {
            assert_eq!(ds.get(row, "Q1_3"), Some(&Cell::Int(1)));
            assert_eq!(ds.get(row, "Q1_4"), Some(&Cell::Int(1)));
        }
    }

    #[test]
    fn test_punctuated_label_matched_literally() {
        let mut ds = Dataset::new(vec!["ID".into(), q::AD_CHANNELS.into()]);
        ds.push_row(vec![
            Cell::Text("1".into()),
            Cell::Text("Outdoor (billboards, bus stops, etc.), Radio".into()),
        ]);
        ds.push_row(vec![Cell::Text("2".into()), Cell::Text("TV".into())]);
        expand_question(&mut ds, &q::Q7_MULTI);

        assert_eq!(ds.get(0, "Q7_3"), Some(&Cell::Int(1)));
        assert_eq!(ds.get(0, "Q7_4"), Some(&Cell::Int(1)));
        assert_eq!(ds.get(1, "Q7_3"), Some(&Cell::Int(0)));
        assert_eq!(ds.get(1, "Q7_1"), Some(&Cell::Int(1)));
    }

    #[test]
    fn test_other_uses_companion_column() {
        let mut ds = awareness_dataset(&["Origin", "Synergy"]);
        ds.set(
            0,
            &other_column(q::AWARENESS),
            Cell::Text("Some local co-op".into()),
        );
        expand_question(&mut ds, &q::Q1_MULTI);

        assert_eq!(ds.get(0, "Q1_97"), Some(&Cell::Int(1)));
        assert_eq!(ds.get(1, "Q1_97"), Some(&Cell::Int(0)));
    }

    #[test]
    fn test_other_without_companion_column_is_all_zero() {
        let mut ds = Dataset::new(vec!["ID".into(), q::AD_CHANNELS.into()]);
        ds.push_row(vec![Cell::Text("1".into()), Cell::Text("TV".into())]);
        expand_question(&mut ds, &q::Q7_MULTI);
        assert_eq!(ds.get(0, "Q7_97"), Some(&Cell::Int(0)));
    }

    #[test]
    fn test_none_of_these_indicator() {
        let mut ds = awareness_dataset(&["None of these", "Origin"]);
        expand_question(&mut ds, &q::Q1_MULTI);
        assert_eq!(ds.get(0, "Q1_99"), Some(&Cell::Int(1)));
        assert_eq!(ds.get(1, "Q1_99"), Some(&Cell::Int(0)));
    }

    #[test]
    fn test_source_column_removed() {
        let mut ds = awareness_dataset(&["Origin"]);
        expand_question(&mut ds, &q::Q1_MULTI);
        assert!(!ds.has_column(q::AWARENESS));
        // the companion free-text column survives
        assert!(ds.has_column(&other_column(q::AWARENESS)));
    }

    #[test]
    fn test_absent_source_column_skips_question() {
        let mut ds = Dataset::new(vec!["ID".into()]);
        ds.push_row(vec![Cell::Text("1".into())]);
        expand_question(&mut ds, &q::Q7_MULTI);
        assert!(!ds.has_column("Q7_1"));
    }
}
