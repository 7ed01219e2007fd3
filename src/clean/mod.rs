//! Invalid-case removal.
//!
//! Applies the survey-logic and completeness rules to the raw dataset, in
//! fixed order. Each rule sees the dataset as already narrowed by the rules
//! before it, and each rule runs only when every column it references exists
//! in the input; exports from earlier instrument waves may lack whole
//! question blocks, and that must not be an error.
//!
//! The rules themselves never fail; their output is the filtered dataset
//! plus a [`CleanReport`] of per-rule counts and the IDs of the rows that
//! were removed, for analyst inspection.

use serde::Serialize;
use tracing::{info, warn};

use crate::model::{Cell, Dataset};
use crate::questionnaire as q;

// =============================================================================
// Report types
// =============================================================================

/// Outcome of a single validation rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    /// Rule identifier as used in fieldwork QA ("Error1".."Error5").
    pub rule: &'static str,
    /// Human description of what the rule removes.
    pub description: &'static str,
    /// Whether the rule ran (false when its columns were absent).
    pub applied: bool,
    /// Rows removed by this rule.
    pub removed: usize,
    /// Respondent IDs of the removed rows.
    pub ids: Vec<String>,
}

/// Summary of the whole validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub initial_rows: usize,
    pub final_rows: usize,
    /// Fully-blank rows removed before any rule ran.
    pub blank_rows: usize,
    pub outcomes: Vec<RuleOutcome>,
}

impl CleanReport {
    pub fn total_removed(&self) -> usize {
        self.initial_rows - self.final_rows
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Remove invalid records: blank rows, missing key data and skip-logic
/// violations. Mutates the dataset in place and returns the diagnostics.
pub fn remove_invalid_cases(ds: &mut Dataset) -> CleanReport {
    let initial_rows = ds.n_rows();

    // Whitespace-only answers count as missing everywhere downstream.
    normalize_whitespace(ds);
    let blank_rows = drop_blank_rows(ds);
    if blank_rows > 0 {
        info!(removed = blank_rows, "removed fully blank rows");
    }

    let mut outcomes = Vec::new();
    outcomes.push(apply_rule(ds, RULE_MISSING_KEY));
    outcomes.push(apply_rule(ds, RULE_UNDERAGE));
    outcomes.push(apply_rule(ds, RULE_NONE_BUT_ANSWERED));
    outcomes.push(apply_rule(ds, RULE_NON_CUSTOMER_RATED));
    outcomes.push(apply_rule(ds, RULE_UNEXPOSED_CHANNELS));

    let final_rows = ds.n_rows();
    info!(
        initial = initial_rows,
        remaining = final_rows,
        "invalid record removal completed"
    );
    check_id_integrity(ds);

    CleanReport {
        initial_rows,
        final_rows,
        blank_rows,
        outcomes,
    }
}

// =============================================================================
// Rule machinery
// =============================================================================

/// A validation rule: the columns it needs, and a predicate marking rows to
/// remove. `select` is only called when every required column exists.
struct Rule {
    name: &'static str,
    description: &'static str,
    required: fn() -> Vec<&'static str>,
    select: fn(&Dataset, usize) -> bool,
}

fn apply_rule(ds: &mut Dataset, rule: Rule) -> RuleOutcome {
    let required = (rule.required)();
    if !ds.has_columns(&required) {
        warn!(rule = rule.name, "rule skipped: referenced columns absent");
        return RuleOutcome {
            rule: rule.name,
            description: rule.description,
            applied: false,
            removed: 0,
            ids: Vec::new(),
        };
    }

    let to_drop = ds.select_rows(|row| (rule.select)(ds, row));
    let ids: Vec<String> = to_drop.iter().filter_map(|&row| respondent_id(ds, row)).collect();

    info!(
        rule = rule.name,
        removed = to_drop.len(),
        "{}: {} records",
        rule.name,
        to_drop.len()
    );
    if !ids.is_empty() {
        info!(rule = rule.name, ids = ?ids, "removed respondent IDs");
    }

    let removed = to_drop.len();
    ds.drop_rows(&to_drop);

    RuleOutcome {
        rule: rule.name,
        description: rule.description,
        applied: true,
        removed,
        ids,
    }
}

// =============================================================================
// The rules, in application order
// =============================================================================

/// Error1: any key field (gender, age, postcode, completion date) missing.
const RULE_MISSING_KEY: Rule = Rule {
    name: "Error1",
    description: "missing key variables",
    required: || q::KEY_COLUMNS.to_vec(),
    select: |ds, row| {
        q::KEY_COLUMNS
            .iter()
            .any(|col| ds.get(row, col).map_or(true, Cell::is_missing))
    },
};

/// Error2: disqualifying age bracket; the survey should have terminated.
const RULE_UNDERAGE: Rule = Rule {
    name: "Error2",
    description: "age is under 18",
    required: || vec![q::AGE],
    select: |ds, row| cell_text(ds, row, q::AGE) == Some(q::DISQUALIFYING_AGE),
};

/// Error3: selected "None of these" on awareness (skip to Q6) yet answered
/// somewhere in the Q2–Q5 brand block.
const RULE_NONE_BUT_ANSWERED: Rule = Rule {
    name: "Error3",
    description: "selected 'None of these' but answered the brand block",
    required: || vec![q::AWARENESS],
    select: |ds, row| selected_none(ds, row) && any_answered(ds, row, q::BRAND_BLOCK),
};

/// Error4: main provider is not the target brand, yet the Q3–Q5 evaluation
/// block was answered. Rows that selected "None of these" are carved out;
/// rule 3 already removed the inconsistent ones.
const RULE_NON_CUSTOMER_RATED: Rule = Rule {
    name: "Error4",
    description: "non-customer answered the evaluation block",
    required: || vec![q::MAIN_PROVIDER, q::AWARENESS],
    select: |ds, row| {
        let is_customer = cell_text(ds, row, q::MAIN_PROVIDER) == Some(q::TARGET_BRAND);
        !is_customer && any_answered(ds, row, q::EVALUATION_BLOCK) && !selected_none(ds, row)
    },
};

/// Error5: answered "No"/"Don't know" to advertising exposure yet gave
/// advertising channels.
const RULE_UNEXPOSED_CHANNELS: Rule = Rule {
    name: "Error5",
    description: "no advertising exposure but channels answered",
    required: || vec![q::AD_EXPOSURE, q::AD_CHANNELS],
    select: |ds, row| {
        let unexposed = cell_text(ds, row, q::AD_EXPOSURE)
            .is_some_and(|t| q::AD_EXPOSURE_NEGATIVE.contains(&t));
        unexposed && !ds.get(row, q::AD_CHANNELS).map_or(true, Cell::is_missing)
    },
};

// =============================================================================
// Helpers
// =============================================================================

fn normalize_whitespace(ds: &mut Dataset) {
    for col in ds.columns().to_vec() {
        ds.map_column(&col, |cell| match cell {
            Cell::Text(s) if s.trim().is_empty() => Cell::Missing,
            other => other.clone(),
        });
    }
}

fn drop_blank_rows(ds: &mut Dataset) -> usize {
    let blank = ds.select_rows(|row| {
        ds.rows()[row].iter().all(Cell::is_missing)
    });
    let n = blank.len();
    ds.drop_rows(&blank);
    n
}

fn cell_text<'a>(ds: &'a Dataset, row: usize, column: &str) -> Option<&'a str> {
    ds.get(row, column).and_then(Cell::as_str)
}

/// True if any of the listed columns that exist in the dataset is answered.
/// Block columns absent from an instrument variant simply never match.
fn any_answered(ds: &Dataset, row: usize, columns: &[&str]) -> bool {
    columns
        .iter()
        .filter(|col| ds.has_column(col))
        .any(|col| !ds.get(row, col).map_or(true, Cell::is_missing))
}

fn selected_none(ds: &Dataset, row: usize) -> bool {
    cell_text(ds, row, q::AWARENESS).is_some_and(|t| t.contains(q::NONE_LABEL))
}

fn respondent_id(ds: &Dataset, row: usize) -> Option<String> {
    match ds.get(row, q::ID) {
        Some(Cell::Missing) | None => None,
        Some(cell) => Some(cell.render()),
    }
}

/// Post-validation invariant: IDs should be present and unique. Violations
/// are diagnostics, not fatal; the analyst decides what to do.
fn check_id_integrity(ds: &Dataset) {
    if !ds.has_column(q::ID) {
        warn!("dataset has no ID column");
        return;
    }
    let mut seen = std::collections::HashSet::new();
    for row in 0..ds.n_rows() {
        match respondent_id(ds, row) {
            None => warn!(row, "respondent with missing ID after validation"),
            Some(id) => {
                if !seen.insert(id.clone()) {
                    warn!(id = %id, "duplicate respondent ID after validation");
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
