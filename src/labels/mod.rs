//! Statistical-package metadata: variable labels, value labels, measurement
//! levels and display widths.
//!
//! Built purely from the questionnaire definition, never from the data:
//! the same instrument always yields the same codebook. Consumed by the
//! export writers alongside the transformed table.

use tracing::warn;

use crate::error::{ExportError, ExportResult};
use crate::model::{Cell, Dataset};
use crate::questionnaire as q;

// =============================================================================
// Types
// =============================================================================

/// SPSS measurement level of an output variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureLevel {
    /// Continuous (scale) variable.
    Scale,
    /// Ordered categorical.
    Ordinal,
    /// Unordered categorical.
    Nominal,
    /// Free text / timestamp; no level, stored as a string.
    Text,
}

/// The full metadata package handed to the statistical writer.
#[derive(Debug, Clone)]
pub struct DatasetMetadata {
    /// Output variable code → descriptive question text, in codebook order.
    pub variable_labels: Vec<(String, String)>,
    /// Output variable code → {numeric code → label}.
    pub value_labels: Vec<(String, Vec<(i64, String)>)>,
}

impl DatasetMetadata {
    pub fn variable_label(&self, column: &str) -> Option<&str> {
        self.variable_labels
            .iter()
            .find(|(code, _)| code == column)
            .map(|(_, text)| text.as_str())
    }

    pub fn value_table(&self, column: &str) -> Option<&[(i64, String)]> {
        self.value_labels
            .iter()
            .find(|(code, _)| code == column)
            .map(|(_, table)| table.as_slice())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build variable and value labels for the whole instrument.
pub fn build_metadata() -> DatasetMetadata {
    let mut variable_labels: Vec<(String, String)> = Vec::new();

    for (code, text) in q::QUESTION_TEXTS {
        variable_labels.push((code.to_string(), text.to_string()));
    }

    // Multi-select indicators: "{base question} - {option label}".
    for question in q::MULTI_QUESTIONS {
        for (label, option_code) in question.options {
            variable_labels.push((
                format!("{}_{}", question.code, option_code),
                format!("{} - {}", question.column, label),
            ));
        }
    }

    // Q5 rating grid facets.
    for (facet_code, facet_text) in q::Q5_FACETS {
        variable_labels.push((
            format!("Q5_{facet_code}"),
            format!("{} - {}", q::Q5_BASE_TEXT, facet_text),
        ));
    }

    // Companion free-text columns.
    for (code, base) in q::OTHER_TEXT_COLUMNS {
        variable_labels.push((code.to_string(), format!("{base} - {}", q::OTHER_LABEL)));
    }

    let mut value_labels: Vec<(String, Vec<(i64, String)>)> = q::VALUE_LABEL_TABLES
        .iter()
        .map(|(code, table)| {
            (
                code.to_string(),
                table.iter().map(|(v, t)| (*v, t.to_string())).collect(),
            )
        })
        .collect();

    // Uniform binary table for every indicator column.
    for question in q::MULTI_QUESTIONS {
        for (_, option_code) in question.options {
            value_labels.push((
                format!("{}_{}", question.code, option_code),
                vec![(0, "Not selected".to_string()), (1, "Selected".to_string())],
            ));
        }
    }

    DatasetMetadata {
        variable_labels,
        value_labels,
    }
}

// =============================================================================
// Measurement levels and widths
// =============================================================================

const SCALE_COLUMNS: &[&str] = &["Q4a", "S3"];
const ORDINAL_COLUMNS: &[&str] = &["Q3", "Q5_1", "Q5_2", "Q5_3", "Q5_4", "Wave"];

/// Display-width hints for long text fields.
pub const DISPLAY_WIDTHS: &[(&str, u16)] = &[
    ("CompletedDate", 20),
    ("Q4b", 200),
    ("Q1_97_Oth", 100),
    ("Q2_97_Oth", 100),
    ("Q7_97_Oth", 100),
    ("D1_97_Oth", 100),
    ("D3_97_Oth", 100),
];

/// Classify an output column for the statistical writer.
pub fn measurement_level(column: &str) -> MeasureLevel {
    if is_text_column(column) {
        MeasureLevel::Text
    } else if SCALE_COLUMNS.contains(&column) {
        MeasureLevel::Scale
    } else if ORDINAL_COLUMNS.contains(&column) {
        MeasureLevel::Ordinal
    } else {
        MeasureLevel::Nominal
    }
}

/// Free-text passthrough columns (stored as strings, no value labels).
pub fn is_text_column(column: &str) -> bool {
    column == "Q4b" || column == "CompletedDate" || column.ends_with("_Oth")
}

pub fn display_width(column: &str) -> Option<u16> {
    DISPLAY_WIDTHS
        .iter()
        .find(|(c, _)| *c == column)
        .map(|(_, w)| *w)
}

// =============================================================================
// Coverage invariant
// =============================================================================

/// Every column in the final table must either carry a variable label or be
/// a recognized passthrough (identifier, free text, date). Unknown columns
/// holding only text are tolerated as free responses; an unknown *coded*
/// column means the questionnaire definition is out of date, which is fatal.
pub fn verify_coverage(ds: &Dataset, metadata: &DatasetMetadata) -> ExportResult<()> {
    for column in ds.columns() {
        if metadata.variable_label(column).is_some() || is_text_column(column) || column == "ID" {
            continue;
        }
        let all_text = (0..ds.n_rows())
            .all(|row| matches!(ds.get(row, column), Some(Cell::Text(_) | Cell::Missing) | None));
        if all_text {
            warn!(column = %column, "unlabelled column exported as free text");
        } else {
            return Err(ExportError::UnlabelledColumn(column.clone()));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
