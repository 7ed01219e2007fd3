//! Error types for the surveyprep cleaning pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SourceError`] - input file reading/parsing errors
//! - [`ExportError`] - output writer errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Note that missing or unmapped *data* is never an error anywhere in the
//! pipeline: unknown labels, blank cells and unparseable scale values all
//! degrade to missing. These types cover the fatal cases only (unreadable
//! files, malformed workbooks, failed writes).

use thiserror::Error;

// =============================================================================
// Input Source Errors
// =============================================================================

/// Errors while reading the raw survey export.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be opened or decoded.
    #[error("Invalid workbook: {0}")]
    Workbook(String),

    /// Invalid CSV structure.
    #[error("Invalid CSV format: {0}")]
    Csv(String),

    /// Empty file.
    #[error("Input file contains no rows")]
    EmptyFile,

    /// No header row found.
    #[error("No header row found in input")]
    NoHeaders,
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the output artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create or write a file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("Codebook JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column in the output table has no metadata and is not a recognized
    /// passthrough.
    #[error("Column '{0}' has no variable label and is not a passthrough")]
    UnlabelledColumn(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::run_pipeline`]
/// and the CLI. It wraps the lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input reading error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Output writing error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Every row was removed by validation; nothing to export.
    #[error("All {0} rows were removed by validation")]
    AllRowsRemoved(usize),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input reading.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for output writers.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SourceError -> PipelineError
        let src_err = SourceError::EmptyFile;
        let pipeline_err: PipelineError = src_err.into();
        assert!(pipeline_err.to_string().contains("no rows"));

        // ExportError -> PipelineError
        let exp_err = ExportError::UnlabelledColumn("Q9".into());
        let pipeline_err: PipelineError = exp_err.into();
        assert!(pipeline_err.to_string().contains("Q9"));
    }

    #[test]
    fn test_all_rows_removed_format() {
        let err = PipelineError::AllRowsRemoved(42);
        assert!(err.to_string().contains("42"));
    }
}
