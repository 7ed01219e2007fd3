//! # Surveyprep - survey export cleaning and SPSS preparation
//!
//! Surveyprep turns a raw survey-platform export (xlsx or CSV) into a
//! statistics-ready dataset: validated, one-hot expanded, numerically coded,
//! renamed to short variable codes and bucketed into fieldwork waves.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Raw export  │────▶│   Parser    │────▶│  Pipeline   │────▶│ CSV + SPSS  │
//! │ (xlsx/CSV)  │     │ (auto-enc)  │     │ (5 stages)  │     │  + codebook │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use surveyprep::{load_export, run_pipeline};
//!
//! fn main() -> surveyprep::PipelineResult<()> {
//!     let loaded = load_export("survey_export.xlsx".as_ref())?;
//!     let output = run_pipeline(loaded.dataset)?;
//!     println!("{} clean cases", output.dataset.n_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`model`] - The [`model::Dataset`] table and [`model::Cell`] values
//! - [`questionnaire`] - Static instrument definition (mappings, order, labels)
//! - [`parser`] - Export reading with format and encoding auto-detection
//! - [`clean`] - Invalid-case removal rules and the validation report
//! - [`transform`] - Expansion, recoding, schema normalization, waves
//! - [`labels`] - Codebook metadata (variable/value labels, levels, widths)
//! - [`export`] - CSV, SPSS-bundle and codebook writers

// Core modules
pub mod error;
pub mod model;
pub mod questionnaire;

// Input
pub mod parser;

// Cleaning and transformation
pub mod clean;
pub mod labels;
pub mod transform;

// Output
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ExportError, ExportResult, PipelineError, PipelineResult, SourceError, SourceResult,
};

// =============================================================================
// Re-exports - Model
// =============================================================================

pub use model::{Cell, Dataset};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{load_export, LoadedExport, SourceFormat};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use clean::{remove_invalid_cases, CleanReport, RuleOutcome};
pub use labels::{build_metadata, DatasetMetadata, MeasureLevel};
pub use transform::{
    assign_wave, convert_labels_to_codes, expand_multiresponse, rename_and_reorder, run_pipeline,
    PipelineOutput,
};

// =============================================================================
// Re-exports - Writers
// =============================================================================

pub use export::{write_clean_report, write_codebook, write_csv, write_spss_bundle};
