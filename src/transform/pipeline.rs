//! Pipeline orchestration: the fixed stage order from raw export to
//! statistics-ready table.
//!
//! Stage order matters. Validation runs against the raw label texts, so it
//! must precede recoding; expansion must precede schema normalization so the
//! indicator columns exist when the target order is applied; wave assignment
//! runs last because it inserts its column relative to the already-renamed
//! completion timestamp.

use tracing::info;

use crate::clean::{remove_invalid_cases, CleanReport};
use crate::error::{PipelineError, PipelineResult};
use crate::labels::{build_metadata, verify_coverage, DatasetMetadata};
use crate::model::Dataset;
use crate::transform::{
    assign_wave, convert_labels_to_codes, expand_multiresponse, rename_and_reorder,
};

/// Everything the export writers need: the transformed table, the validation
/// diagnostics and the codebook metadata.
#[derive(Debug)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub report: CleanReport,
    pub metadata: DatasetMetadata,
}

/// Run the full cleaning pipeline on a raw export.
pub fn run_pipeline(mut dataset: Dataset) -> PipelineResult<PipelineOutput> {
    info!(
        rows = dataset.n_rows(),
        columns = dataset.n_columns(),
        "pipeline started"
    );

    let report = remove_invalid_cases(&mut dataset);
    if dataset.n_rows() == 0 {
        return Err(PipelineError::AllRowsRemoved(report.initial_rows));
    }

    expand_multiresponse(&mut dataset);
    convert_labels_to_codes(&mut dataset);
    rename_and_reorder(&mut dataset);
    assign_wave(&mut dataset);

    let metadata = build_metadata();
    verify_coverage(&dataset, &metadata)?;

    info!(
        rows = dataset.n_rows(),
        columns = dataset.n_columns(),
        "pipeline completed"
    );

    Ok(PipelineOutput {
        dataset,
        report,
        metadata,
    })
}

// =============================================================================
// Tests
// =============================================================================
