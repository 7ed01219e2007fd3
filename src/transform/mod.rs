//! Dataset transformations.
//!
//! The stages run in a fixed order (see [`pipeline`]):
//! multi-response expansion, label→code recoding, schema normalization and
//! wave assignment. Each stage mutates the [`crate::model::Dataset`] in
//! place and tolerates absent columns so instrument variants across waves
//! keep working.

pub mod expand;
pub mod pipeline;
pub mod recode;
pub mod schema;
pub mod wave;

pub use expand::expand_multiresponse;
pub use pipeline::{run_pipeline, PipelineOutput};
pub use recode::convert_labels_to_codes;
pub use schema::rename_and_reorder;
pub use wave::assign_wave;
