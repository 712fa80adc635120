//! Services
//!
//! The batch scoring pipeline, built on the ports.

pub mod batcher;
pub mod corpus;
pub mod dispatcher;
pub mod progress;
pub mod request_builder;
pub mod result_writer;
pub mod score_extractor;
pub mod scoring;
pub mod template_cache;
pub mod training;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use batcher::batch;
pub use corpus::{EssayCorpus, RowDiagnostic};
pub use dispatcher::BatchDispatcher;
pub use progress::{BatchProgress, ProgressTracker};
pub use request_builder::{GenerationOptions, RequestBuilder};
pub use result_writer::{read_scores, write_scores};
pub use score_extractor::{extract_score, parse_score};
pub use scoring::{RunEvent, RunFailure, RunSummary, ScoringRun};
pub use template_cache::TemplateCache;
pub use training::{
    prepare_training_records, write_training_file, CodedResponse, TrainingRecord, TrainingSet,
};
