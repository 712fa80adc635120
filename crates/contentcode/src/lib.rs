//! Contentcode Domain Library
//!
//! Core types and the batch scoring pipeline for content-coding research
//! essays with a chat completion model.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: EssayRecord, EssayScore, Chat, ChatRequest/ChatResponse
//!   - `value_objects/`: EssayType and its rubric family
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: CompletionService (the remote model)
//!   - `repositories/`: CorpusStore (tabular files)
//!
//! - **Services** (`services/`): The scoring pipeline built on the ports
//!
//! # Usage
//!
//! ```rust,ignore
//! use contentcode::{EssayCorpus, RequestBuilder, ScoringRun};
//!
//! let corpus = EssayCorpus::load(&store, "data/original/essays.csv")?;
//! let summary = ScoringRun::new(builder, dispatcher)
//!     .run(corpus.records(), EssayType::Dream, None, |event| println!("{event}"))
//!     .await?;
//! ```

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    Chat, ChatOutcome, ChatRequest, ChatResponse, DomainError, EssayCompletion, EssayRecord,
    EssayScore, EssayType, Message, MessageChoice, Role, RubricFamily, Usage,
};
pub use ports::{CompletionService, CorpusStore, Table};
pub use services::{
    batch, extract_score, prepare_training_records, read_scores, write_scores,
    write_training_file, BatchDispatcher, BatchProgress, CodedResponse, EssayCorpus,
    GenerationOptions, ProgressTracker, RequestBuilder, RowDiagnostic, RunEvent, RunFailure,
    RunSummary, ScoringRun, TemplateCache, TrainingRecord, TrainingSet,
};
