//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod csv_store;
pub mod openai;

// Re-exports
pub use csv_store::CsvCorpusStore;
pub use openai::OpenAiClient;
