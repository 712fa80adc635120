//! Domain Errors
//!
//! Error types for domain operations.

use std::path::PathBuf;

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("essay type {0} is not one of: dream, dejavu, conflict, angry, award")]
    InvalidEssayType(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("essay corpus is empty")]
    EmptyCorpus,

    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    #[error("error reading template file {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chat score: no content found")]
    EmptyResponse,

    #[error("chat score: no score found")]
    NoScoreFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the error should abort a run rather than skip one essay
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DomainError::EmptyResponse
                | DomainError::NoScoreFound
                | DomainError::ExternalService(_)
        )
    }
}
