//! Completion Service Port
//!
//! Abstract interface for the remote chat completion model.

use async_trait::async_trait;

use crate::domain::entities::{ChatRequest, ChatResponse};
use crate::domain::errors::DomainError;

/// Chat completion interface
///
/// Implementations own transport concerns (auth, timeouts, wire format).
/// The scoring pipeline only assembles requests and reads responses.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a single chat request
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, DomainError>;

    /// Check that the model ID is known to the service
    async fn validate_model(&self, _model: &str) -> Result<bool, DomainError> {
        Ok(true)
    }

    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;
}
