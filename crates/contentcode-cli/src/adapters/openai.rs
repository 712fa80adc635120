//! OpenAI Chat Completion Implementation
//!
//! Sends chat requests to an OpenAI-compatible HTTP API using reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use contentcode::{ChatRequest, ChatResponse, CompletionService, DomainError};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const MODELS_PATH: &str = "/models";

/// HTTP implementation of CompletionService
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    org_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        org_id: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("contentcode/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainError::ExternalService(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            org_id: org_id.map(|s| s.to_string()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(&self.api_key);
        match &self.org_id {
            Some(org) => request.header("OpenAI-Organization", org),
            None => request,
        }
    }

    /// Send a chat request and return the response body unparsed
    pub async fn chat_completion_raw(&self, request: &ChatRequest) -> Result<String, DomainError> {
        tracing::debug!("POST {} model={}", CHAT_COMPLETIONS_PATH, request.model);

        let response = self
            .authorized(self.client.post(self.url(CHAT_COMPLETIONS_PATH)))
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{CHAT_COMPLETIONS_PATH}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{CHAT_COMPLETIONS_PATH}: {e}")))?;

        if !status.is_success() {
            return Err(api_error(status, CHAT_COMPLETIONS_PATH, &body));
        }
        Ok(body)
    }

    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, DomainError> {
        let body = self.chat_completion_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            DomainError::ExternalService(format!("Failed to parse chat response: {e}"))
        })
    }

    /// Whether the model ID is known to the service
    pub async fn model_exists(&self, model: &str) -> Result<bool, DomainError> {
        let path = format!("{MODELS_PATH}/{model}");
        let response = self
            .authorized(self.client.get(self.url(&path)))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{path}: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            status if status == StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(api_error(status, &path, &body))
            }
        }
    }

    /// Check the credentials by listing models
    pub async fn check_connection(&self) -> Result<(), DomainError> {
        let response = self
            .authorized(self.client.get(self.url(MODELS_PATH)))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("{MODELS_PATH}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(api_error(status, MODELS_PATH, &body))
        }
    }
}

fn api_error(status: StatusCode, path: &str, body: &str) -> DomainError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    DomainError::ExternalService(format!(
        "status code {} from {}: {}",
        status.as_u16(),
        path,
        detail
    ))
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, DomainError> {
        self.chat_completion(request).await
    }

    async fn validate_model(&self, model: &str) -> Result<bool, DomainError> {
        self.model_exists(model).await
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
