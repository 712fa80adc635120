//! Chat - Chat completion request/response types and correlated exchanges

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "--------------------")?;
        writeln!(f, "{}:", self.role)?;
        writeln!(f, "{}", self.content.trim())
    }
}

/// Request body for the chat completion endpoint
///
/// Unset options are omitted from the wire so the service applies its own
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model ID, e.g. "gpt-3.5-turbo"
    pub model: String,
    pub messages: Vec<Message>,
    /// Sampling temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// End-user tag, used here as the correlation ID of the essay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl std::fmt::Display for ChatRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "--------------------")?;
        write!(f, "{}", self.model)?;
        if let Some(temperature) = self.temperature {
            write!(f, " temp={:.2}", temperature)?;
        }
        if let Some(max_tokens) = self.max_tokens {
            write!(f, " max={}", max_tokens)?;
        }
        if let Some(user) = &self.user {
            write!(f, " user={}", user)?;
        }
        writeln!(f)?;
        for message in &self.messages {
            write!(f, "{}", message)?;
        }
        Ok(())
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tokens={}/{}/{}",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// A choice in a chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageChoice {
    pub message: Message,
    #[serde(default)]
    pub index: u32,
    /// e.g. "stop" or "length"
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response from the chat completion endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    /// Epoch seconds
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub choices: Vec<MessageChoice>,
}

impl ChatResponse {
    /// Content of the first choice
    pub fn first_message_content(&self) -> Result<&str, DomainError> {
        match self.choices.first() {
            Some(choice) if !choice.message.content.is_empty() => Ok(&choice.message.content),
            _ => Err(DomainError::EmptyResponse),
        }
    }
}

impl std::fmt::Display for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for choice in &self.choices {
            write!(f, "{}", choice.message)?;
        }
        writeln!(f, "--------------------")?;
        write!(f, "{} {}", self.model, self.usage)?;
        if let Some(reason) = self.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            write!(f, " finish={}", reason)?;
        }
        writeln!(f)
    }
}

/// Result of dispatching a chat
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Pending,
    Completed(ChatResponse),
    Failed(String),
}

/// A request paired with a batch-unique correlation ID
///
/// The outcome is set exactly once, to either a response or an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: String,
    pub request: ChatRequest,
    pub outcome: ChatOutcome,
    /// Time spent waiting on the completion service
    pub millis: u64,
}

impl Chat {
    pub fn new(id: impl Into<String>, request: ChatRequest) -> Self {
        Self {
            id: id.into(),
            request,
            outcome: ChatOutcome::Pending,
            millis: 0,
        }
    }

    pub fn completed(mut self, response: ChatResponse, millis: u64) -> Self {
        self.outcome = ChatOutcome::Completed(response);
        self.millis = millis;
        self
    }

    pub fn failed(mut self, error: impl Into<String>, millis: u64) -> Self {
        self.outcome = ChatOutcome::Failed(error.into());
        self.millis = millis;
        self
    }

    pub fn response(&self) -> Option<&ChatResponse> {
        match &self.outcome {
            ChatOutcome::Completed(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ChatOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_unset_options() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![Message::user("hi")],
            temperature: Some(0.2),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("stop").is_none());
        assert!(json.get("user").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_parse_response() {
        let data = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1677966478,
            "model": "gpt-3.5-turbo",
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
            "choices": [{
                "message": {"role": "assistant", "content": "0.5 seems fair"},
                "index": 0,
                "finish_reason": "stop"
            }]
        });
        let response: ChatResponse = serde_json::from_value(data).unwrap();
        assert_eq!(response.first_message_content().unwrap(), "0.5 seems fair");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn test_first_message_content_empty() {
        let response = ChatResponse::default();
        assert!(matches!(
            response.first_message_content(),
            Err(DomainError::EmptyResponse)
        ));
    }

    #[test]
    fn test_chat_outcome_is_exclusive() {
        let chat = Chat::new("12", ChatRequest::default()).failed("timeout", 30);
        assert_eq!(chat.error(), Some("timeout"));
        assert!(chat.response().is_none());
        assert_eq!(chat.millis, 30);
    }
}
