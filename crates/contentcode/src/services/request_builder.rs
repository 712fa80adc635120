//! Request Builder - Turns an essay into a chat completion request
//!
//! Two modes:
//! - built-in: rubric, writing prompt and essay assembled from fixed text
//! - template: a user-supplied file with `{{prompt}}` and `{{essay}}` placeholders

use std::path::Path;
use std::sync::Arc;

use super::template_cache::TemplateCache;
use crate::domain::entities::{ChatRequest, EssayRecord, Message};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::EssayType;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const SYSTEM_INSTRUCTION: &str = "You are a psychology research assistant who is \
content-coding text written by participants in a research study.";

/// Template placeholder replaced by the writing prompt
pub const PROMPT_PLACEHOLDER: &str = "{{prompt}}";

/// Template placeholder replaced by the participant's response
pub const ESSAY_PLACEHOLDER: &str = "{{essay}}";

const SCORING_INSTRUCTIONS: &str = "Please content-code the participant's response, \
assessing the degree to which the participant's response is consistent with the above \
hallmarks. Your assessment should result in a single composite number ranging from -1.0 \
to 1.0, where -1.0 indicates that the participant's response is completely inconsistent \
with the hallmarks, 0.0 indicates that the participant's response is completely neutral \
with respect to the hallmarks, and 1.0 indicates that the participant's response is \
completely consistent with the hallmarks. The composite score should be provided first, \
followed by reasons for your assessment.";

/// Generation parameters stamped on every request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.2),
            max_tokens: None,
            stop: Vec::new(),
        }
    }
}

/// Builds chat requests for essays
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    options: GenerationOptions,
    templates: Arc<TemplateCache>,
}

impl RequestBuilder {
    pub fn new(options: GenerationOptions, templates: Arc<TemplateCache>) -> Self {
        Self { options, templates }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Build the request for one essay, tagged with its participant ID
    ///
    /// With a template path the template is used; a template that cannot be
    /// read is an error for the whole run.
    pub fn build(
        &self,
        essay: &EssayRecord,
        essay_type: EssayType,
        template: Option<&Path>,
    ) -> Result<ChatRequest, DomainError> {
        let prompt = match template {
            Some(path) => self.template_prompt(path, essay, essay_type)?,
            None => Self::built_in_prompt(essay, essay_type),
        };

        let mut request = self.request(vec![
            Message::system(SYSTEM_INSTRUCTION),
            Message::user(prompt),
        ]);
        request.user = Some(essay.id.to_string());
        Ok(request)
    }

    /// Request for a free-form prompt, optionally preceded by the system instruction
    pub fn prompt_request(&self, prompt: impl Into<String>, include_system: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if include_system {
            messages.push(Message::system(SYSTEM_INSTRUCTION));
        }
        messages.push(Message::user(prompt));
        self.request(messages)
    }

    pub fn built_in_prompt(essay: &EssayRecord, essay_type: EssayType) -> String {
        format!(
            "{hallmarks}\nA research study participant was given the following writing prompt:\n\
             “{prompt}”\n\nThe participant wrote the following:\n“{essay}”\n\n{instructions}\n\n",
            hallmarks = essay_type.hallmarks(),
            prompt = essay_type.writing_prompt(),
            essay = essay.select(essay_type),
            instructions = SCORING_INSTRUCTIONS,
        )
    }

    pub fn template_prompt(
        &self,
        path: &Path,
        essay: &EssayRecord,
        essay_type: EssayType,
    ) -> Result<String, DomainError> {
        let template = self.templates.get(path)?;
        Ok(template
            .replace(PROMPT_PLACEHOLDER, essay_type.writing_prompt())
            .replace(ESSAY_PLACEHOLDER, essay.select(essay_type)))
    }

    fn request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: self.options.model.clone(),
            messages,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
            stop: self.options.stop.clone(),
            ..Default::default()
        }
    }
}
