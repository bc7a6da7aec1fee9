//! Structured generation on top of a chat-completion language model.
//!
//! [`LanguageModel`] is the port to the remote model; [`StructuredGenerator`]
//! turns its raw text into validated, typed values.

mod openai;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::models::Validate;

pub use openai::OpenAiClient;

/// Failures while producing model output.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Language model request failed: {0}")]
    Network(String),

    #[error("Language model returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Language model returned an empty response")]
    EmptyResponse,

    #[error("Language model output is not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("Language model output failed schema validation: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl GenerationError {
    /// Whether a re-prompt could fix this failure.
    fn is_repairable(&self) -> bool {
        matches!(self, Self::MalformedOutput(_) | Self::Schema(_))
    }
}

/// One chat-completion request.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    /// Short identifier used in logs.
    pub name: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the endpoint for a JSON object response.
    pub json_output: bool,
}

impl PromptSpec {
    pub fn json(name: impl Into<String>, system: String, user: String, temperature: f32) -> Self {
        Self {
            name: name.into(),
            system,
            user,
            temperature,
            max_tokens: None,
            json_output: true,
        }
    }

    pub fn text(name: impl Into<String>, system: String, user: String, temperature: f32) -> Self {
        Self {
            json_output: false,
            ..Self::json(name, system, user, temperature)
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Remote chat-completion model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return the assistant message text for `spec`.
    async fn complete(&self, spec: &PromptSpec) -> Result<String, GenerationError>;

    /// Model identifier for logs and readiness checks.
    fn model_name(&self) -> &str;
}

/// Decodes model output into typed values, optionally re-prompting when the
/// output is malformed or fails validation.
#[derive(Clone)]
pub struct StructuredGenerator {
    model: Arc<dyn LanguageModel>,
    repair_attempts: u32,
}

impl StructuredGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, repair_attempts: u32) -> Self {
        Self {
            model,
            repair_attempts,
        }
    }

    pub fn with_repair_attempts(mut self, repair_attempts: u32) -> Self {
        self.repair_attempts = repair_attempts;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Generate a value of type `T` from a JSON-mode prompt.
    pub async fn generate<T>(&self, spec: &PromptSpec) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + Validate,
    {
        let start = Instant::now();
        let mut attempt_spec = spec.clone();
        let mut attempt = 0;

        loop {
            let raw = self.model.complete(&attempt_spec).await?;
            match decode::<T>(&raw) {
                Ok(value) => {
                    info!(
                        prompt = %spec.name,
                        attempts = attempt + 1,
                        processing_time_ms = %start.elapsed().as_millis(),
                        "Structured generation succeeded"
                    );
                    return Ok(value);
                }
                Err(err) if err.is_repairable() && attempt < self.repair_attempts => {
                    attempt += 1;
                    warn!(
                        prompt = %spec.name,
                        attempt = attempt,
                        "Model output rejected, re-prompting: {}",
                        err
                    );
                    attempt_spec = repair_prompt(spec, &raw, &err);
                }
                Err(err) => {
                    warn!(prompt = %spec.name, "Model output rejected: {}", err);
                    return Err(err);
                }
            }
        }
    }

    /// Generate free text. Blank output is an error.
    pub async fn generate_text(&self, spec: &PromptSpec) -> Result<String, GenerationError> {
        let raw = self.model.complete(spec).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

fn decode<T>(raw: &str) -> Result<T, GenerationError>
where
    T: DeserializeOwned + Validate,
{
    let payload = extract_json_payload(raw);
    if payload.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| GenerationError::MalformedOutput(e.to_string()))?;
    let value: T =
        serde_json::from_value(json).map_err(|e| GenerationError::Schema(vec![e.to_string()]))?;
    value.validate().map_err(GenerationError::Schema)?;
    Ok(value)
}

fn repair_prompt(spec: &PromptSpec, raw: &str, err: &GenerationError) -> PromptSpec {
    let mut repaired = spec.clone();
    repaired.user = format!(
        "{}\n\nYour previous response was:\n{}\n\nIt was rejected because: {}\n\
         Respond again with a single corrected JSON object that follows the required format exactly.",
        spec.user, raw, err
    );
    repaired
}

/// Strip surrounding whitespace and a Markdown code fence, if present.
pub fn extract_json_payload(raw: &str) -> &str {
    strip_code_fence(raw)
}

/// Remove a leading ```lang line and trailing ``` from model output.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
