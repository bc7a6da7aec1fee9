use std::time::Instant;
use tracing::info;

use super::{STRUCTURED_TEMPERATURE, elapsed_ms};
use crate::models::{GenerationOptions, PrdContent, PrdDraft};
use crate::services::llm::{GenerationError, PromptSpec, StructuredGenerator};
use crate::services::prompts::prd::{PrdContext, template};

/// A validated PRD ready to be stored.
#[derive(Debug, Clone)]
pub struct GeneratedPrd {
    pub title: String,
    pub content: PrdContent,
    pub processing_time_ms: u64,
}

/// Turn conversation text into a PRD.
pub async fn generate_prd(
    generator: &StructuredGenerator,
    conversation: &str,
    options: GenerationOptions,
) -> Result<GeneratedPrd, GenerationError> {
    let start = Instant::now();
    info!(
        "Generating PRD from {} characters of conversation ({:?})",
        conversation.len(),
        options
    );

    let (system, user) = template().render(&PrdContext::new(conversation, options))?;
    let spec = PromptSpec::json("generate-prd", system, user, STRUCTURED_TEMPERATURE);
    let draft: PrdDraft = generator.generate(&spec).await?;

    let processing_time_ms = elapsed_ms(start);
    info!(
        processing_time_ms = processing_time_ms,
        "Generated PRD '{}' with {} core features",
        draft.title,
        draft.content.core_features.len()
    );

    Ok(GeneratedPrd {
        title: draft.title.trim().to_string(),
        content: draft.content,
        processing_time_ms,
    })
}
