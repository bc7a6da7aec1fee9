use tracing::info;

use super::{CONVERSATIONAL_TEMPERATURE, STRUCTURED_TEMPERATURE};
use crate::models::ConversationInsights;
use crate::services::llm::{GenerationError, PromptSpec, StructuredGenerator};
use crate::services::prompts::conversation::{
    EnhanceSectionContext, FollowUpContext, InsightsContext, enhance_section_template,
    follow_up_template, insights_template,
};

const FOLLOW_UP_MAX_TOKENS: u32 = 200;
const INSIGHTS_MAX_TOKENS: u32 = 1200;

/// Ask the model for the next discovery question.
pub async fn follow_up_question(
    generator: &StructuredGenerator,
    transcript: &str,
    phase: &str,
    context: &str,
) -> Result<String, GenerationError> {
    info!("Generating follow-up question ({} phase)", phase);
    let (system, user) = follow_up_template().render(&FollowUpContext {
        transcript,
        phase,
        context,
    })?;
    let spec = PromptSpec::text("follow-up-question", system, user, CONVERSATIONAL_TEMPERATURE)
        .with_max_tokens(FOLLOW_UP_MAX_TOKENS);
    generator.generate_text(&spec).await
}

/// Extract structured insights from a discovery transcript.
pub async fn analyze_insights(
    generator: &StructuredGenerator,
    transcript: &str,
) -> Result<ConversationInsights, GenerationError> {
    info!("Analyzing conversation insights");
    let (system, user) = insights_template().render(&InsightsContext { transcript })?;
    let spec = PromptSpec::json("conversation-insights", system, user, STRUCTURED_TEMPERATURE)
        .with_max_tokens(INSIGHTS_MAX_TOKENS);
    generator.generate(&spec).await
}

/// Rewrite one PRD section. Failures are returned, never replaced with the input.
pub async fn enhance_section(
    generator: &StructuredGenerator,
    section_content: &str,
    section_type: &str,
    context: &str,
) -> Result<String, GenerationError> {
    info!("Enhancing PRD section '{}'", section_type);
    let (system, user) = enhance_section_template().render(&EnhanceSectionContext {
        section_content,
        section_type,
        context,
    })?;
    let spec = PromptSpec::text("enhance-section", system, user, STRUCTURED_TEMPERATURE);
    generator.generate_text(&spec).await
}
