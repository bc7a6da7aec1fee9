use std::time::Instant;
use tracing::info;

use super::{STRUCTURED_TEMPERATURE, elapsed_ms};
use crate::models::{Epic, EpicBatch, PrdContent, StoryDraft, UserStory};
use crate::services::llm::{GenerationError, PromptSpec, StructuredGenerator};
use crate::services::prompts::epics::{EpicsContext, StoryContext, epics_template, story_template};

/// A validated epic batch with server-assigned ids.
#[derive(Debug, Clone)]
pub struct GeneratedEpics {
    pub epics: Vec<Epic>,
    pub processing_time_ms: u64,
}

/// Break a PRD into epics and user stories.
pub async fn generate_epics(
    generator: &StructuredGenerator,
    title: &str,
    content: &PrdContent,
) -> Result<GeneratedEpics, GenerationError> {
    let start = Instant::now();
    info!("Generating epics for PRD '{}'", title);

    let (system, user) = epics_template().render(&EpicsContext { title, content })?;
    let spec = PromptSpec::json("generate-epics", system, user, STRUCTURED_TEMPERATURE);
    let batch: EpicBatch = generator.generate(&spec).await?;
    let epics = batch.into_epics();

    let processing_time_ms = elapsed_ms(start);
    info!(
        processing_time_ms = processing_time_ms,
        "Generated {} epics with {} stories for '{}'",
        epics.len(),
        epics.iter().map(|e| e.user_stories.len()).sum::<usize>(),
        title
    );

    Ok(GeneratedEpics {
        epics,
        processing_time_ms,
    })
}

/// Write one story for `epic` from a free-text request.
pub async fn generate_story(
    generator: &StructuredGenerator,
    epic: &Epic,
    prompt: &str,
) -> Result<(UserStory, u64), GenerationError> {
    let start = Instant::now();
    let (system, user) = story_template().render(&StoryContext::new(epic, prompt))?;
    let spec = PromptSpec::json("add-story", system, user, STRUCTURED_TEMPERATURE);
    let draft: StoryDraft = generator.generate(&spec).await?;
    let story = draft.into_story();

    let processing_time_ms = elapsed_ms(start);
    info!(
        processing_time_ms = processing_time_ms,
        "Generated story '{}' for epic '{}'",
        story.title,
        epic.title
    );
    Ok((story, processing_time_ms))
}
