//! Domain models for the PRD generation server.

pub mod app;
pub mod conversation;
pub mod epic;
pub mod prd;

// Re-export commonly used types
pub use app::{GenerateAppQuery, GeneratedApp, GeneratedFile, GenerationMode};
pub use conversation::{
    AnalyzeInsightsRequest, AnalyzeInsightsResponse, AnalyzePromptRequest, AnalyzePromptResponse,
    ConversationInsights, DesignAndBrandInsights, EmotionalJourney, InsightPersona,
    InsightsMetadata, TranscriptAnalysis,
};
pub use epic::{
    AddStoryRequest, AddStoryResponse, Epic, EpicBatch, EpicDraft, EpicGenerationResponse,
    EpicListResponse, EpicLookupResponse, EpicsContent, Priority, StoryDraft, StoryStatus,
    UserStory,
};
pub use prd::{
    CoreFeature, DeleteResponse, Dependency, EnhanceSectionRequest, EnhanceSectionResponse,
    GeneratePrdResponse, GenerationOptions, NonFunctionalRequirement, Persona, PrdContent,
    PrdDraft, PrdRecord, PrdStatus, Risk, RoadmapItem, Scope, SuccessMetric, UiUxAspirations,
    UpdatePrdRequest,
};

/// Semantic checks applied after a value has deserialized.
///
/// Serde already rejects missing or mistyped fields; this covers what the
/// type system cannot express (non-blank strings, non-empty lists).
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<String>>;
}

pub(crate) fn require_non_blank(violations: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(format!("{} must not be blank", field));
    }
}
