//! Live discovery conversation analysis DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Validate;

/// Minimum transcript length for a follow-up question.
pub const MIN_PROMPT_TRANSCRIPT_CHARS: usize = 20;
/// Minimum transcript length for insight extraction.
pub const MIN_INSIGHTS_TRANSCRIPT_CHARS: usize = 100;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzePromptRequest {
    pub transcript: String,
    /// Discovery phase, e.g. "problem", "users", "features".
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptAnalysis {
    pub phase: String,
    pub transcript_length: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyzePromptResponse {
    /// The follow-up question to ask next.
    pub prompt: String,
    pub analysis: TranscriptAnalysis,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzeInsightsRequest {
    pub transcript: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightPersona {
    pub name: String,
    pub demographics: String,
    pub needs: Vec<String>,
    pub frustrations: Vec<String>,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignAndBrandInsights {
    pub brand_personality: Vec<String>,
    pub visual_direction: String,
    pub tone_of_voice: String,
    pub user_experience_philosophy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionalJourney {
    pub current_feelings: Vec<String>,
    pub desired_feelings: Vec<String>,
}

/// Structured insights extracted from a discovery transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationInsights {
    pub key_themes: Vec<String>,
    pub user_personas: Vec<InsightPersona>,
    pub pain_points: Vec<String>,
    pub business_goals: Vec<String>,
    pub technical_requirements: Vec<String>,
    pub design_and_brand_insights: DesignAndBrandInsights,
    pub emotional_journey: EmotionalJourney,
    pub missing_information: Vec<String>,
    pub suggested_next_steps: Vec<String>,
}

impl Validate for ConversationInsights {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.key_themes.iter().all(|t| t.trim().is_empty()) {
            return Err(vec!["keyThemes must contain at least one theme".to_string()]);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsMetadata {
    pub transcript_length: usize,
    pub word_count: usize,
    pub analysis_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyzeInsightsResponse {
    pub insights: ConversationInsights,
    pub metadata: InsightsMetadata,
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
