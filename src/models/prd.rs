//! PRD domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use super::epic::Epic;
use super::{Validate, require_non_blank};

/// PRD status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrdStatus {
    Draft,
    InReview,
    Complete,
}

/// In-scope and out-of-scope items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub in_scope: Vec<String>,
    pub out_of_scope: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Persona {
    pub name: String,
    pub description: String,
    pub characteristics: Vec<String>,
    pub needs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoreFeature {
    pub name: String,
    pub description: String,
    /// Free-form priority label as written by the model (e.g. "High", "P1").
    pub priority: String,
    pub user_story: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UiUxAspirations {
    pub style: String,
    pub tone: String,
    pub user_experience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NonFunctionalRequirement {
    #[serde(rename = "type")]
    pub kind: String,
    pub requirement: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: String,
    pub dependency: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Risk {
    pub risk: String,
    pub impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuccessMetric {
    pub metric: String,
    pub target: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    pub name: String,
    pub description: String,
    pub business_value: String,
    pub timeframe: String,
}

/// Structured PRD body.
///
/// Every field is required (lists may be empty). Deserialization fails on a
/// missing field, which is how model output and `PATCH` payloads are checked
/// before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrdContent {
    pub purpose_and_vision: String,
    pub scope: Scope,
    pub target_users_and_personas: Vec<Persona>,
    pub core_features: Vec<CoreFeature>,
    pub ui_ux_aspirations: UiUxAspirations,
    pub non_functional_requirements: Vec<NonFunctionalRequirement>,
    pub assumptions: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub risks_and_mitigations: Vec<Risk>,
    pub success_metrics: Vec<SuccessMetric>,
    pub future_roadmap: Vec<RoadmapItem>,
}

impl Validate for PrdContent {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        require_non_blank(
            &mut violations,
            "content.purposeAndVision",
            &self.purpose_and_vision,
        );
        for (i, feature) in self.core_features.iter().enumerate() {
            require_non_blank(
                &mut violations,
                &format!("content.coreFeatures[{}].name", i),
                &feature.name,
            );
        }
        for (i, persona) in self.target_users_and_personas.iter().enumerate() {
            require_non_blank(
                &mut violations,
                &format!("content.targetUsersAndPersonas[{}].name", i),
                &persona.name,
            );
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Shape the PRD generator asks the model for.
#[derive(Debug, Clone, Deserialize)]
pub struct PrdDraft {
    pub title: String,
    pub content: PrdContent,
}

impl Validate for PrdDraft {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        require_non_blank(&mut violations, "title", &self.title);
        if let Err(mut inner) = self.content.validate() {
            violations.append(&mut inner);
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Stored PRD record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrdRecord {
    pub id: i64,
    pub title: String,
    pub content: PrdContent,
    pub status: PrdStatus,
    pub original_file_name: Option<String>,
    pub processing_time_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every mutation; used for compare-and-swap epic replacement.
    pub revision: u64,
    /// Current epic batch, empty until epics are generated.
    pub epics: Vec<Epic>,
    pub epics_generated_at: Option<DateTime<Utc>>,
    pub epics_processing_time_ms: Option<u64>,
}

impl PrdRecord {
    pub fn has_epics(&self) -> bool {
        !self.epics.is_empty()
    }
}

/// Options parsed from the upload form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub extract_personas: bool,
    pub identify_features: bool,
    pub generate_acceptance_criteria: bool,
}

/// Response for `POST /api/prds/generate`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePrdResponse {
    pub success: bool,
    pub prd: PrdRecord,
    pub message: String,
}

/// Partial update payload for `PATCH /api/prds/{id}`.
///
/// `content` is kept as raw JSON so it can be re-validated against
/// [`PrdContent`] with a descriptive error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePrdRequest {
    pub title: Option<String>,
    #[schema(value_type = Option<PrdContent>)]
    pub content: Option<JsonValue>,
    pub status: Option<PrdStatus>,
}

/// Request for `POST /api/prds/enhance-section`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceSectionRequest {
    pub section_content: String,
    pub section_type: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnhanceSectionResponse {
    pub content: String,
}

/// Generic deletion acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
