//! Epic and user story models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Validate, require_non_blank};

/// Priority shared by epics and stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

// Models write "High" as often as "high".
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Priority::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown priority '{}', expected high, medium or low",
                raw
            ))
        })
    }
}

/// Story workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StoryStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// A user story owned by an epic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: StoryStatus,
    pub acceptance_criteria: Vec<String>,
    pub estimated_story_points: u32,
}

/// An epic owned by a PRD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_effort: String,
    pub goals: Vec<String>,
    pub user_stories: Vec<UserStory>,
}

/// Story as returned by the model. Ids and status are assigned server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub acceptance_criteria: Vec<String>,
    #[serde(alias = "estimatedPoints")]
    pub estimated_story_points: u32,
}

impl StoryDraft {
    pub fn into_story(self) -> UserStory {
        UserStory {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            status: StoryStatus::Todo,
            acceptance_criteria: self.acceptance_criteria,
            estimated_story_points: self.estimated_story_points,
        }
    }

    fn collect_violations(&self, prefix: &str, violations: &mut Vec<String>) {
        require_non_blank(violations, &format!("{}.title", prefix), &self.title);
        require_non_blank(
            violations,
            &format!("{}.description", prefix),
            &self.description,
        );
    }
}

impl Validate for StoryDraft {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        self.collect_violations("story", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_effort: String,
    pub goals: Vec<String>,
    pub user_stories: Vec<StoryDraft>,
}

impl EpicDraft {
    pub fn into_epic(self) -> Epic {
        Epic {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description,
            priority: self.priority,
            estimated_effort: self.estimated_effort,
            goals: self.goals,
            user_stories: self
                .user_stories
                .into_iter()
                .map(StoryDraft::into_story)
                .collect(),
        }
    }
}

/// `{ "epics": [...] }` as returned by the epic generator prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct EpicBatch {
    pub epics: Vec<EpicDraft>,
}

impl EpicBatch {
    pub fn into_epics(self) -> Vec<Epic> {
        self.epics.into_iter().map(EpicDraft::into_epic).collect()
    }
}

impl Validate for EpicBatch {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        if self.epics.is_empty() {
            violations.push("epics must contain at least one epic".to_string());
        }
        for (i, epic) in self.epics.iter().enumerate() {
            let prefix = format!("epics[{}]", i);
            require_non_blank(&mut violations, &format!("{}.title", prefix), &epic.title);
            if epic.user_stories.is_empty() {
                violations.push(format!(
                    "{}.userStories must contain at least one story",
                    prefix
                ));
            }
            for (j, story) in epic.user_stories.iter().enumerate() {
                story.collect_violations(
                    &format!("{}.userStories[{}]", prefix, j),
                    &mut violations,
                );
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Epic batch body shared by generate and list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EpicsContent {
    pub epics: Vec<Epic>,
}

/// Response for `POST /api/prds/{id}/generate-epics`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpicGenerationResponse {
    pub prd_id: i64,
    pub title: String,
    pub content: EpicsContent,
    pub processing_time_ms: u64,
}

/// Response for `GET /api/prds/{id}/epics`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpicListResponse {
    pub prd_id: i64,
    pub epics: Vec<Epic>,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Response for `GET /api/epics/{id}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpicLookupResponse {
    pub prd_id: i64,
    pub epic: Epic,
}

/// Request for `POST /api/epics/{id}/add-story`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddStoryRequest {
    /// Free-text description of the desired story.
    pub prompt: String,
}

/// Response for `POST /api/epics/{id}/add-story`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStoryResponse {
    pub prd_id: i64,
    pub epic_id: String,
    pub story: UserStory,
    pub total_stories: usize,
    pub processing_time_ms: u64,
}
