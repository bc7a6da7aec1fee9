//! Epic breakdown and single-story prompts.

use serde::Serialize;

use super::PromptTemplate;
use crate::models::{Epic, PrdContent};

/// Context for the epic breakdown prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicsContext<'a> {
    pub title: &'a str,
    pub content: &'a PrdContent,
}

/// Context for the add-story prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryContext<'a> {
    pub epic_title: &'a str,
    pub epic_description: &'a str,
    pub goals: &'a [String],
    pub existing_stories: Vec<&'a str>,
    pub prompt: &'a str,
}

impl<'a> StoryContext<'a> {
    pub fn new(epic: &'a Epic, prompt: &'a str) -> Self {
        Self {
            epic_title: &epic.title,
            epic_description: &epic.description,
            goals: &epic.goals,
            existing_stories: epic.user_stories.iter().map(|s| s.title.as_str()).collect(),
            prompt,
        }
    }
}

pub fn epics_template() -> PromptTemplate {
    PromptTemplate::new("generate-epics", EPICS_SYSTEM_PROMPT, EPICS_USER_PROMPT)
}

pub fn story_template() -> PromptTemplate {
    PromptTemplate::new("add-story", STORY_SYSTEM_PROMPT, STORY_USER_PROMPT)
}

const EPICS_SYSTEM_PROMPT: &str = r#"You are an experienced agile product owner. Break a Product Requirements Document into delivery epics.

Rules:
- Produce 3 to 5 epics that together cover every core feature in the PRD.
- Each epic has 3 to 5 user stories.
- Each story has a title, a "As a ..., I want ... so that ..." description, 2 to 5 testable acceptance criteria, a priority, and an estimate in story points (1, 2, 3, 5, 8 or 13).
- Priorities are "high", "medium" or "low".

Respond with a single JSON object in exactly this format:
{
  "epics": [
    {
      "title": "Epic title",
      "description": "What this epic delivers",
      "priority": "high",
      "estimatedEffort": "2-3 weeks",
      "goals": ["Goal"],
      "userStories": [
        {
          "title": "Story title",
          "description": "As a ..., I want ... so that ...",
          "priority": "medium",
          "acceptanceCriteria": ["Criterion"],
          "estimatedStoryPoints": 3
        }
      ]
    }
  ]
}"#;

const EPICS_USER_PROMPT: &str = r#"Create epics and user stories for the PRD "{{title}}".

PRD content:
{{{json content}}}"#;

const STORY_SYSTEM_PROMPT: &str = r#"You are an experienced agile product owner. Write exactly one user story for an existing epic, based on the request you are given.

The story must fit the epic, must not duplicate an existing story, and must have 2 to 5 testable acceptance criteria and an estimate in story points (1, 2, 3, 5, 8 or 13).

Respond with a single JSON object in exactly this format:
{
  "title": "Story title",
  "description": "As a ..., I want ... so that ...",
  "priority": "high | medium | low",
  "acceptanceCriteria": ["Criterion"],
  "estimatedStoryPoints": 3
}"#;

const STORY_USER_PROMPT: &str = r#"Epic: {{epicTitle}}
Description: {{epicDescription}}
{{#if goals}}Goals: {{join goals "; "}}
{{/if}}
{{#if existingStories}}Existing stories:
{{#each existingStories}}- {{this}}
{{/each}}
{{/if}}
Request: {{prompt}}"#;
