//! PRD generation prompt.

use serde::Serialize;

use super::PromptTemplate;
use crate::models::GenerationOptions;

/// Context for the PRD prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdContext {
    pub conversation: String,
    pub extract_personas: bool,
    pub identify_features: bool,
    pub generate_acceptance_criteria: bool,
}

impl PrdContext {
    pub fn new(conversation: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            conversation: conversation.into(),
            extract_personas: options.extract_personas,
            identify_features: options.identify_features,
            generate_acceptance_criteria: options.generate_acceptance_criteria,
        }
    }
}

pub fn template() -> PromptTemplate {
    PromptTemplate::new("generate-prd", SYSTEM_PROMPT, USER_PROMPT)
}

const SYSTEM_PROMPT: &str = r#"You are a senior product manager who turns conversations into comprehensive Product Requirements Documents (PRDs).

Read the conversation and extract what was actually said: user needs and pain points, capabilities discussed, business goals and success measures, technical constraints, and user workflows. Do not invent facts that contradict the conversation; where the conversation is silent, make reasonable, clearly stated assumptions.

{{#if extractPersonas}}
Identify every distinct user type mentioned or implied and describe each as a persona with characteristics and needs.
{{else}}
Leave "targetUsersAndPersonas" as an empty list unless the conversation names explicit user roles.
{{/if}}
{{#if identifyFeatures}}
Enumerate every feature or capability discussed as a separate entry in "coreFeatures", ordered by priority.
{{/if}}
{{#if generateAcceptanceCriteria}}
Write each feature's "userStory" as "As a <user>, I want <goal> so that <benefit>" followed by concrete, testable acceptance criteria.
{{/if}}

Respond with a single JSON object in exactly this format. Every field is required; use an empty list when there is nothing to say.
{
  "title": "Clear, descriptive product title",
  "content": {
    "purposeAndVision": "Why this product exists and what success looks like",
    "scope": {
      "inScope": ["Item"],
      "outOfScope": ["Item"]
    },
    "targetUsersAndPersonas": [
      { "name": "Persona", "description": "Who they are", "characteristics": ["Trait"], "needs": ["Need"] }
    ],
    "coreFeatures": [
      { "name": "Feature", "description": "What it does", "priority": "High | Medium | Low", "userStory": "As a ..., I want ... so that ..." }
    ],
    "uiUxAspirations": {
      "style": "Visual style",
      "tone": "Voice and tone",
      "userExperience": "Experience principles"
    },
    "nonFunctionalRequirements": [
      { "type": "Performance | Security | Accessibility | ...", "requirement": "Requirement", "rationale": "Why" }
    ],
    "assumptions": ["Assumption"],
    "dependencies": [
      { "type": "Technical | Business | External", "dependency": "Dependency", "impact": "Impact if unavailable" }
    ],
    "risksAndMitigations": [
      { "risk": "Risk", "impact": "High | Medium | Low", "mitigation": "Mitigation" }
    ],
    "successMetrics": [
      { "metric": "Metric", "target": "Target value", "timeframe": "When" }
    ],
    "futureRoadmap": [
      { "name": "Initiative", "description": "Description", "businessValue": "Value", "timeframe": "When" }
    ]
  }
}"#;

const USER_PROMPT: &str = r#"Please analyze this conversation and generate a comprehensive PRD:

{{conversation}}"#;
