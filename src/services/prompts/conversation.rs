//! Discovery conversation prompts and the PRD section enhancer.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the follow-up question prompt.
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpContext<'a> {
    pub transcript: &'a str,
    pub phase: &'a str,
    pub context: &'a str,
}

/// Context for the insights prompt.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsContext<'a> {
    pub transcript: &'a str,
}

/// Context for the section enhancer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceSectionContext<'a> {
    pub section_content: &'a str,
    pub section_type: &'a str,
    pub context: &'a str,
}

pub fn follow_up_template() -> PromptTemplate {
    PromptTemplate::new("follow-up-question", FOLLOW_UP_SYSTEM, FOLLOW_UP_USER)
}

pub fn insights_template() -> PromptTemplate {
    PromptTemplate::new("conversation-insights", INSIGHTS_SYSTEM, INSIGHTS_USER)
}

pub fn enhance_section_template() -> PromptTemplate {
    PromptTemplate::new("enhance-section", ENHANCE_SYSTEM, ENHANCE_USER)
}

const FOLLOW_UP_SYSTEM: &str = "You are a warm, curious and witty product person running a discovery conversation. You ask questions that uncover not just what to build, but why it matters and how it should feel.";

const FOLLOW_UP_USER: &str = r#"CURRENT CONVERSATION TRANSCRIPT:
"{{transcript}}"

CURRENT PHASE: {{phase}}
CONTEXT: {{context}}

Ask ONE follow-up question that:
1. Digs deeper into what has been discussed
2. Uncovers information still missing for a complete PRD
3. Helps identify user personas, brand personality and emotional design needs
4. Moves the conversation toward actionable product specifications

Areas to probe: problems (impact, frequency), users (personas, behaviours), features (success measures, edge cases), technical constraints (integrations, scale), design and brand (tone, visual direction, accessibility), and business goals.

Return only the question, prefixed with a single fitting emoji."#;

const INSIGHTS_SYSTEM: &str = "You analyze product discovery conversations and extract structured insights that help build comprehensive PRDs.";

const INSIGHTS_USER: &str = r#"Analyze this product discovery conversation:

"{{transcript}}"

Respond with a single JSON object in exactly this format:
{
  "keyThemes": ["theme"],
  "userPersonas": [
    { "name": "persona", "demographics": "age/role", "needs": ["need"], "frustrations": ["frustration"], "goals": ["goal"] }
  ],
  "painPoints": ["pain"],
  "businessGoals": ["goal"],
  "technicalRequirements": ["requirement"],
  "designAndBrandInsights": {
    "brandPersonality": ["trait"],
    "visualDirection": "description",
    "toneOfVoice": "description",
    "userExperiencePhilosophy": "description"
  },
  "emotionalJourney": {
    "currentFeelings": ["feeling"],
    "desiredFeelings": ["feeling"]
  },
  "missingInformation": ["gap"],
  "suggestedNextSteps": ["step"]
}"#;

const ENHANCE_SYSTEM: &str = r#"You are a product management expert. Enhance the following {{sectionType}} section of a PRD. Make it more detailed, professional and actionable while keeping its original intent. Return only the enhanced section text.{{#if context}}

Context: {{context}}{{/if}}"#;

const ENHANCE_USER: &str = "{{sectionContent}}";
