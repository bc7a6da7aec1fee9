//! Model-assisted page body prompt.

use serde::Serialize;

use super::PromptTemplate;

/// Context for one page request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext<'a> {
    pub app_name: &'a str,
    pub component_name: &'a str,
    pub epic_title: &'a str,
    pub epic_description: &'a str,
    pub goals: &'a [String],
    pub stories: Vec<PageStory<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStory<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub acceptance_criteria: &'a [String],
}

pub fn page_template() -> PromptTemplate {
    PromptTemplate::new("generate-page", SYSTEM_PROMPT, USER_PROMPT)
}

const SYSTEM_PROMPT: &str = "You write complete, production-ready React page components in TypeScript with Tailwind CSS. Output only the contents of the .tsx file, with no explanation.";

const USER_PROMPT: &str = r#"Write the page component {{componentName}} for the "{{appName}}" app.

Epic: {{epicTitle}}
Description: {{epicDescription}}
{{#if goals}}Goals: {{join goals "; "}}
{{/if}}
User stories to implement:
{{#each stories}}- {{title}}: {{description}}
  Acceptance criteria: {{join acceptanceCriteria "; "}}
{{/each}}
Requirements:
- Default-export a component named {{componentName}}
- Import shared components from "../components/DataTable", "../components/SearchBar", "../components/StatsCard" and "../components/FormModal"
- Use the useApi hook from "../hooks/useApi" for data access and useState for local state
- Include loading and error states, responsive layout and accessible markup"#;
