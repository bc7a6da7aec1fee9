//! Generated application bundle returned by the code generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// One generated source or config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedFile {
    /// Path relative to the project root (e.g. "src/pages/ClientsPage.tsx").
    pub path: String,
    pub filename: String,
    pub content: String,
    pub description: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: String, description: impl Into<String>) -> Self {
        let path = path.into();
        let filename = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            path,
            filename,
            content,
            description: description.into(),
        }
    }
}

/// How page bodies were produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    Templated,
    ModelAssisted,
}

impl GenerationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "templated" => Some(Self::Templated),
            "model_assisted" => Some(Self::ModelAssisted),
            _ => None,
        }
    }
}

/// Full generated frontend project. Never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedApp {
    pub app_name: String,
    pub components: Vec<GeneratedFile>,
    pub pages: Vec<GeneratedFile>,
    pub hooks: Vec<GeneratedFile>,
    pub utils: Vec<GeneratedFile>,
    pub config: Vec<GeneratedFile>,
    /// Contents of package.json.
    #[schema(value_type = Object)]
    pub package_manifest: JsonValue,
    pub readme_text: String,
    pub deploy_notes: String,
    pub generation_mode: GenerationMode,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedApp {
    /// All files in a stable order.
    pub fn all_files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.components
            .iter()
            .chain(&self.pages)
            .chain(&self.hooks)
            .chain(&self.utils)
            .chain(&self.config)
    }
}

/// Query string for `POST /api/prds/{id}/generate-app`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GenerateAppQuery {
    /// `templated` or `model_assisted`; defaults to the server setting.
    pub mode: Option<String>,
}
