//! Prompt templates for every generation step.
//!
//! Each template module exposes a context type and a `template()` function.
//! Templates are Handlebars with HTML escaping disabled.

use handlebars::Handlebars;
use serde::Serialize;

use crate::services::llm::GenerationError;

pub mod conversation;
pub mod epics;
pub mod pages;
pub mod prd;

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID, also used as the prompt name in logs
    pub id: &'static str,
    /// System prompt template
    pub system: &'static str,
    /// User prompt template
    pub user: &'static str,
}

impl PromptTemplate {
    pub const fn new(id: &'static str, system: &'static str, user: &'static str) -> Self {
        Self { id, system, user }
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> Result<(String, String), GenerationError> {
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", self.system)
            .map_err(|e| GenerationError::Template(format!("Invalid {} system template: {e}", self.id)))?;

        handlebars
            .register_template_string("user", self.user)
            .map_err(|e| GenerationError::Template(format!("Invalid {} user template: {e}", self.id)))?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| GenerationError::Template(format!("Failed to render {} system prompt: {e}", self.id)))?;

        let user = handlebars
            .render("user", context)
            .map_err(|e| GenerationError::Template(format!("Failed to render {} user prompt: {e}", self.id)))?;

        Ok((system, user))
    }
}

/// Create a Handlebars instance with custom helpers.
pub(crate) fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);

    // Prompts and generated source are not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    // Helper: {{{json value}}}
    handlebars.register_helper(
        "json",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                if let Some(param) = h.param(0) {
                    let json = serde_json::to_string_pretty(param.value())
                        .unwrap_or_else(|_| "null".to_string());
                    out.write(&json)?;
                }
                Ok(())
            },
        ),
    );

    // Helper: {{join items ", "}}
    handlebars.register_helper(
        "join",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
                if let Some(items) = h.param(0).and_then(|v| v.value().as_array()) {
                    let joined = items
                        .iter()
                        .map(|item| match item.as_str() {
                            Some(s) => s.to_string(),
                            None => item.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(separator);
                    out.write(&joined)?;
                }
                Ok(())
            },
        ),
    );

    handlebars
}
