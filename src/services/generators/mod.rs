//! Prompt-driven generators.
//!
//! Each generator renders its prompt, calls the model through
//! [`StructuredGenerator`](crate::services::llm::StructuredGenerator) and
//! returns a validated value. None of them touch the record store.

mod conversation;
mod epics;
mod prd;

pub use conversation::{analyze_insights, enhance_section, follow_up_question};
pub use epics::{GeneratedEpics, generate_epics, generate_story};
pub use prd::{GeneratedPrd, generate_prd};

/// Temperature for structured outputs.
pub const STRUCTURED_TEMPERATURE: f32 = 0.3;
/// Temperature for the conversational follow-up question.
pub const CONVERSATIONAL_TEMPERATURE: f32 = 0.7;

fn elapsed_ms(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
