//! Business logic services.

pub mod codegen;
pub mod extraction;
pub mod generators;
pub mod limiter;
pub mod llm;
pub mod prompts;
pub mod upload;

pub use codegen::CodeGenerator;
pub use limiter::GenerationLimiter;
pub use llm::{LanguageModel, OpenAiClient, StructuredGenerator};
