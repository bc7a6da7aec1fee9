//! Shared state handed to every request handler.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, defaults};
use crate::db::PrdRepository;
use crate::services::llm::GenerationError;
use crate::services::{CodeGenerator, GenerationLimiter, LanguageModel, StructuredGenerator};

/// Everything handlers need, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub repo: Arc<dyn PrdRepository>,
    pub generator: StructuredGenerator,
    pub codegen: CodeGenerator,
    pub limiter: GenerationLimiter,
    pub max_upload_size: usize,
    pub upload_dir: Option<PathBuf>,
    pub model_assisted_codegen: bool,
}

impl AppState {
    /// State with the development defaults. Used by tests and tooling.
    pub fn new(
        repo: Arc<dyn PrdRepository>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            repo,
            generator: StructuredGenerator::new(model, defaults::DEV_SCHEMA_REPAIR_ATTEMPTS),
            codegen: CodeGenerator::new()?,
            limiter: GenerationLimiter::new(
                defaults::DEV_MAX_CONCURRENT_GENERATIONS,
                Duration::from_secs(defaults::DEV_GENERATION_QUEUE_TIMEOUT_SECS),
            ),
            max_upload_size: defaults::DEV_MAX_UPLOAD_SIZE,
            upload_dir: None,
            model_assisted_codegen: false,
        })
    }

    pub fn from_config(
        config: &Config,
        repo: Arc<dyn PrdRepository>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            repo,
            generator: StructuredGenerator::new(model, config.llm.repair_attempts),
            codegen: CodeGenerator::new()?,
            limiter: GenerationLimiter::new(
                config.max_concurrent_generations,
                Duration::from_secs(config.generation_queue_timeout_secs),
            ),
            max_upload_size: config.max_upload_size,
            upload_dir: config.upload_dir.clone(),
            model_assisted_codegen: config.model_assisted_codegen,
        })
    }

    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    pub fn with_limiter(mut self, limiter: GenerationLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_model_assisted_codegen(mut self, enabled: bool) -> Self {
        self.model_assisted_codegen = enabled;
        self
    }

    pub fn with_repair_attempts(mut self, attempts: u32) -> Self {
        self.generator = self.generator.with_repair_attempts(attempts);
        self
    }
}
