//! Application configuration loaded from environment variables.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::path::PathBuf;

/// Development default values.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 5000;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10 MiB per uploaded document
    pub const DEV_MAX_CONCURRENT_GENERATIONS: usize = 4; // Concurrent model-backed requests
    pub const DEV_GENERATION_QUEUE_TIMEOUT_SECS: u64 = 30; // Wait for a slot before rejecting
    pub const DEV_SCHEMA_REPAIR_ATTEMPTS: u32 = 0;

    pub const DEV_OPENAI_BASE_URL: &str = "https://api.openai.com";
    pub const DEV_OPENAI_MODEL: &str = "gpt-4o";
    pub const DEV_OPENAI_TIMEOUT_SECS: u64 = 120;

    /// Placeholder key some tooling writes into `.env` templates.
    pub const PLACEHOLDER_API_KEY: &str = "default_key";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Language model endpoint configuration.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// API key for the completion endpoint (never logged)
    pub api_key: SecretString,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Extra re-prompts after malformed or schema-invalid output
    pub repair_attempts: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory for static frontend assets
    pub static_dir: Option<PathBuf>,
    /// Maximum accepted document size in bytes (default: 10 MiB)
    pub max_upload_size: usize,
    /// Directory for transient upload files (default: system temp dir)
    pub upload_dir: Option<PathBuf>,
    /// Maximum concurrent model-backed requests (default: 4)
    pub max_concurrent_generations: usize,
    /// Generation queue timeout in seconds (default: 30s)
    pub generation_queue_timeout_secs: u64,
    /// Use the model to write page bodies during app generation
    pub model_assisted_codegen: bool,
    /// Language model settings
    pub llm: LlmSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `RUST_ENV` and `OPENAI_API_KEY` are required in every environment; a
    /// missing key fails here instead of surfacing later as an upstream
    /// authentication error.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `BEANSTALK_HOST`: Server host (default: 127.0.0.1)
    /// - `BEANSTALK_PORT`: Server port (default: 5000)
    /// - `BEANSTALK_STATIC_DIR`: Built frontend to serve
    /// - `BEANSTALK_MAX_UPLOAD_SIZE`: Max document size in bytes (default: 10 MiB)
    /// - `BEANSTALK_UPLOAD_DIR`: Directory for transient upload files
    /// - `BEANSTALK_MAX_CONCURRENT_GENERATIONS`: Concurrent generations (default: 4)
    /// - `BEANSTALK_GENERATION_QUEUE_TIMEOUT_SECS`: Queue timeout (default: 30)
    /// - `BEANSTALK_SCHEMA_REPAIR_ATTEMPTS`: Re-prompts on invalid output (default: 0)
    /// - `BEANSTALK_MODEL_ASSISTED_CODEGEN`: true/false (default: false)
    /// - `OPENAI_API_KEY`: Completion API key - REQUIRED
    /// - `OPENAI_BASE_URL`: OpenAI-compatible base URL
    /// - `OPENAI_MODEL`: Model identifier (default: gpt-4o)
    /// - `OPENAI_TIMEOUT_SECS`: Request timeout (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar("OPENAI_API_KEY"))?;

        let host = lookup("BEANSTALK_HOST").unwrap_or_else(|| defaults::DEV_HOST.to_string());

        let port = lookup("BEANSTALK_PORT")
            .unwrap_or_else(|| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("BEANSTALK_PORT must be a valid port number"))?;

        let max_upload_size = lookup("BEANSTALK_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("BEANSTALK_MAX_UPLOAD_SIZE must be a valid number")
            })?;

        let max_concurrent_generations = lookup("BEANSTALK_MAX_CONCURRENT_GENERATIONS")
            .unwrap_or_else(|| defaults::DEV_MAX_CONCURRENT_GENERATIONS.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BEANSTALK_MAX_CONCURRENT_GENERATIONS must be a valid number",
                )
            })?;

        let generation_queue_timeout_secs = lookup("BEANSTALK_GENERATION_QUEUE_TIMEOUT_SECS")
            .unwrap_or_else(|| defaults::DEV_GENERATION_QUEUE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BEANSTALK_GENERATION_QUEUE_TIMEOUT_SECS must be a valid number",
                )
            })?;

        let repair_attempts = lookup("BEANSTALK_SCHEMA_REPAIR_ATTEMPTS")
            .unwrap_or_else(|| defaults::DEV_SCHEMA_REPAIR_ATTEMPTS.to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("BEANSTALK_SCHEMA_REPAIR_ATTEMPTS must be a valid number")
            })?;

        let model_assisted_codegen = match lookup("BEANSTALK_MODEL_ASSISTED_CODEGEN") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue(
                "BEANSTALK_MODEL_ASSISTED_CODEGEN must be 'true' or 'false'",
            ))?,
            None => false,
        };

        let timeout_secs = lookup("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|| defaults::DEV_OPENAI_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("OPENAI_TIMEOUT_SECS must be a valid number"))?;

        let llm = LlmSettings {
            api_key: SecretString::from(api_key),
            base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| defaults::DEV_OPENAI_BASE_URL.to_string()),
            model: lookup("OPENAI_MODEL")
                .unwrap_or_else(|| defaults::DEV_OPENAI_MODEL.to_string()),
            timeout_secs,
            repair_attempts,
        };

        let config = Config {
            environment,
            host,
            port,
            static_dir: lookup("BEANSTALK_STATIC_DIR").map(PathBuf::from),
            max_upload_size,
            upload_dir: lookup("BEANSTALK_UPLOAD_DIR").map(PathBuf::from),
            max_concurrent_generations,
            generation_queue_timeout_secs,
            model_assisted_codegen,
            llm,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration is usable against a real endpoint.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.llm.api_key.expose_secret() == defaults::PLACEHOLDER_API_KEY {
            errors.push(
                "OPENAI_API_KEY is a placeholder value. Set a real API key.".to_string(),
            );
        }

        if !self.llm.base_url.starts_with("https://") {
            errors.push(format!(
                "OPENAI_BASE_URL '{}' must use https in production.",
                self.llm.base_url
            ));
        }

        if self.max_upload_size == 0 {
            errors.push("BEANSTALK_MAX_UPLOAD_SIZE must be greater than zero.".to_string());
        }

        if self.max_concurrent_generations == 0 {
            errors.push(
                "BEANSTALK_MAX_CONCURRENT_GENERATIONS must be greater than zero.".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Parse a boolean flag the way HTML forms and env files spell it.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
