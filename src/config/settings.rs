//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub quiz: QuizConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_path: Option<String>,
    pub json: bool,
}

/// Question bank rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizConfig {
    pub min_answer_options: usize,
    pub max_answer_options: usize,
    pub max_question_length: usize,
}

impl Settings {
    /// Load settings from `config.toml` (optional) and `ADAPTIVE_QUIZ__*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::from_sources(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit configuration file, still honouring environment overrides
    pub fn from_file(path: &std::path::Path) -> Result<Self, config::ConfigError> {
        Self::from_sources(config::File::from(path))
    }

    fn from_sources(
        file: config::File<config::FileSourceFile, config::FileFormat>,
    ) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as u64)?
            .set_default("database.min_connections", defaults.database.min_connections as u64)?
            .set_default(
                "database.acquire_timeout_seconds",
                defaults.database.acquire_timeout_seconds,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .set_default("quiz.min_answer_options", defaults.quiz.min_answer_options as u64)?
            .set_default("quiz.max_answer_options", defaults.quiz.max_answer_options as u64)?
            .set_default("quiz.max_question_length", defaults.quiz.max_question_length as u64)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ADAPTIVE_QUIZ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Render the settings as a TOML document
    pub fn to_toml(&self) -> Result<String, crate::utils::errors::AdaptiveQuizError> {
        toml::to_string_pretty(self)
            .map_err(|e| {
                crate::utils::errors::AdaptiveQuizError::Config(format!(
                    "Cannot render settings: {}",
                    e
                ))
            })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AdaptiveQuizError> {
        super::validation::validate_settings(self)
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_answer_options: 2,
            max_answer_options: 6,
            max_question_length: 1000,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/adaptive_quiz".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json: false,
            },
            quiz: QuizConfig::default(),
        }
    }
}
