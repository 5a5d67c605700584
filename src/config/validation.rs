//! Configuration validation module
//!
//! This module provides validation functions for the configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{AdaptiveQuizError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_quiz_config(&settings.quiz)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AdaptiveQuizError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(AdaptiveQuizError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AdaptiveQuizError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(AdaptiveQuizError::Config(
            "Acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AdaptiveQuizError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AdaptiveQuizError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate question bank rules
fn validate_quiz_config(config: &super::QuizConfig) -> Result<()> {
    if config.min_answer_options < 2 {
        return Err(AdaptiveQuizError::Config(
            "A question needs at least 2 answer options".to_string()
        ));
    }

    if config.min_answer_options > config.max_answer_options {
        return Err(AdaptiveQuizError::Config(
            "Min answer options cannot be greater than max answer options".to_string()
        ));
    }

    if config.max_question_length == 0 {
        return Err(AdaptiveQuizError::Config(
            "Max question length must be greater than 0".to_string()
        ));
    }

    Ok(())
}
