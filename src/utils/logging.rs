//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the quiz engine.

use tracing::{info, warn, debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::models::question::Difficulty;
use crate::utils::errors::{AdaptiveQuizError, Result};
use crate::utils::helpers::truncate_text;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file appender on drop; keep it alive for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| {
            AdaptiveQuizError::Config(format!("Invalid log filter '{}': {}", config.level, e))
        })?;

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(dir) if !dir.is_empty() => {
            let file_appender = tracing_appender::rolling::daily(dir, "adaptive_quiz.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        _ => (None, None),
    };

    let (json_layer, text_layer) = if config.json {
        (Some(fmt::layer().json().with_writer(std::io::stdout)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stdout)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AdaptiveQuizError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a question being served to a student
pub fn log_question_served(
    student_id: i64,
    quiz_id: i64,
    difficulty: Difficulty,
    question_id: i64,
    text: &str,
) {
    info!(
        student_id = student_id,
        quiz_id = quiz_id,
        difficulty = %difficulty,
        question_id = question_id,
        question = %truncate_text(text, 60),
        "Question served"
    );
}

/// Log an answer being appended to the history
pub fn log_answer_recorded(student_id: i64, quiz_id: i64, question_id: i64, correct: bool) {
    info!(
        student_id = student_id,
        quiz_id = quiz_id,
        question_id = question_id,
        correct = correct,
        "Answer recorded"
    );
}

/// Log that no unseen question is left at the selected tier
pub fn log_quiz_exhausted(student_id: i64, quiz_id: i64, difficulty: Difficulty) {
    warn!(
        student_id = student_id,
        quiz_id = quiz_id,
        difficulty = %difficulty,
        "No unseen question left at tier"
    );
}

/// Log question bank and quiz authoring actions
pub fn log_teacher_action(
    teacher_id: i64,
    action: &str,
    target: Option<i64>,
    details: Option<&str>,
) {
    info!(
        teacher_id = teacher_id,
        action = action,
        target = target,
        details = details,
        "Teacher action performed"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
