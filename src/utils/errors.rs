//! Error handling for AdaptiveQuiz
//!
//! This module defines the main error type used throughout the crate
//! and the coarse error kinds callers branch on.

use thiserror::Error;
use crate::models::question::Difficulty;

/// Main error type for AdaptiveQuiz
#[derive(Error, Debug)]
pub enum AdaptiveQuizError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Quiz not found: {quiz_id}")]
    QuizNotFound { quiz_id: i64 },

    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: i64 },

    #[error("Question not found: {question_id}")]
    QuestionNotFound { question_id: i64 },

    #[error("Topic not found: {topic_id}")]
    TopicNotFound { topic_id: i64 },

    #[error("No unseen {difficulty} question left in quiz {quiz_id}")]
    Exhausted { quiz_id: i64, difficulty: Difficulty },

    #[error("Question {question_id} already answered by student {student_id} in quiz {quiz_id}")]
    DuplicateAnswer { student_id: i64, quiz_id: i64, question_id: i64 },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for AdaptiveQuiz operations
pub type Result<T> = std::result::Result<T, AdaptiveQuizError>;

/// Coarse classification surfaced to the quiz-taking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Repository,
    Exhausted,
    InvalidInput,
    PermissionDenied,
    Config,
}

impl AdaptiveQuizError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdaptiveQuizError::Database(_) => ErrorKind::Repository,
            AdaptiveQuizError::Repository(_) => ErrorKind::Repository,
            AdaptiveQuizError::Config(_) => ErrorKind::Config,
            AdaptiveQuizError::ConfigLoad(_) => ErrorKind::Config,
            AdaptiveQuizError::QuizNotFound { .. } => ErrorKind::NotFound,
            AdaptiveQuizError::StudentNotFound { .. } => ErrorKind::NotFound,
            AdaptiveQuizError::QuestionNotFound { .. } => ErrorKind::NotFound,
            AdaptiveQuizError::TopicNotFound { .. } => ErrorKind::NotFound,
            AdaptiveQuizError::Exhausted { .. } => ErrorKind::Exhausted,
            AdaptiveQuizError::DuplicateAnswer { .. } => ErrorKind::InvalidInput,
            AdaptiveQuizError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AdaptiveQuizError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_exhausted(&self) -> bool {
        self.kind() == ErrorKind::Exhausted
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdaptiveQuizError::Database(_) => ErrorSeverity::Critical,
            AdaptiveQuizError::Repository(_) => ErrorSeverity::Critical,
            AdaptiveQuizError::Config(_) => ErrorSeverity::Critical,
            AdaptiveQuizError::ConfigLoad(_) => ErrorSeverity::Critical,
            AdaptiveQuizError::PermissionDenied(_) => ErrorSeverity::Warning,
            AdaptiveQuizError::DuplicateAnswer { .. } => ErrorSeverity::Warning,
            AdaptiveQuizError::Exhausted { .. } => ErrorSeverity::Info,
            AdaptiveQuizError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
