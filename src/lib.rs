//! AdaptiveQuiz
//!
//! An adaptive quiz-session engine. Teachers build quizzes from a school's
//! question pool, students answer them one question at a time, and the engine
//! picks each next question from the difficulty tier that follows the
//! student's last answer.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AdaptiveQuizError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore};
pub use services::{AdaptiveSelector, QuizService};
pub use state::SessionContext;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
