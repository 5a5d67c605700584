//! Services module
//!
//! This module contains the quiz business logic: adaptive question
//! selection and the session-facing quiz service built on top of it.

pub mod quiz;
pub mod selector;

// Re-export commonly used services
pub use quiz::QuizService;
pub use selector::{AdaptiveSelector, COLD_START_DIFFICULTY, next_difficulty, target_difficulty};
