//! Database repositories module
//!
//! This module contains the PostgreSQL repository implementations

pub mod user;
pub mod question;
pub mod answer;

// Re-export repositories
pub use user::UserRepository;
pub use question::QuestionRepository;
pub use answer::AnswerRepository;
