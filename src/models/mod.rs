//! Data models module
//!
//! This module contains all data structures used throughout the crate

pub mod user;
pub mod question;
pub mod quiz;
pub mod answer;

// Re-export commonly used models
pub use user::{User, Role, CreateUserRequest};
pub use question::{
    CreateQuestionRequest, CreateTopicRequest, Difficulty, Question, Topic, UpdateQuestionRequest,
};
pub use quiz::{Quiz, CreateQuizRequest};
pub use answer::{AnswerRecord, NewAnswerRecord, LastAnswer, AnswerOutcome, QuizProgress};
