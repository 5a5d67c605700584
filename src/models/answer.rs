//! Answer history models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::question::{Difficulty, Question};
use crate::utils::helpers::answers_match;

/// A student's answer to one question of one quiz. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AnswerRecord {
    pub id: i64,
    pub student_id: i64,
    pub quiz_id: i64,
    pub question_id: i64,
    pub answer_given: Option<String>,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnswerRecord {
    pub student_id: i64,
    pub quiz_id: i64,
    pub question_id: i64,
    pub answer_given: Option<String>,
    pub answered_at: DateTime<Utc>,
}

/// The most recent answer of a student in a quiz, joined with its question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LastAnswer {
    pub question_id: i64,
    pub difficulty: Difficulty,
    pub correct_answer: String,
    pub answer_given: Option<String>,
    pub answered_at: DateTime<Utc>,
}

impl LastAnswer {
    pub fn was_correct(&self) -> bool {
        answers_match(&self.correct_answer, self.answer_given.as_deref())
    }
}

/// Result of submitting an answer
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub record: AnswerRecord,
    pub correct: bool,
    /// `None` once no unseen question is left at the next tier
    pub next_question: Option<Question>,
}

/// Per-student summary of a quiz attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub quiz_id: i64,
    pub student_id: i64,
    pub answered: usize,
    pub correct: usize,
    pub assigned: usize,
}

impl QuizProgress {
    pub fn remaining(&self) -> usize {
        self.assigned.saturating_sub(self.answered)
    }
}
