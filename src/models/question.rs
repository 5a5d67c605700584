//! Question, topic and difficulty models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::config::QuizConfig;
use crate::utils::errors::{AdaptiveQuizError, Result};
use crate::utils::helpers::normalize_answer;

/// Difficulty tier of a question. Ordered Easy < Medium < Hard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "difficulty_level", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, lowest first
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// One tier harder, saturating at Hard
    pub fn step_up(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// One tier easier, saturating at Easy
    pub fn step_down(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Easy,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AdaptiveQuizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AdaptiveQuizError::InvalidInput(format!(
                "Invalid difficulty: {}. Expected Easy, Medium or Hard",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub school_id: i64,
    pub topic_id: i64,
    pub text: String,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    pub school_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub school_id: i64,
    pub topic_id: i64,
    pub text: String,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
}

impl CreateTopicRequest {
    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AdaptiveQuizError::InvalidInput("Topic name cannot be empty".to_string()));
        }
        Ok(Self { name, ..self })
    }
}

impl CreateQuestionRequest {
    /// Trim all text fields and check the question invariants
    pub fn normalized(self, rules: &QuizConfig) -> Result<Self> {
        let text = self.text.trim().to_string();
        let options: Vec<String> = self.options.iter().map(|o| o.trim().to_string()).collect();
        let correct_answer = self.correct_answer.trim().to_string();

        validate_question_content(&text, &options, &correct_answer, rules)?;

        Ok(Self {
            text,
            options,
            correct_answer,
            ..self
        })
    }
}

impl UpdateQuestionRequest {
    /// Merge the update onto an existing question and check the result
    pub fn apply_to(&self, question: &Question, rules: &QuizConfig) -> Result<Question> {
        let text = self.text.as_deref().unwrap_or(&question.text).trim().to_string();
        let options: Vec<String> = self
            .options
            .as_ref()
            .unwrap_or(&question.options)
            .iter()
            .map(|o| o.trim().to_string())
            .collect();
        let correct_answer = self
            .correct_answer
            .as_deref()
            .unwrap_or(&question.correct_answer)
            .trim()
            .to_string();

        validate_question_content(&text, &options, &correct_answer, rules)?;

        Ok(Question {
            text,
            difficulty: self.difficulty.unwrap_or(question.difficulty),
            options,
            correct_answer,
            ..question.clone()
        })
    }
}

fn validate_question_content(
    text: &str,
    options: &[String],
    correct_answer: &str,
    rules: &QuizConfig,
) -> Result<()> {
    if text.is_empty() {
        return Err(AdaptiveQuizError::InvalidInput("Question text cannot be empty".to_string()));
    }

    if text.chars().count() > rules.max_question_length {
        return Err(AdaptiveQuizError::InvalidInput(format!(
            "Question text too long: {} > {}",
            text.chars().count(),
            rules.max_question_length
        )));
    }

    if options.len() < rules.min_answer_options || options.len() > rules.max_answer_options {
        return Err(AdaptiveQuizError::InvalidInput(format!(
            "A question needs between {} and {} answer options, got {}",
            rules.min_answer_options,
            rules.max_answer_options,
            options.len()
        )));
    }

    if options.iter().any(|o| o.is_empty()) {
        return Err(AdaptiveQuizError::InvalidInput("Answer options cannot be empty".to_string()));
    }

    let mut seen = std::collections::HashSet::new();
    for option in options {
        if !seen.insert(normalize_answer(option)) {
            return Err(AdaptiveQuizError::InvalidInput(format!(
                "Duplicate answer option: {}",
                option
            )));
        }
    }

    if !options.iter().any(|o| o == correct_answer) {
        return Err(AdaptiveQuizError::InvalidInput(format!(
            "Correct answer '{}' is not one of the answer options",
            correct_answer
        )));
    }

    Ok(())
}
