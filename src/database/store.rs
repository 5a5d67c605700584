//! Repository contracts consumed by the quiz engine
//!
//! The selector only reads through these traits. Writes (authoring and
//! appending answers) live on the same traits so a single backend can serve
//! the whole quiz service, but the selector never calls them.

use async_trait::async_trait;

use crate::models::{
    AnswerRecord, CreateQuestionRequest, CreateQuizRequest, CreateTopicRequest, Difficulty,
    LastAnswer, NewAnswerRecord, Question, Quiz, Topic, UpdateQuestionRequest,
};
use crate::utils::errors::Result;

/// Questions, quizzes and the quiz-question assignment relation
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>>;

    async fn find_question(&self, question_id: i64) -> Result<Option<Question>>;

    /// Questions assigned to `quiz_id` at `difficulty`, minus `exclude_question_ids`,
    /// ordered by ascending question id.
    async fn fetch_candidate_questions(
        &self,
        quiz_id: i64,
        difficulty: Difficulty,
        exclude_question_ids: &[i64],
    ) -> Result<Vec<Question>>;

    async fn is_assigned(&self, quiz_id: i64, question_id: i64) -> Result<bool>;

    /// All questions assigned to a quiz, ordered by ascending question id
    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>>;

    async fn create_topic(&self, request: CreateTopicRequest) -> Result<Topic>;

    /// Persist an already validated question
    async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question>;

    /// Persist an already validated update
    async fn update_question(
        &self,
        question_id: i64,
        request: UpdateQuestionRequest,
    ) -> Result<Question>;

    async fn create_quiz(&self, request: CreateQuizRequest) -> Result<Quiz>;

    /// Assign a question to a quiz. Returns false when it was already assigned.
    async fn assign_question(&self, quiz_id: i64, question_id: i64) -> Result<bool>;
}

/// Ordered answer history per (student, quiz)
#[async_trait]
pub trait AnswerHistory: Send + Sync {
    async fn student_exists(&self, student_id: i64) -> Result<bool>;

    /// Most recent answer by `answered_at`, ties broken by the higher record id
    async fn fetch_last_answer(&self, student_id: i64, quiz_id: i64) -> Result<Option<LastAnswer>>;

    async fn answered_question_ids(&self, student_id: i64, quiz_id: i64) -> Result<Vec<i64>>;

    /// Append a record. Fails with `DuplicateAnswer` if the question was already answered.
    async fn append_answer(&self, record: NewAnswerRecord) -> Result<AnswerRecord>;

    /// Full history, oldest first
    async fn answers_for(&self, student_id: i64, quiz_id: i64) -> Result<Vec<AnswerRecord>>;
}
