//! Question bank repository implementation
//!
//! Topics, questions, quizzes and quiz-question assignments.

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;

use crate::database::store::QuestionStore;
use crate::models::question::{
    CreateQuestionRequest, CreateTopicRequest, Difficulty, Question, Topic, UpdateQuestionRequest,
};
use crate::models::quiz::{Quiz, CreateQuizRequest};
use crate::utils::errors::{AdaptiveQuizError, Result};

const QUESTION_COLUMNS: &str = "q.id, q.school_id, q.topic_id, q.text, q.difficulty, \
    q.options, q.correct_answer, q.created_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct QuestionRepository {
    pool: PgPool,
}

impl QuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for QuestionRepository {
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, class_id, teacher_id, created_at FROM quizzes WHERE id = $1"
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn find_question(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions q WHERE q.id = $1",
            QUESTION_COLUMNS
        ))
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn fetch_candidate_questions(
        &self,
        quiz_id: i64,
        difficulty: Difficulty,
        exclude_question_ids: &[i64],
    ) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {}
            FROM quiz_question_assignments qa
            INNER JOIN questions q ON q.id = qa.question_id
            WHERE qa.quiz_id = $1
              AND q.difficulty = $2
              AND NOT (q.id = ANY($3))
            ORDER BY q.id ASC
            "#,
            QUESTION_COLUMNS
        ))
        .bind(quiz_id)
        .bind(difficulty)
        .bind(exclude_question_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn is_assigned(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM quiz_question_assignments WHERE quiz_id = $1 AND question_id = $2
            )
            "#
        )
        .bind(quiz_id)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {}
            FROM quiz_question_assignments qa
            INNER JOIN questions q ON q.id = qa.question_id
            WHERE qa.quiz_id = $1
            ORDER BY q.id ASC
            "#,
            QUESTION_COLUMNS
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn create_topic(&self, request: CreateTopicRequest) -> Result<Topic> {
        let result = sqlx::query_as::<_, Topic>(
            r#"
            INSERT INTO question_topics (school_id, name)
            VALUES ($1, $2)
            RETURNING id, school_id, name
            "#
        )
        .bind(request.school_id)
        .bind(&request.name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(topic) => Ok(topic),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AdaptiveQuizError::InvalidInput(format!(
                    "Topic '{}' already exists in school {}",
                    request.name, request.school_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question> {
        // Only insert when the topic belongs to the same school
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions
                (school_id, topic_id, text, difficulty, options, correct_answer, created_at)
            SELECT $1, t.id, $3, $4, $5, $6, $7
            FROM question_topics t
            WHERE t.id = $2 AND t.school_id = $1
            RETURNING id, school_id, topic_id, text, difficulty, options, correct_answer, created_at
            "#
        )
        .bind(request.school_id)
        .bind(request.topic_id)
        .bind(request.text)
        .bind(request.difficulty)
        .bind(request.options)
        .bind(request.correct_answer)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        question.ok_or(AdaptiveQuizError::TopicNotFound { topic_id: request.topic_id })
    }

    async fn update_question(
        &self,
        question_id: i64,
        request: UpdateQuestionRequest,
    ) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET text = COALESCE($2, text),
                difficulty = COALESCE($3, difficulty),
                options = COALESCE($4, options),
                correct_answer = COALESCE($5, correct_answer)
            WHERE id = $1
            RETURNING id, school_id, topic_id, text, difficulty, options, correct_answer, created_at
            "#
        )
        .bind(question_id)
        .bind(request.text)
        .bind(request.difficulty)
        .bind(request.options)
        .bind(request.correct_answer)
        .fetch_optional(&self.pool)
        .await?;

        question.ok_or(AdaptiveQuizError::QuestionNotFound { question_id })
    }

    async fn create_quiz(&self, request: CreateQuizRequest) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, class_id, teacher_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, class_id, teacher_id, created_at
            "#
        )
        .bind(request.title)
        .bind(request.class_id)
        .bind(request.teacher_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn assign_question(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        if self.find_quiz(quiz_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuizNotFound { quiz_id });
        }
        if self.find_question(question_id).await?.is_none() {
            return Err(AdaptiveQuizError::QuestionNotFound { question_id });
        }

        let result = sqlx::query(
            r#"
            INSERT INTO quiz_question_assignments (quiz_id, question_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(quiz_id)
        .bind(question_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
