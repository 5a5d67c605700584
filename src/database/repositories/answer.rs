//! Answer history repository implementation

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::store::AnswerHistory;
use crate::models::answer::{AnswerRecord, LastAnswer, NewAnswerRecord};
use crate::models::user::Role;
use crate::utils::errors::{AdaptiveQuizError, Result};
use crate::utils::logging::log_database_operation;

#[derive(Clone)]
#[derive(Debug)]
pub struct AnswerRepository {
    pool: PgPool,
}

impl AnswerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_insert_error(err: sqlx::Error, record: &NewAnswerRecord) -> AdaptiveQuizError {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return AdaptiveQuizError::DuplicateAnswer {
                    student_id: record.student_id,
                    quiz_id: record.quiz_id,
                    question_id: record.question_id,
                };
            }
            if db.is_foreign_key_violation() {
                return match db.constraint() {
                    Some("answer_records_student_id_fkey") => {
                        AdaptiveQuizError::StudentNotFound { student_id: record.student_id }
                    }
                    Some("answer_records_quiz_id_fkey") => {
                        AdaptiveQuizError::QuizNotFound { quiz_id: record.quiz_id }
                    }
                    _ => AdaptiveQuizError::QuestionNotFound { question_id: record.question_id },
                };
            }
        }
        err.into()
    }
}

#[async_trait]
impl AnswerHistory for AnswerRepository {
    async fn student_exists(&self, student_id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)"
        )
        .bind(student_id)
        .bind(Role::Student)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn fetch_last_answer(&self, student_id: i64, quiz_id: i64) -> Result<Option<LastAnswer>> {
        let last = sqlx::query_as::<_, LastAnswer>(
            r#"
            SELECT a.question_id, q.difficulty, q.correct_answer, a.answer_given, a.answered_at
            FROM answer_records a
            INNER JOIN questions q ON q.id = a.question_id
            WHERE a.student_id = $1 AND a.quiz_id = $2
            ORDER BY a.answered_at DESC, a.id DESC
            LIMIT 1
            "#
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(last)
    }

    async fn answered_question_ids(&self, student_id: i64, quiz_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT question_id FROM answer_records
            WHERE student_id = $1 AND quiz_id = $2
            ORDER BY question_id ASC
            "#
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn append_answer(&self, record: NewAnswerRecord) -> Result<AnswerRecord> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, AnswerRecord>(
            r#"
            INSERT INTO answer_records (student_id, quiz_id, question_id, answer_given, answered_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, student_id, quiz_id, question_id, answer_given, answered_at
            "#
        )
        .bind(record.student_id)
        .bind(record.quiz_id)
        .bind(record.question_id)
        .bind(&record.answer_given)
        .bind(record.answered_at)
        .fetch_one(&self.pool)
        .await;

        let elapsed = started.elapsed().as_millis() as u64;
        log_database_operation("insert", "answer_records", elapsed, result.is_ok());

        result.map_err(|e| Self::map_insert_error(e, &record))
    }

    async fn answers_for(&self, student_id: i64, quiz_id: i64) -> Result<Vec<AnswerRecord>> {
        let records = sqlx::query_as::<_, AnswerRecord>(
            r#"
            SELECT id, student_id, quiz_id, question_id, answer_given, answered_at
            FROM answer_records
            WHERE student_id = $1 AND quiz_id = $2
            ORDER BY answered_at ASC, id ASC
            "#
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
