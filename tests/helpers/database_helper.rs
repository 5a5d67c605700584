//! Test database helper utilities
//!
//! PostgreSQL tests run only when `TEST_DATABASE_URL` points at a database
//! the tests may wipe. Without it they return early.

use sqlx::PgPool;

use AdaptiveQuiz::database::DatabaseService;

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
}

impl TestDatabase {
    /// Connect, migrate and clean the test database; `None` when not configured
    pub async fn from_env() -> Option<Self> {
        super::init_test_env();

        let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&database_url).await.expect("connect to TEST_DATABASE_URL");

        sqlx::migrate!("./migrations").run(&pool).await.expect("run migrations");

        let db = Self { pool, database_url };
        db.cleanup().await.expect("clean test database");
        Some(db)
    }

    /// Remove every row from the quiz tables
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            TRUNCATE answer_records, quiz_question_assignments, quizzes, questions,
                question_topics, users
            RESTART IDENTITY CASCADE
            "#
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }
}
