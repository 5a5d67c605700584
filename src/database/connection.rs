//! Database connection management

use std::time::{Duration, Instant};

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use crate::config::settings;
use crate::utils::errors::AdaptiveQuizError;

pub type DatabasePool = Pool<Postgres>;

/// Tables the repositories read and write
pub const QUIZ_TABLES: [&str; 6] = [
    "users",
    "question_topics",
    "questions",
    "quizzes",
    "quiz_question_assignments",
    "answer_records",
];

/// Pool settings resolved from `settings::DatabaseConfig`
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&settings::Settings::default().database)
    }
}

impl From<&settings::DatabaseConfig> for DatabaseConfig {
    fn from(config: &settings::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_seconds),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Open a pool and make sure the quiz schema is present
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, AdaptiveQuizError> {
    let started = Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    info!(
        max_connections = config.max_connections,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Database connection pool created"
    );
    Ok(pool)
}

/// Fails with `Repository` when the database is reachable but a quiz table is missing
pub async fn health_check(pool: &DatabasePool) -> Result<(), AdaptiveQuizError> {
    let tables: Vec<String> = QUIZ_TABLES.iter().map(|t| t.to_string()).collect();
    let (present,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM information_schema.tables
        WHERE table_schema = current_schema() AND table_name::text = ANY($1)
        "#
    )
    .bind(&tables)
    .fetch_one(pool)
    .await?;

    if present as usize != QUIZ_TABLES.len() {
        warn!(present = present, expected = QUIZ_TABLES.len(), "Quiz schema incomplete");
        return Err(AdaptiveQuizError::Repository(format!(
            "Quiz schema incomplete: {} of {} tables present",
            present,
            QUIZ_TABLES.len()
        )));
    }

    Ok(())
}
