//! Database service layer
//!
//! Bundles the PostgreSQL repositories built from one pool

use crate::config::Settings;
use crate::database::{
    create_pool, AnswerRepository, DatabaseConfig, DatabasePool, QuestionRepository, UserRepository,
};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub questions: QuestionRepository,
    pub answers: AnswerRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            questions: QuestionRepository::new(pool.clone()),
            answers: AnswerRepository::new(pool),
        }
    }

    /// Open a pool from settings and build the repositories on it
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
        Ok(Self::new(pool))
    }
}
