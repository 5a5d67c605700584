//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::{User, Role, CreateUserRequest};
use crate::utils::errors::AdaptiveQuizError;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AdaptiveQuizError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (role, first_name, last_name, school_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, role, first_name, last_name, school_id, created_at
            "#
        )
        .bind(request.role)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.school_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AdaptiveQuizError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, role, first_name, last_name, school_id, created_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check that a user exists with the given role
    pub async fn has_role(&self, id: i64, role: Role) -> Result<bool, AdaptiveQuizError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)"
        )
        .bind(id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// List users of a school with a given role
    pub async fn list_by_school(
        &self,
        school_id: i64,
        role: Role,
    ) -> Result<Vec<User>, AdaptiveQuizError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, role, first_name, last_name, school_id, created_at
            FROM users
            WHERE school_id = $1 AND role = $2
            ORDER BY id ASC
            "#
        )
        .bind(school_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
