//! Quiz model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub class_id: i64,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    pub title: String,
    pub class_id: i64,
    pub teacher_id: i64,
}
