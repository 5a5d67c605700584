//! Session context management
//!
//! Each connected user carries an explicit `SessionContext` into every service
//! call. Nothing about the current user is stored process-wide.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::user::{Role, User};
use crate::utils::errors::{AdaptiveQuizError, Result};

/// Per-user session context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// User ID this session belongs to
    pub user_id: i64,
    pub role: Role,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Create a new session for a user
    pub fn new(user_id: i64, role: Role) -> Self {
        Self {
            user_id,
            role,
            started_at: Utc::now(),
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.role)
    }

    pub fn student(user_id: i64) -> Self {
        Self::new(user_id, Role::Student)
    }

    pub fn teacher(user_id: i64) -> Self {
        Self::new(user_id, Role::Teacher)
    }

    /// Fail with `PermissionDenied` unless the session has `required` role
    pub fn require_role(&self, required: Role, action: &str) -> Result<()> {
        let allowed = match (self.role, required) {
            (Role::Student, Role::Student) => true,
            (Role::Teacher, Role::Teacher) => true,
            (Role::Student, Role::Teacher) | (Role::Teacher, Role::Student) => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(AdaptiveQuizError::PermissionDenied(format!(
                "Only {}s can {}",
                required, action
            )))
        }
    }

    /// Session summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{}#{} since {}",
            self.role,
            self.user_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
