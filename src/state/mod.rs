//! State management module
//!
//! This module handles per-user session context and submission locking

pub mod context;
pub mod locks;

// Re-export commonly used state components
pub use context::SessionContext;
pub use locks::QuizLockRegistry;
