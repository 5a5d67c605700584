//! Database module
//!
//! Repository contracts and their PostgreSQL and in-memory backends

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, health_check};
pub use memory::MemoryStore;
pub use repositories::{UserRepository, QuestionRepository, AnswerRepository};
pub use service::DatabaseService;
pub use store::{QuestionStore, AnswerHistory};
