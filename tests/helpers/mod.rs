//! Test helpers module
//!
//! Shared setup for the integration tests: logging, seeded in-memory
//! classrooms, and an optional PostgreSQL database.

#![allow(dead_code)]

pub mod database_helper;
pub mod simple_test;
pub mod test_data;

pub use database_helper::*;
pub use simple_test::*;
pub use test_data::*;
