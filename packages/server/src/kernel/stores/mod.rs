//! Storage backends for extraction runs.
//!
//! - [`PostgresExtractedDataStore`]: production store (sqlx + PostgreSQL)
//! - [`MemoryExtractedDataStore`]: in-process store for tests and local runs

mod memory;
mod postgres;

pub use memory::MemoryExtractedDataStore;
pub use postgres::{run_migrations, PostgresExtractedDataStore};
