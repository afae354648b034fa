//! Storage layer
//!
//! SQLite schema management and typed storage errors. All user data
//! (users, categories, review offsets, vocabulary items) lives in a
//! single SQLite database under the configured data directory.

pub mod error;
pub mod schema;

pub use error::{StoreError, StoreResult};
pub use schema::{get_schema_version, init_schema, needs_init, SCHEMA_VERSION};
