//! ebb core library
//!
//! This crate provides the core functionality for ebb, a spaced-repetition
//! vocabulary trainer built around the Ebbinghaus forgetting-curve
//! intervals.
//!
//! # Architecture
//!
//! - **SQLite**: all user data (users, categories, items, review offsets)
//! - **Review matcher**: pure date-offset matching that decides which items
//!   are due on a given day
//! - **Definition merger**: line-level fuzzy deduplication of dictionary
//!   definitions
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//! let user = store.register_user("aran")?;
//!
//! // Add an item
//! let item = VocabItem::new(user.id, "serendipity", category.id, today);
//! store.add_item(&item)?;
//!
//! // What is due today?
//! let board = store.due_items(user.id, today)?;
//! ```
//!
//! # Modules
//!
//! - `store`: unified storage interface (main entry point)
//! - `models`: data structures for users, categories, and vocabulary items
//! - `review`: forgetting-curve due-item matching
//! - `merge`: definition text merging with similarity-based deduplication
//! - `storage`: SQLite schema and typed errors
//! - `config`: application configuration

pub mod config;
pub mod merge;
pub mod models;
pub mod review;
pub mod storage;
pub mod store;

pub use config::{Config, DictionaryConfig};
pub use merge::{merge_definitions, merge_definitions_with_threshold, DEFAULT_SIMILARITY_THRESHOLD};
pub use models::{Category, Proficiency, Translation, User, VocabItem, DEFAULT_REVIEW_OFFSETS};
pub use review::{match_due_items, CategoryReview, DueEntry};
pub use storage::{StoreError, StoreResult};
pub use store::Store;
