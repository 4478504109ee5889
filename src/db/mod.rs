//! Persistence for fights and rounds.
//!
//! This module provides:
//! - The `MatchStore` contract the scoring core persists through
//! - SQLite initialization and schema setup
//! - `Repository`, the SQLite-backed store
//! - `InMemoryStore` for tests and ephemeral runs

pub mod memory;
pub mod migrations;
pub mod repo;
pub mod store;

pub use memory::InMemoryStore;
pub use migrations::init_db;
pub use repo::Repository;
pub use store::{MatchStore, StoreError};
