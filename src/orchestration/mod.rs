//! Orchestration layer: async match flows over sessions, operator prompts and
//! the store.

pub mod service;

pub use service::{FightSnapshot, MatchService, ServiceError};
