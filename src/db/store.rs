//! Persistence collaborator contract.

use crate::domain::{Fight, FightId, Round, Seconds};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    #[error("Fight {0} not found")]
    FightNotFound(FightId),
}

impl StoreError {
    /// Whether retrying the same call can succeed.
    ///
    /// Database errors count only when SQLite reports the file busy or a
    /// table locked; constraint violations fail at once.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Db(sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut) => true,
            StoreError::Db(sqlx::Error::Database(db)) => db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
                .unwrap_or(false),
            _ => false,
        }
    }
}

// Primary result codes; extended codes carry them in the low byte.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Storage for fights and rounds.
///
/// Rounds are saved whole: the round row together with its full ledger
/// (inactive entries included) and replay records.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn save_fight(&self, fight: &Fight) -> Result<(), StoreError>;

    async fn load_fight(&self, id: FightId) -> Result<Option<Fight>, StoreError>;

    async fn save_round(&self, round: &Round) -> Result<(), StoreError>;

    /// Rounds of a fight ordered by round number.
    async fn load_rounds(&self, fight_id: FightId) -> Result<Vec<Round>, StoreError>;

    /// End time of the latest ended round, used to seed the next round's
    /// start offset.
    async fn last_round_end_time(&self, fight_id: FightId) -> Result<Option<Seconds>, StoreError>;

    /// Cheap liveness check used by `/ready`.
    async fn ping(&self) -> Result<(), StoreError>;
}
