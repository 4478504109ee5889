//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct, the SQLite-backed
//! [`MatchStore`]. Methods are organized across submodules:
//! - `fights.rs` - fight rows and fight results
//! - `rounds.rs` - rounds with their ledgers and replay records

mod fights;
mod rounds;

use super::store::{MatchStore, StoreError};
use crate::domain::{Fight, FightId, Round, Seconds};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

#[async_trait]
impl MatchStore for Repository {
    async fn save_fight(&self, fight: &Fight) -> Result<(), StoreError> {
        self.upsert_fight(fight).await
    }

    async fn load_fight(&self, id: FightId) -> Result<Option<Fight>, StoreError> {
        self.query_fight(id).await
    }

    async fn save_round(&self, round: &Round) -> Result<(), StoreError> {
        self.upsert_round(round).await
    }

    async fn load_rounds(&self, fight_id: FightId) -> Result<Vec<Round>, StoreError> {
        self.query_rounds(fight_id).await
    }

    async fn last_round_end_time(&self, fight_id: FightId) -> Result<Option<Seconds>, StoreError> {
        self.query_last_round_end_time(fight_id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Store a unit-like serde enum as its wire name.
fn enum_to_sql<T: Serialize>(value: &T) -> Result<String, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(StoreError::Corrupt(format!(
            "expected a string-named variant, got {}",
            other
        ))),
    }
}

fn enum_from_sql<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| StoreError::Corrupt(format!("{}: {:?} ({})", column, raw, e)))
}

fn opt_enum_to_sql<T: Serialize>(value: Option<&T>) -> Result<Option<String>, StoreError> {
    value.map(enum_to_sql).transpose()
}

fn opt_enum_from_sql<T: DeserializeOwned>(
    column: &str,
    raw: Option<String>,
) -> Result<Option<T>, StoreError> {
    raw.map(|s| enum_from_sql(column, &s)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Technique, VictoryDecision};

    #[test]
    fn test_enum_sql_names() {
        assert_eq!(enum_to_sql(&Technique::HeadKick).unwrap(), "head_kick");
        assert_eq!(
            enum_from_sql::<VictoryDecision>("victory_decision", "pointGap").unwrap(),
            VictoryDecision::PointGap
        );
        assert!(matches!(
            enum_from_sql::<Technique>("technique", "roundhouse"),
            Err(StoreError::Corrupt(_))
        ));
    }
}
