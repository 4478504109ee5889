//! In-memory store for tests and ephemeral runs.

use super::store::{MatchStore, StoreError};
use crate::domain::{Fight, FightId, Round, Seconds};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    fights: RwLock<HashMap<FightId, Fight>>,
    rounds: RwLock<HashMap<(FightId, u32), Round>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn save_fight(&self, fight: &Fight) -> Result<(), StoreError> {
        self.fights.write().await.insert(fight.id, fight.clone());
        Ok(())
    }

    async fn load_fight(&self, id: FightId) -> Result<Option<Fight>, StoreError> {
        Ok(self.fights.read().await.get(&id).cloned())
    }

    async fn save_round(&self, round: &Round) -> Result<(), StoreError> {
        if !self.fights.read().await.contains_key(&round.fight_id) {
            return Err(StoreError::FightNotFound(round.fight_id));
        }
        let mut stored = round.clone();
        stored.is_synced = true;
        self.rounds
            .write()
            .await
            .insert((round.fight_id, round.round_number), stored);
        Ok(())
    }

    async fn load_rounds(&self, fight_id: FightId) -> Result<Vec<Round>, StoreError> {
        let mut rounds: Vec<Round> = self
            .rounds
            .read()
            .await
            .values()
            .filter(|r| r.fight_id == fight_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }

    async fn last_round_end_time(&self, fight_id: FightId) -> Result<Option<Seconds>, StoreError> {
        Ok(self
            .load_rounds(fight_id)
            .await?
            .iter()
            .rev()
            .find_map(|r| r.end_time))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
