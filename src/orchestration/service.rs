//! Async match flows: resolve operator prompts, mutate the session, persist.

use crate::db::{MatchStore, StoreError};
use crate::domain::{
    Action, ActionDraft, ActionId, Fight, FightId, FighterColor, FighterId, Round, Seconds,
    VictoryDecision, VideoReplay,
};
use crate::engine::{DeactivateOutcome, ScoreBoard};
use crate::operator::{answer_of, OperatorInput, PromptDefaults};
use crate::session::{MatchSession, RoundConclusion, RoundEndInputs, SessionError};
use crate::video::VideoClock;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Fight {0} not found")]
    FightNotFound(FightId),
}

/// Read-only view of a fight for clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FightSnapshot {
    pub fight: Fight,
    pub rounds: Vec<Round>,
    pub current_round: Option<u32>,
    pub live_score: Option<ScoreBoard>,
}

#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn MatchStore>,
    sessions: Arc<Mutex<HashMap<FightId, MatchSession>>>,
    defaults: PromptDefaults,
    retry_max_elapsed: Duration,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>, defaults: PromptDefaults, retry_max_elapsed: Duration) -> Self {
        Self {
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            defaults,
            retry_max_elapsed,
        }
    }

    pub async fn create_fight(&self, blue: FighterId, red: FighterId) -> Result<Fight, ServiceError> {
        let fight = Fight::new(blue, red);
        self.persist(&fight, &[]).await?;
        info!(
            fight_id = %fight.id,
            blue = %fight.blue_fighter_id.as_str(),
            red = %fight.red_fighter_id.as_str(),
            "Fight created"
        );
        self.sessions
            .lock()
            .await
            .insert(fight.id, MatchSession::new(fight.clone()));
        Ok(fight)
    }

    /// Open the next round.
    ///
    /// The duration is prompted; without an explicit `start_time` the round
    /// starts where the previous one ended.
    pub async fn start_round(
        &self,
        id: FightId,
        operator: &dyn OperatorInput,
        start_time: Option<Seconds>,
    ) -> Result<Round, ServiceError> {
        let round_number = self
            .with_session(id, |s| {
                s.ensure_can_start_round()?;
                Ok(s.next_round_number())
            })
            .await?;

        let secs = answer_of("round_duration", operator.round_duration(round_number).await)
            .unwrap_or(self.defaults.round_secs);
        let start_time = match start_time {
            Some(t) => t,
            None => match self.with_session(id, |s| Ok(s.last_end_time())).await? {
                Some(t) => t,
                None => self
                    .store
                    .last_round_end_time(id)
                    .await?
                    .unwrap_or(Seconds::ZERO),
            },
        };

        let round = self
            .with_session(id, |s| Ok(s.start_round(secs, start_time)?.clone()))
            .await?;
        self.sync(id).await?;
        Ok(round)
    }

    pub async fn record_action(
        &self,
        id: FightId,
        draft: ActionDraft,
        clock: &dyn VideoClock,
    ) -> Result<(Action, ScoreBoard), ServiceError> {
        let now = clock.current_position();
        self.with_session(id, |s| {
            let action = s.record_action(draft, now)?.clone();
            Ok((action, s.live_score()?))
        })
        .await
    }

    pub async fn undo_last(&self, id: FightId) -> Result<DeactivateOutcome, ServiceError> {
        self.with_session(id, |s| s.undo_last()).await
    }

    pub async fn delete_action(&self, id: FightId, action_id: ActionId) -> Result<DeactivateOutcome, ServiceError> {
        self.with_session(id, |s| s.delete_action(action_id)).await
    }

    pub async fn undo_penalty(&self, id: FightId, color: FighterColor) -> Result<DeactivateOutcome, ServiceError> {
        self.with_session(id, |s| s.undo_penalty(color)).await
    }

    /// Prompt for a stoppage and exclude it from the match clock.
    pub async fn pause(&self, id: FightId, operator: &dyn OperatorInput) -> Result<Seconds, ServiceError> {
        let round_number = self
            .with_session(id, |s| Ok(s.current_round()?.round_number))
            .await?;
        let pause = answer_of("pause_duration", operator.pause_duration(round_number).await)
            .unwrap_or(self.defaults.pause);
        self.with_session(id, |s| s.add_pause(pause)).await
    }

    /// Check that the store answers.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn live_score(&self, id: FightId) -> Result<ScoreBoard, ServiceError> {
        self.with_session(id, |s| s.live_score()).await
    }

    /// Close the current round.
    ///
    /// The round's ledger is frozen while the prompts are pending; reads
    /// still go through.
    pub async fn end_round(
        &self,
        id: FightId,
        operator: &dyn OperatorInput,
        clock: &dyn VideoClock,
    ) -> Result<RoundConclusion, ServiceError> {
        let now = clock.current_position();
        let (round_number, expired) = self.with_session(id, |s| s.begin_ending(now)).await?;

        let conclusion = match self
            .conclude_with_prompts(id, operator, now, round_number, expired)
            .await
        {
            Ok(conclusion) => conclusion,
            Err(e) => {
                if let Err(reopen) = self
                    .with_session(id, |s| {
                        s.abandon_ending();
                        Ok(())
                    })
                    .await
                {
                    warn!(fight_id = %id, error = %reopen, "Could not reopen round");
                }
                return Err(e);
            }
        };
        self.sync(id).await?;
        Ok(conclusion)
    }

    async fn conclude_with_prompts(
        &self,
        id: FightId,
        operator: &dyn OperatorInput,
        now: Seconds,
        round_number: u32,
        expired: bool,
    ) -> Result<RoundConclusion, ServiceError> {
        let ended_by_time_expiration = expired
            || answer_of("ended_by_time", operator.ended_by_time(round_number).await)
                .unwrap_or(false);
        let hits = answer_of("hit_counts", operator.hit_counts(round_number).await);

        let needs_referee = self
            .with_session(id, |s| {
                if let Some(hits) = hits {
                    s.set_hit_counts(hits)?;
                }
                Ok(s.preview_decision(ended_by_time_expiration)?.needs_referee())
            })
            .await?;

        let referee_winner = if needs_referee {
            let answer = answer_of("referee_winner", operator.referee_winner(round_number).await);
            Some(answer.unwrap_or(self.defaults.referee_winner))
        } else {
            None
        };

        self.with_session(id, |s| {
            s.conclude_round(
                RoundEndInputs {
                    ended_by_time_expiration,
                    hits,
                    referee_winner,
                },
                now,
            )
        })
        .await
    }

    /// Ask the operator to rule on a challenge from `color`.
    ///
    /// Returns `None` when the prompt is dismissed: the request is withdrawn
    /// and the challenge stays available.
    pub async fn request_video_replay(
        &self,
        id: FightId,
        color: FighterColor,
        operator: &dyn OperatorInput,
        clock: &dyn VideoClock,
    ) -> Result<Option<VideoReplay>, ServiceError> {
        self.with_session(id, |s| s.ensure_replay_available(color))
            .await?;

        let Some(accepted) = answer_of(
            "video_replay_outcome",
            operator.video_replay_outcome(color).await,
        ) else {
            info!(fight_id = %id, color = %color, "Video replay withdrawn");
            return Ok(None);
        };

        let now = clock.current_position();
        let replay = self
            .with_session(id, |s| s.resolve_video_replay(color, accepted, now))
            .await?;
        self.sync(id).await?;
        Ok(Some(replay))
    }

    pub async fn redecide_round(
        &self,
        id: FightId,
        round_number: u32,
        winner: Option<FighterColor>,
        decision: VictoryDecision,
    ) -> Result<RoundConclusion, ServiceError> {
        let conclusion = self
            .with_session(id, |s| s.redecide_round(round_number, winner, decision))
            .await?;
        self.sync(id).await?;
        Ok(conclusion)
    }

    pub async fn snapshot(&self, id: FightId) -> Result<FightSnapshot, ServiceError> {
        self.with_session(id, |s| {
            let current = s.current_round().ok();
            Ok(FightSnapshot {
                fight: s.fight().clone(),
                rounds: s.rounds().to_vec(),
                current_round: current.map(|r| r.round_number),
                live_score: current.map(|r| ScoreBoard::tally(r.actions.entries())),
            })
        })
        .await
    }

    /// Persist the fight and every unsynced round.
    ///
    /// Returns the rounds now marked synced. A round changed while its write
    /// was in flight stays dirty for the next sync.
    pub async fn sync(&self, id: FightId) -> Result<Vec<u32>, ServiceError> {
        let (fight, dirty) = self
            .with_session(id, |s| {
                let dirty: Vec<Round> = s.rounds().iter().filter(|r| !r.is_synced).cloned().collect();
                Ok((s.fight().clone(), dirty))
            })
            .await?;

        self.persist(&fight, &dirty).await?;

        self.with_session(id, |s| {
            let synced: Vec<u32> = dirty
                .iter()
                .filter(|r| s.mark_synced(r.round_number, r.revision))
                .map(|r| r.round_number)
                .collect();
            if synced.len() < dirty.len() {
                info!(fight_id = %id, "Round changed during save, left dirty");
            }
            Ok(synced)
        })
        .await
    }

    async fn with_session<T>(
        &self,
        id: FightId,
        f: impl FnOnce(&mut MatchSession) -> Result<T, SessionError>,
    ) -> Result<T, ServiceError> {
        self.ensure_loaded(id).await?;
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(ServiceError::FightNotFound(id))?;
        Ok(f(session)?)
    }

    /// Bring a stored fight into memory if it is not there yet.
    async fn ensure_loaded(&self, id: FightId) -> Result<(), ServiceError> {
        if self.sessions.lock().await.contains_key(&id) {
            return Ok(());
        }

        let fight = self
            .store
            .load_fight(id)
            .await?
            .ok_or(ServiceError::FightNotFound(id))?;
        let rounds = self.store.load_rounds(id).await?;
        info!(fight_id = %id, rounds = rounds.len(), "Fight restored from store");

        self.sessions
            .lock()
            .await
            .entry(id)
            .or_insert_with(|| MatchSession::restore(fight, rounds));
        Ok(())
    }

    async fn persist(&self, fight: &Fight, rounds: &[Round]) -> Result<(), StoreError> {
        let store = &self.store;
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.retry_max_elapsed),
            ..Default::default()
        };

        retry(backoff, || async {
            store.save_fight(fight).await.map_err(classify)?;
            for round in rounds {
                store.save_round(round).await.map_err(classify)?;
            }
            Ok(())
        })
        .await
    }
}

fn classify(e: StoreError) -> backoff::Error<StoreError> {
    if e.is_transient() {
        warn!(error = %e, "Store write failed, retrying");
        backoff::Error::transient(e)
    } else {
        backoff::Error::permanent(e)
    }
}
