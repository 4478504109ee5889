//! Operator with answers fixed up front.
//!
//! Used by the HTTP layer, where answers arrive in the request body, and by
//! tests. An unset answer is a dismissed prompt.

use super::{HitCounts, OperatorError, OperatorInput, Prompt};
use crate::domain::{FighterColor, Seconds};
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    round_secs: Option<u32>,
    hits: Option<HitCounts>,
    pause: Option<Seconds>,
    referee_winner: Option<FighterColor>,
    ended_by_time: Option<bool>,
    replay_accepted: Option<bool>,
    disconnected: bool,
}

impl ScriptedOperator {
    /// Create an operator that dismisses every prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator whose channel is broken: every prompt errors.
    pub fn disconnected() -> Self {
        Self {
            disconnected: true,
            ..Self::default()
        }
    }

    pub fn with_round_secs(mut self, secs: u32) -> Self {
        self.round_secs = Some(secs);
        self
    }

    pub fn with_hits(mut self, blue: u32, red: u32) -> Self {
        self.hits = Some(HitCounts { blue, red });
        self
    }

    pub fn with_pause(mut self, pause: Seconds) -> Self {
        self.pause = Some(pause);
        self
    }

    pub fn with_referee_winner(mut self, color: FighterColor) -> Self {
        self.referee_winner = Some(color);
        self
    }

    pub fn with_ended_by_time(mut self, ended_by_time: bool) -> Self {
        self.ended_by_time = Some(ended_by_time);
        self
    }

    pub fn with_replay_accepted(mut self, accepted: bool) -> Self {
        self.replay_accepted = Some(accepted);
        self
    }

    fn reply<T: Copy>(&self, value: Option<T>) -> Result<Prompt<T>, OperatorError> {
        if self.disconnected {
            return Err(OperatorError::Disconnected);
        }
        Ok(Prompt::from_option(value))
    }
}

#[async_trait]
impl OperatorInput for ScriptedOperator {
    async fn round_duration(&self, _round_number: u32) -> Result<Prompt<u32>, OperatorError> {
        self.reply(self.round_secs)
    }

    async fn hit_counts(&self, _round_number: u32) -> Result<Prompt<HitCounts>, OperatorError> {
        self.reply(self.hits)
    }

    async fn pause_duration(&self, _round_number: u32) -> Result<Prompt<Seconds>, OperatorError> {
        self.reply(self.pause)
    }

    async fn referee_winner(&self, _round_number: u32) -> Result<Prompt<FighterColor>, OperatorError> {
        self.reply(self.referee_winner)
    }

    async fn ended_by_time(&self, _round_number: u32) -> Result<Prompt<bool>, OperatorError> {
        self.reply(self.ended_by_time)
    }

    async fn video_replay_outcome(
        &self,
        _requested_by: FighterColor,
    ) -> Result<Prompt<bool>, OperatorError> {
        self.reply(self.replay_accepted)
    }
}
