//! Round: one timed segment of a fight and its action ledger.

use crate::domain::{FightId, FighterColor, FighterId, Seconds, VictoryDecision, VideoReplay};
use crate::engine::{score, ActionLedger};
use serde::{Deserialize, Serialize};

/// Round durations an operator can pick, in seconds.
pub const ALLOWED_ROUND_SECS: [u32; 3] = [60, 90, 120];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub fight_id: FightId,
    /// 1-based, sequential within a fight.
    pub round_number: u32,
    pub round_time_limit: Seconds,
    pub actions: ActionLedger,
    /// Manually entered strike counts, used only as a tie-break.
    pub blue_hits: u32,
    pub red_hits: u32,
    pub victory_decision: Option<VictoryDecision>,
    /// `None` while undecided or pending referee input.
    pub round_winner_fighter_id: Option<FighterId>,
    /// Video-clock anchor where the round starts.
    pub start_time: Seconds,
    /// Video-clock anchor where the round ended, once ended.
    pub end_time: Option<Seconds>,
    /// Sum of operator-entered pauses, excluded from the match clock.
    pub paused_secs: Seconds,
    #[serde(default)]
    pub video_replays: Vec<VideoReplay>,
    #[serde(default)]
    pub is_synced: bool,
    /// Bumped on every in-memory change; a save only clears `is_synced` when
    /// the revision it wrote is still current.
    #[serde(skip)]
    pub revision: u64,
}

impl Round {
    pub fn new(fight_id: FightId, round_number: u32, time_limit: Seconds, start_time: Seconds) -> Self {
        Self {
            fight_id,
            round_number,
            round_time_limit: time_limit,
            actions: ActionLedger::new(),
            blue_hits: 0,
            red_hits: 0,
            victory_decision: None,
            round_winner_fighter_id: None,
            start_time,
            end_time: None,
            paused_secs: Seconds::ZERO,
            video_replays: Vec::new(),
            is_synced: false,
            revision: 0,
        }
    }

    /// Record an unsaved change.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.is_synced = false;
    }

    pub fn is_finished(&self) -> bool {
        self.victory_decision.is_some()
    }

    pub fn score(&self, color: FighterColor) -> u32 {
        score::compute_score(self.actions.entries(), color)
    }

    pub fn blue_score(&self) -> u32 {
        self.score(FighterColor::Blue)
    }

    pub fn red_score(&self) -> u32 {
        self.score(FighterColor::Red)
    }

    /// Active penalties charged to `color`.
    pub fn gamjeon(&self, color: FighterColor) -> u32 {
        score::count_penalties(self.actions.entries(), color)
    }

    pub fn blue_gamjeon(&self) -> u32 {
        self.gamjeon(FighterColor::Blue)
    }

    pub fn red_gamjeon(&self) -> u32 {
        self.gamjeon(FighterColor::Red)
    }
}
