//! Fight: a best-of-3-rounds contest between two fighters.

use crate::domain::{FightId, FighterColor, FighterId, VictoryDecision};
use serde::{Deserialize, Serialize};

/// Rounds in a full fight.
pub const MAX_ROUNDS: u32 = 3;

/// Round wins that decide a fight.
pub const ROUNDS_TO_WIN: u32 = 2;

/// How the fight was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightMethod {
    /// A direct-victory round ended the fight.
    Direct(VictoryDecision),
    /// A fighter reached the required round wins.
    Majority,
    /// Resolved after the last round without a majority.
    Decision,
}

impl FightMethod {
    pub fn name(&self) -> &'static str {
        match self {
            FightMethod::Direct(decision) => decision.display_name(),
            FightMethod::Majority => "Majority",
            FightMethod::Decision => "Decision",
        }
    }
}

impl Serialize for FightMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FightMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        match name.as_str() {
            "Majority" => return Ok(FightMethod::Majority),
            "Decision" => return Ok(FightMethod::Decision),
            _ => {}
        }
        [
            VictoryDecision::Knockout,
            VictoryDecision::TechnicalKnockout,
            VictoryDecision::Disqualification,
        ]
        .into_iter()
        .find(|d| d.display_name() == name)
        .map(FightMethod::Direct)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown fight method: {name}")))
    }
}

/// Final outcome of a fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightResult {
    /// `None` only when the last round leaves rounds and score level.
    pub winner_fighter_id: Option<FighterId>,
    pub method: FightMethod,
    pub blue_total_score: u32,
    pub red_total_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fight {
    pub id: FightId,
    pub blue_fighter_id: FighterId,
    pub red_fighter_id: FighterId,
    /// Round numbers recorded so far, in order.
    pub round_ids: Vec<u32>,
    pub fight_result: Option<FightResult>,
    pub blue_video_replay_used: bool,
    pub red_video_replay_used: bool,
}

impl Fight {
    pub fn new(blue_fighter_id: FighterId, red_fighter_id: FighterId) -> Self {
        Self {
            id: FightId::new(),
            blue_fighter_id,
            red_fighter_id,
            round_ids: Vec::new(),
            fight_result: None,
            blue_video_replay_used: false,
            red_video_replay_used: false,
        }
    }

    pub fn fighter_id(&self, color: FighterColor) -> &FighterId {
        match color {
            FighterColor::Blue => &self.blue_fighter_id,
            FighterColor::Red => &self.red_fighter_id,
        }
    }

    pub fn color_of(&self, fighter_id: &FighterId) -> Option<FighterColor> {
        if fighter_id == &self.blue_fighter_id {
            Some(FighterColor::Blue)
        } else if fighter_id == &self.red_fighter_id {
            Some(FighterColor::Red)
        } else {
            None
        }
    }

    pub fn is_decided(&self) -> bool {
        self.fight_result.is_some()
    }

    pub fn video_replay_used(&self, color: FighterColor) -> bool {
        match color {
            FighterColor::Blue => self.blue_video_replay_used,
            FighterColor::Red => self.red_video_replay_used,
        }
    }

    pub fn mark_video_replay_used(&mut self, color: FighterColor) {
        match color {
            FighterColor::Blue => self.blue_video_replay_used = true,
            FighterColor::Red => self.red_video_replay_used = true,
        }
    }
}
