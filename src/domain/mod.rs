//! Domain types for live taekwondo scoring.
//!
//! This module provides:
//! - Domain primitives: FighterColor, FighterId, FightId, ActionId, Seconds
//! - The technique catalog (point values, spin family, head knockout set)
//! - Action, Round, Fight and VideoReplay records
//! - Round decision categories

pub mod action;
pub mod decision;
pub mod fight;
pub mod primitives;
pub mod round;
pub mod technique;
pub mod video_replay;

pub use action::{
    Action, ActionDraft, ActionType, InvalidActionShape, Limb, PenaltyType, Situation, Zone,
};
pub use decision::VictoryDecision;
pub use fight::{Fight, FightMethod, FightResult, MAX_ROUNDS, ROUNDS_TO_WIN};
pub use primitives::{ActionId, ColorParseError, FightId, FighterColor, FighterId, Seconds};
pub use round::{Round, ALLOWED_ROUND_SECS};
pub use technique::{Technique, TechniqueCategory, HIGH_VALUE_THRESHOLD, PENALTY_POINTS};
pub use video_replay::VideoReplay;
