//! Technique catalog: point values and categories.

use serde::{Deserialize, Serialize};

/// Broad family of a scoring technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechniqueCategory {
    Kick,
    Punch,
}

/// A scoring technique with a fixed point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Punch,
    CutKick,
    BandalChagi,
    ApChagi,
    DollyoChagi,
    DwitChagi,
    HookKick,
    JumpBackKick,
    SpinningBodyKick,
    HeadKick,
    NaeryeoChagi,
    SpinningHeadKick,
}

/// Points credited to the opponent for each penalty (gamjeon).
pub const PENALTY_POINTS: u32 = 1;

/// Techniques worth at least this many points count as high-value in the
/// superiority cascade.
pub const HIGH_VALUE_THRESHOLD: u32 = 3;

impl Technique {
    pub const ALL: [Technique; 12] = [
        Technique::Punch,
        Technique::CutKick,
        Technique::BandalChagi,
        Technique::ApChagi,
        Technique::DollyoChagi,
        Technique::DwitChagi,
        Technique::HookKick,
        Technique::JumpBackKick,
        Technique::SpinningBodyKick,
        Technique::HeadKick,
        Technique::NaeryeoChagi,
        Technique::SpinningHeadKick,
    ];

    pub fn points(&self) -> u32 {
        match self {
            Technique::Punch => 1,
            Technique::CutKick | Technique::BandalChagi | Technique::ApChagi => 2,
            Technique::DollyoChagi | Technique::DwitChagi | Technique::HookKick => 3,
            Technique::JumpBackKick | Technique::SpinningBodyKick => 4,
            Technique::HeadKick | Technique::NaeryeoChagi | Technique::SpinningHeadKick => 5,
        }
    }

    pub fn category(&self) -> TechniqueCategory {
        match self {
            Technique::Punch => TechniqueCategory::Punch,
            _ => TechniqueCategory::Kick,
        }
    }

    /// The spin family counted first in the superiority cascade.
    pub fn is_spinning(&self) -> bool {
        matches!(self, Technique::SpinningBodyKick | Technique::SpinningHeadKick)
    }

    /// Head techniques that end a round by knockout when they are the last
    /// recorded action.
    pub fn is_head_knockout(&self) -> bool {
        matches!(
            self,
            Technique::HeadKick | Technique::NaeryeoChagi | Technique::SpinningHeadKick
        )
    }

    pub fn is_high_value(&self) -> bool {
        self.points() >= HIGH_VALUE_THRESHOLD
    }

}
