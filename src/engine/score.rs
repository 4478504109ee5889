//! Score aggregation over the active subset of a ledger.
//!
//! Every function here is order-independent: it depends only on the set of
//! active actions, never on their chronology.

use crate::domain::{Action, ActionType, FighterColor, Technique};
use serde::Serialize;

/// Points for `color`: its own kick/punch points plus one per active
/// opponent penalty.
pub fn compute_score(actions: &[Action], color: FighterColor) -> u32 {
    let direct: u32 = actions
        .iter()
        .filter(|a| a.active && a.fighter_color == color && a.action_type.is_strike())
        .map(|a| a.points())
        .sum();
    let penalty_credit = count_penalties(actions, color.opponent());
    direct + penalty_credit
}

/// Active penalties charged to `color` itself.
pub fn count_penalties(actions: &[Action], color: FighterColor) -> u32 {
    count_active(actions, color, |a| a.action_type == ActionType::Penalty)
}

/// Active kicks/punches by `color` whose technique satisfies `pred`.
pub fn count_techniques<F>(actions: &[Action], color: FighterColor, pred: F) -> u32
where
    F: Fn(Technique) -> bool,
{
    count_active(actions, color, |a| a.strike_technique().is_some_and(&pred))
}

fn count_active<F>(actions: &[Action], color: FighterColor, pred: F) -> u32
where
    F: Fn(&Action) -> bool,
{
    actions
        .iter()
        .filter(|a| a.active && a.fighter_color == color && pred(a))
        .count() as u32
}

/// Live totals for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub blue_score: u32,
    pub red_score: u32,
    pub blue_gamjeon: u32,
    pub red_gamjeon: u32,
}

impl ScoreBoard {
    pub fn tally(actions: &[Action]) -> Self {
        Self {
            blue_score: compute_score(actions, FighterColor::Blue),
            red_score: compute_score(actions, FighterColor::Red),
            blue_gamjeon: count_penalties(actions, FighterColor::Blue),
            red_gamjeon: count_penalties(actions, FighterColor::Red),
        }
    }

    pub fn gamjeon(&self, color: FighterColor) -> u32 {
        match color {
            FighterColor::Blue => self.blue_gamjeon,
            FighterColor::Red => self.red_gamjeon,
        }
    }
}
