//! Round decision engine.
//!
//! Rules are evaluated in strict priority order and the first match wins:
//!
//! 1. Last recorded action is a head-knockout technique -> knockout.
//! 2. Score gap of [`POINT_GAP`] or more -> point gap.
//! 3. [`PENALTY_LIMIT`] or more penalties -> punitive declaration for the
//!    other fighter.
//! 4. Round ended by time: higher score -> final score; level scores go to
//!    the superiority cascade.
//! 5. Anything else is a referee decision.
//!
//! The engine never fails. When the rules cannot pick a winner it returns
//! `(None, Referee)` and an operator supplies the call.

use crate::domain::{Action, FighterColor, VictoryDecision};
use crate::engine::score::{self, ScoreBoard};
use serde::Serialize;
use std::cmp::Ordering;

/// Score difference that ends a round.
pub const POINT_GAP: u32 = 12;

/// Penalty count that forfeits a round.
pub const PENALTY_LIMIT: u32 = 5;

/// Everything the engine needs about a finished round.
#[derive(Debug, Clone, Copy)]
pub struct RoundDecisionInput<'a> {
    /// Full ledger, inactive entries included.
    pub actions: &'a [Action],
    pub blue_hits: u32,
    pub red_hits: u32,
    pub ended_by_time_expiration: bool,
}

/// Outcome of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDecision {
    pub winner: Option<FighterColor>,
    pub decision: VictoryDecision,
}

impl RoundDecision {
    fn won_by(color: FighterColor, decision: VictoryDecision) -> Self {
        Self {
            winner: Some(color),
            decision,
        }
    }

    fn referee() -> Self {
        Self {
            winner: None,
            decision: VictoryDecision::Referee,
        }
    }

    /// No automatic winner; the referee must rule.
    pub fn needs_referee(&self) -> bool {
        self.winner.is_none()
    }
}

/// Decide a round.
pub fn decide_round(input: &RoundDecisionInput<'_>) -> RoundDecision {
    if let Some(color) = knockout_color(input.actions) {
        return RoundDecision::won_by(color, VictoryDecision::Knockout);
    }

    let board = ScoreBoard::tally(input.actions);

    if board.blue_score.abs_diff(board.red_score) >= POINT_GAP {
        let leader = leader(board.blue_score.cmp(&board.red_score));
        if let Some(color) = leader {
            return RoundDecision::won_by(color, VictoryDecision::PointGap);
        }
    }

    for color in [FighterColor::Blue, FighterColor::Red] {
        if board.gamjeon(color) >= PENALTY_LIMIT {
            return RoundDecision::won_by(color.opponent(), VictoryDecision::PunitiveDeclaration);
        }
    }

    if !input.ended_by_time_expiration {
        return RoundDecision::referee();
    }

    if let Some(color) = leader(board.blue_score.cmp(&board.red_score)) {
        return RoundDecision::won_by(color, VictoryDecision::FinalScore);
    }

    match superiority(input) {
        Some(color) => RoundDecision::won_by(color, VictoryDecision::SuperiorityDecision),
        None => RoundDecision::referee(),
    }
}

/// Color of the last recorded action when it is a head-knockout strike.
fn knockout_color(actions: &[Action]) -> Option<FighterColor> {
    let last = actions.last()?;
    last.strike_technique()
        .filter(|t| t.is_head_knockout())
        .map(|_| last.fighter_color)
}

/// Tie-break on level scores at time expiration.
///
/// Spinning techniques, then high-value techniques, then manual hit counts.
/// Each tier is a plain comparison and the first non-tie decides.
pub fn superiority(input: &RoundDecisionInput<'_>) -> Option<FighterColor> {
    let spins = |color| score::count_techniques(input.actions, color, |t| t.is_spinning());
    let high_value = |color| score::count_techniques(input.actions, color, |t| t.is_high_value());

    let ordering = spins(FighterColor::Blue)
        .cmp(&spins(FighterColor::Red))
        .then_with(|| high_value(FighterColor::Blue).cmp(&high_value(FighterColor::Red)))
        .then_with(|| input.blue_hits.cmp(&input.red_hits));

    leader(ordering)
}

/// Blue-vs-red ordering to the leading color.
fn leader(blue_vs_red: Ordering) -> Option<FighterColor> {
    match blue_vs_red {
        Ordering::Greater => Some(FighterColor::Blue),
        Ordering::Less => Some(FighterColor::Red),
        Ordering::Equal => None,
    }
}
