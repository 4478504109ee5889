//! Fight progression: aggregate decided rounds into a fight result.

use crate::domain::{
    Fight, FightMethod, FightResult, FighterColor, Round, MAX_ROUNDS, ROUNDS_TO_WIN,
};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::info;

/// What the caller should do after a round outcome is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ProgressionOutcome {
    /// The fight was decided by this round.
    FightDecided { result: FightResult },
    /// The fight goes on.
    PrepareNextRound {
        #[serde(rename = "nextRoundNumber")]
        next_round_number: u32,
    },
    /// The fight had already been decided; nothing changed.
    AlreadyDecided { result: FightResult },
}

/// Round wins per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundWins {
    pub blue: u32,
    pub red: u32,
}

impl RoundWins {
    pub fn of(&self, color: FighterColor) -> u32 {
        match color {
            FighterColor::Blue => self.blue,
            FighterColor::Red => self.red,
        }
    }
}

/// Count round wins by scanning every round's winner id.
pub fn rounds_won(fight: &Fight, rounds: &[Round]) -> RoundWins {
    let mut wins = RoundWins::default();
    for winner in rounds.iter().filter_map(|r| r.round_winner_fighter_id.as_ref()) {
        match fight.color_of(winner) {
            Some(FighterColor::Blue) => wins.blue += 1,
            Some(FighterColor::Red) => wins.red += 1,
            None => {}
        }
    }
    wins
}

/// Summed blue/red scores across all rounds.
pub fn cumulative_score(rounds: &[Round]) -> (u32, u32) {
    rounds.iter().fold((0, 0), |(blue, red), r| {
        (blue + r.blue_score(), red + r.red_score())
    })
}

/// Record `round` on the fight and decide whether the fight is over.
///
/// `rounds` holds every round of the fight, `round` included. A fight result,
/// once set, is never replaced.
pub fn record_round_outcome(fight: &mut Fight, rounds: &[Round], round: &Round) -> ProgressionOutcome {
    if let Some(result) = &fight.fight_result {
        return ProgressionOutcome::AlreadyDecided {
            result: result.clone(),
        };
    }

    if !fight.round_ids.contains(&round.round_number) {
        fight.round_ids.push(round.round_number);
    }

    match evaluate(fight, rounds, round) {
        Some(result) => {
            info!(
                fight_id = %fight.id,
                method = result.method.name(),
                winner = ?result.winner_fighter_id,
                "Fight decided"
            );
            fight.fight_result = Some(result.clone());
            ProgressionOutcome::FightDecided { result }
        }
        None => ProgressionOutcome::PrepareNextRound {
            next_round_number: round.round_number + 1,
        },
    }
}

/// Re-run the fight-decided predicate without recording anything.
pub fn evaluate(fight: &Fight, rounds: &[Round], round: &Round) -> Option<FightResult> {
    let wins = rounds_won(fight, rounds);
    let (blue_total, red_total) = cumulative_score(rounds);

    let direct = round
        .victory_decision
        .filter(|d| d.is_direct_victory())
        .zip(round.round_winner_fighter_id.clone());
    if let Some((decision, winner)) = direct {
        return Some(FightResult {
            winner_fighter_id: Some(winner),
            method: FightMethod::Direct(decision),
            blue_total_score: blue_total,
            red_total_score: red_total,
        });
    }

    let majority = [FighterColor::Blue, FighterColor::Red]
        .into_iter()
        .find(|c| wins.of(*c) >= ROUNDS_TO_WIN);
    if let Some(color) = majority {
        return Some(FightResult {
            winner_fighter_id: Some(fight.fighter_id(color).clone()),
            method: FightMethod::Majority,
            blue_total_score: blue_total,
            red_total_score: red_total,
        });
    }

    let finished = rounds.iter().filter(|r| r.is_finished()).count() as u32;
    if finished >= MAX_ROUNDS {
        let ordering = wins
            .blue
            .cmp(&wins.red)
            .then_with(|| blue_total.cmp(&red_total));
        let winner = match ordering {
            Ordering::Greater => Some(fight.blue_fighter_id.clone()),
            Ordering::Less => Some(fight.red_fighter_id.clone()),
            Ordering::Equal => None,
        };
        return Some(FightResult {
            winner_fighter_id: winner,
            method: FightMethod::Decision,
            blue_total_score: blue_total,
            red_total_score: red_total,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, ActionDraft, FighterId, Seconds, Technique, VictoryDecision};

    fn fight() -> Fight {
        Fight::new(FighterId::new("blue-1"), FighterId::new("red-1"))
    }

    fn decided_round(
        fight: &Fight,
        number: u32,
        winner: Option<FighterColor>,
        decision: VictoryDecision,
    ) -> Round {
        let mut round = Round::new(fight.id, number, Seconds::new(120.0), Seconds::ZERO);
        round.victory_decision = Some(decision);
        round.round_winner_fighter_id = winner.map(|c| fight.fighter_id(c).clone());
        round
    }

    #[test]
    fn test_first_round_prepares_next() {
        let mut fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::FinalScore);
        let outcome = record_round_outcome(&mut fight, &[r1.clone()], &r1);
        assert_eq!(
            outcome,
            ProgressionOutcome::PrepareNextRound {
                next_round_number: 2
            }
        );
        assert_eq!(fight.round_ids, vec![1]);
        assert!(fight.fight_result.is_none());
    }

    #[test]
    fn test_two_round_wins_decide() {
        let mut fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Red), VictoryDecision::FinalScore);
        let r2 = decided_round(&fight, 2, Some(FighterColor::Red), VictoryDecision::PointGap);
        let rounds = vec![r1.clone(), r2.clone()];
        record_round_outcome(&mut fight, &rounds[..1], &r1);
        let outcome = record_round_outcome(&mut fight, &rounds, &r2);

        match outcome {
            ProgressionOutcome::FightDecided { result } => {
                assert_eq!(result.winner_fighter_id, Some(FighterId::new("red-1")));
                assert_eq!(result.method, FightMethod::Majority);
            }
            other => panic!("expected decided fight, got {other:?}"),
        }
        assert_eq!(fight.round_ids, vec![1, 2]);
    }

    #[test]
    fn test_direct_victory_in_first_round() {
        let mut fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::Disqualification);
        let outcome = record_round_outcome(&mut fight, &[r1.clone()], &r1);
        let result = fight.fight_result.clone().unwrap();
        assert_eq!(outcome, ProgressionOutcome::FightDecided { result: result.clone() });
        assert_eq!(result.method, FightMethod::Direct(VictoryDecision::Disqualification));
        assert_eq!(result.winner_fighter_id, Some(FighterId::new("blue-1")));
    }

    #[test]
    fn test_cumulative_score_in_result() {
        let mut fight = fight();
        let mut r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::Knockout);
        for draft in [
            ActionDraft::kick(FighterColor::Red, Technique::DwitChagi),
            ActionDraft::kick(FighterColor::Blue, Technique::HeadKick),
        ] {
            r1.actions
                .append(Action::from_draft(draft, Seconds::new(10.0), Seconds::new(10.0)).unwrap());
        }
        record_round_outcome(&mut fight, &[r1.clone()], &r1);
        let result = fight.fight_result.unwrap();
        assert_eq!((result.blue_total_score, result.red_total_score), (5, 3));
    }

    #[test]
    fn test_third_round_guard_uses_round_wins_then_score() {
        let mut fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::FinalScore);
        let r2 = decided_round(&fight, 2, None, VictoryDecision::Referee);
        let r3 = decided_round(&fight, 3, None, VictoryDecision::Referee);
        let rounds = vec![r1, r2, r3.clone()];
        let outcome = record_round_outcome(&mut fight, &rounds, &r3);
        match outcome {
            ProgressionOutcome::FightDecided { result } => {
                assert_eq!(result.method, FightMethod::Decision);
                assert_eq!(result.winner_fighter_id, Some(FighterId::new("blue-1")));
            }
            other => panic!("expected decided fight, got {other:?}"),
        }
    }

    #[test]
    fn test_open_third_round_does_not_trigger_decision() {
        let fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::Referee);
        let r2 = decided_round(&fight, 2, Some(FighterColor::Red), VictoryDecision::FinalScore);
        let r3 = Round::new(fight.id, 3, Seconds::new(120.0), Seconds::new(250.0));
        assert_eq!(evaluate(&fight, &[r1.clone(), r2, r3], &r1), None);
    }

    #[test]
    fn test_third_round_full_tie_has_no_winner() {
        let mut fight = fight();
        let rounds: Vec<_> = (1..=3)
            .map(|n| decided_round(&fight, n, None, VictoryDecision::Referee))
            .collect();
        let last = rounds[2].clone();
        record_round_outcome(&mut fight, &rounds, &last);
        let result = fight.fight_result.unwrap();
        assert_eq!(result.winner_fighter_id, None);
        assert_eq!(result.method, FightMethod::Decision);
    }

    #[test]
    fn test_result_is_never_replaced() {
        let mut fight = fight();
        let r1 = decided_round(&fight, 1, Some(FighterColor::Blue), VictoryDecision::Knockout);
        record_round_outcome(&mut fight, &[r1.clone()], &r1);
        let first = fight.fight_result.clone().unwrap();

        let r2 = decided_round(&fight, 2, Some(FighterColor::Red), VictoryDecision::Knockout);
        let outcome = record_round_outcome(&mut fight, &[r1, r2.clone()], &r2);
        assert_eq!(outcome, ProgressionOutcome::AlreadyDecided { result: first.clone() });
        assert_eq!(fight.fight_result, Some(first));
        assert_eq!(fight.round_ids, vec![1]);
    }
}
