//! Match session: the explicit context for one live fight.
//!
//! A session owns the fight and its rounds and is the only thing that
//! mutates them. It is synchronous and performs no I/O; operator prompts and
//! persistence happen around it in the orchestration layer.

use crate::domain::{
    Action, ActionDraft, ActionId, ActionType, Fight, FighterColor, InvalidActionShape, Round,
    Seconds, VictoryDecision, VideoReplay, ALLOWED_ROUND_SECS, MAX_ROUNDS,
};
use crate::engine::{
    clock, decide_round, progression, DeactivateOutcome, ProgressionOutcome, RoundDecision,
    RoundDecisionInput, ScoreBoard,
};
use crate::operator::HitCounts;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Missing context: {0}")]
    MissingContext(&'static str),
    #[error(transparent)]
    InvalidActionShape(#[from] InvalidActionShape),
    #[error("Fight is complete")]
    FightComplete,
    #[error("Round {0} is still in progress")]
    RoundInProgress(u32),
    #[error("Round duration {0}s is not one of 60, 90, 120")]
    InvalidRoundDuration(u32),
    #[error("No video replay left for {0}")]
    ReplayUnavailable(FighterColor),
    #[error("Round {0} not found")]
    RoundNotFound(u32),
    #[error("Round {0} is not finished")]
    RoundNotFinished(u32),
    #[error("Fight is already decided")]
    FightAlreadyDecided,
    #[error("Round {0} is being closed")]
    RoundEnding(u32),
}

/// Operator answers gathered before a round is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundEndInputs {
    pub ended_by_time_expiration: bool,
    /// `None` keeps the hit counts already on the round.
    pub hits: Option<HitCounts>,
    /// Used only when the rules leave the round to the referee.
    pub referee_winner: Option<FighterColor>,
}

/// Outcome of closing (or re-deciding) a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConclusion {
    pub round_number: u32,
    pub winner: Option<FighterColor>,
    pub decision: VictoryDecision,
    /// Decided by the cascade, before any referee input.
    pub automatic: bool,
    pub score: ScoreBoard,
    pub progression: ProgressionOutcome,
}

#[derive(Debug, Clone)]
pub struct MatchSession {
    fight: Fight,
    rounds: Vec<Round>,
    /// Index into `rounds` of the round open for actions.
    current: Option<usize>,
    /// Set while the current round's end is being confirmed; the ledger is
    /// frozen until the round is concluded or the ending is abandoned.
    ending: bool,
}

impl MatchSession {
    pub fn new(fight: Fight) -> Self {
        Self {
            fight,
            rounds: Vec::new(),
            current: None,
            ending: false,
        }
    }

    /// Rebuild a session from stored state. An unfinished last round becomes
    /// the current round again.
    pub fn restore(fight: Fight, mut rounds: Vec<Round>) -> Self {
        rounds.sort_by_key(|r| r.round_number);
        let current = match rounds.last() {
            Some(last) if !last.is_finished() => Some(rounds.len() - 1),
            _ => None,
        };
        Self {
            fight,
            rounds,
            current,
            ending: false,
        }
    }

    pub fn fight(&self) -> &Fight {
        &self.fight
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, round_number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_number == round_number)
    }

    pub fn current_round(&self) -> Result<&Round, SessionError> {
        self.current
            .map(|i| &self.rounds[i])
            .ok_or(SessionError::MissingContext("no round in progress"))
    }

    fn current_round_mut(&mut self) -> Result<&mut Round, SessionError> {
        match self.current {
            Some(i) => Ok(&mut self.rounds[i]),
            None => Err(SessionError::MissingContext("no round in progress")),
        }
    }

    /// The current round, unless it is being closed.
    fn open_round_mut(&mut self) -> Result<&mut Round, SessionError> {
        let ending = self.ending;
        let round = self.current_round_mut()?;
        if ending {
            return Err(SessionError::RoundEnding(round.round_number));
        }
        Ok(round)
    }

    /// Freeze the current round's ledger while its end is confirmed.
    ///
    /// Returns the round number and whether the match clock has run out at
    /// `video_now`. Calling it again while already ending is allowed, so an
    /// abandoned ending can be taken over.
    pub fn begin_ending(&mut self, video_now: Seconds) -> Result<(u32, bool), SessionError> {
        let round = self.current_round()?;
        let begun = (round.round_number, clock::is_expired(round, video_now));
        self.ending = true;
        info!(fight_id = %self.fight.id, round_number = begun.0, "Round ending");
        Ok(begun)
    }

    /// Unfreeze the current round without closing it.
    pub fn abandon_ending(&mut self) {
        self.ending = false;
    }

    /// Where the latest ended round stopped on the video clock.
    pub fn last_end_time(&self) -> Option<Seconds> {
        self.rounds.iter().rev().find_map(|r| r.end_time)
    }

    /// Number the next round would get.
    pub fn next_round_number(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    /// Fail unless a new round may be opened now.
    pub fn ensure_can_start_round(&self) -> Result<(), SessionError> {
        if let Ok(open) = self.current_round() {
            return Err(SessionError::RoundInProgress(open.round_number));
        }
        if self.fight.is_decided() || self.rounds.len() as u32 >= MAX_ROUNDS {
            return Err(SessionError::FightComplete);
        }
        Ok(())
    }

    /// Open a new round.
    pub fn start_round(&mut self, time_limit_secs: u32, start_time: Seconds) -> Result<&Round, SessionError> {
        self.ensure_can_start_round()?;
        if !ALLOWED_ROUND_SECS.contains(&time_limit_secs) {
            return Err(SessionError::InvalidRoundDuration(time_limit_secs));
        }

        let round = Round::new(
            self.fight.id,
            self.next_round_number(),
            Seconds::new(time_limit_secs as f64),
            start_time,
        );
        info!(
            fight_id = %self.fight.id,
            round_number = round.round_number,
            time_limit = %round.round_time_limit,
            start_time = %round.start_time,
            "Round started"
        );
        self.rounds.push(round);
        self.current = Some(self.rounds.len() - 1);
        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// Validate and append an action to the current round.
    pub fn record_action(&mut self, draft: ActionDraft, video_now: Seconds) -> Result<&Action, SessionError> {
        let round = self.open_round_mut()?;
        let remaining = clock::remaining(round, video_now);
        let action = Action::from_draft(draft, remaining, video_now)?;
        info!(
            round_number = round.round_number,
            action_id = %action.id,
            color = %action.fighter_color,
            action_type = ?action.action_type,
            points = action.points(),
            clock = %remaining,
            "Action recorded"
        );
        round.actions.append(action);
        round.touch();
        let entries = round.actions.entries();
        Ok(&entries[entries.len() - 1])
    }

    /// Soft-delete the most recent active action of the current round.
    pub fn undo_last(&mut self) -> Result<DeactivateOutcome, SessionError> {
        let round = self.open_round_mut()?;
        let outcome = round.actions.undo_last();
        after_deactivation(round, "undo", outcome);
        Ok(outcome)
    }

    /// Soft-delete a specific action of the current round.
    pub fn delete_action(&mut self, id: ActionId) -> Result<DeactivateOutcome, SessionError> {
        let round = self.open_round_mut()?;
        let outcome = round.actions.deactivate(id);
        after_deactivation(round, "delete", outcome);
        Ok(outcome)
    }

    /// Soft-delete the most recent active penalty charged to `color`.
    pub fn undo_penalty(&mut self, color: FighterColor) -> Result<DeactivateOutcome, SessionError> {
        let round = self.open_round_mut()?;
        let outcome = round
            .actions
            .deactivate_last_matching(color, ActionType::Penalty);
        after_deactivation(round, "undo_penalty", outcome);
        Ok(outcome)
    }

    /// Exclude a stoppage from the current round's match clock.
    pub fn add_pause(&mut self, pause: Seconds) -> Result<Seconds, SessionError> {
        let round = self.open_round_mut()?;
        let pause = pause.clamp(Seconds::ZERO, Seconds::new(f64::MAX));
        round.paused_secs = round.paused_secs + pause;
        round.touch();
        Ok(round.paused_secs)
    }

    pub fn set_hit_counts(&mut self, hits: HitCounts) -> Result<(), SessionError> {
        let round = self.current_round_mut()?;
        round.blue_hits = hits.blue;
        round.red_hits = hits.red;
        round.touch();
        Ok(())
    }

    pub fn live_score(&self) -> Result<ScoreBoard, SessionError> {
        Ok(ScoreBoard::tally(self.current_round()?.actions.entries()))
    }

    pub fn clock_remaining(&self, video_now: Seconds) -> Result<Seconds, SessionError> {
        Ok(clock::remaining(self.current_round()?, video_now))
    }

    pub fn is_clock_expired(&self, video_now: Seconds) -> Result<bool, SessionError> {
        Ok(clock::is_expired(self.current_round()?, video_now))
    }

    /// Fail unless `color` may still challenge a call this fight.
    pub fn ensure_replay_available(&self, color: FighterColor) -> Result<(), SessionError> {
        let round = self.current_round()?;
        if self.ending {
            return Err(SessionError::RoundEnding(round.round_number));
        }
        if self.fight.video_replay_used(color) {
            return Err(SessionError::ReplayUnavailable(color));
        }
        Ok(())
    }

    /// Record the outcome of a video replay challenge.
    ///
    /// Either outcome spends the fighter's challenge for the fight.
    pub fn resolve_video_replay(
        &mut self,
        color: FighterColor,
        accepted: bool,
        video_now: Seconds,
    ) -> Result<VideoReplay, SessionError> {
        self.ensure_replay_available(color)?;
        let round = self.current_round_mut()?;
        let remaining = clock::remaining(round, video_now);
        let replay = VideoReplay {
            requested_by_color: color,
            match_clock_timestamp: remaining,
            was_accepted: accepted,
        };
        round.video_replays.push(replay.clone());
        let marker = Action::from_draft(
            ActionDraft::bare(color, ActionType::VideoReplayOutcome),
            remaining,
            video_now,
        )?;
        round.actions.append(marker);
        round.touch();
        self.fight.mark_video_replay_used(color);
        info!(
            fight_id = %self.fight.id,
            color = %color,
            accepted,
            "Video replay resolved"
        );
        Ok(replay)
    }

    /// Run the decision cascade on the current round without closing it.
    pub fn preview_decision(&self, ended_by_time_expiration: bool) -> Result<RoundDecision, SessionError> {
        let round = self.current_round()?;
        Ok(decide_round(&RoundDecisionInput {
            actions: round.actions.entries(),
            blue_hits: round.blue_hits,
            red_hits: round.red_hits,
            ended_by_time_expiration,
        }))
    }

    /// Close the current round and update fight progression.
    pub fn conclude_round(
        &mut self,
        inputs: RoundEndInputs,
        video_now: Seconds,
    ) -> Result<RoundConclusion, SessionError> {
        if let Some(hits) = inputs.hits {
            self.set_hit_counts(hits)?;
        }
        let automatic = self.preview_decision(inputs.ended_by_time_expiration)?;
        let winner = if automatic.needs_referee() {
            inputs.referee_winner
        } else {
            automatic.winner
        };

        let index = self
            .current
            .ok_or(SessionError::MissingContext("no round in progress"))?;
        let winner_id = winner.map(|c| self.fight.fighter_id(c).clone());
        let round = &mut self.rounds[index];
        round.victory_decision = Some(automatic.decision);
        round.round_winner_fighter_id = winner_id;
        round.end_time = Some(video_now);
        round.touch();
        self.current = None;
        self.ending = false;

        info!(
            fight_id = %self.fight.id,
            round_number = round.round_number,
            decision = %automatic.decision,
            winner = ?winner,
            "Round decided"
        );

        let progression =
            progression::record_round_outcome(&mut self.fight, &self.rounds, &self.rounds[index]);
        let round = &self.rounds[index];
        Ok(RoundConclusion {
            round_number: round.round_number,
            winner,
            decision: automatic.decision,
            automatic: !automatic.needs_referee(),
            score: ScoreBoard::tally(round.actions.entries()),
            progression,
        })
    }

    /// Explicitly override a finished round's result.
    ///
    /// Only allowed while the fight is undecided and no round is open.
    pub fn redecide_round(
        &mut self,
        round_number: u32,
        winner: Option<FighterColor>,
        decision: VictoryDecision,
    ) -> Result<RoundConclusion, SessionError> {
        if self.fight.is_decided() {
            return Err(SessionError::FightAlreadyDecided);
        }
        if let Ok(open) = self.current_round() {
            return Err(SessionError::RoundInProgress(open.round_number));
        }
        let index = self
            .rounds
            .iter()
            .position(|r| r.round_number == round_number)
            .ok_or(SessionError::RoundNotFound(round_number))?;
        if !self.rounds[index].is_finished() {
            return Err(SessionError::RoundNotFinished(round_number));
        }

        let winner_id = winner.map(|c| self.fight.fighter_id(c).clone());
        let round = &mut self.rounds[index];
        round.victory_decision = Some(decision);
        round.round_winner_fighter_id = winner_id;
        round.touch();
        info!(
            fight_id = %self.fight.id,
            round_number,
            decision = %decision,
            winner = ?winner,
            "Round re-decided"
        );

        let progression =
            progression::record_round_outcome(&mut self.fight, &self.rounds, &self.rounds[index]);
        Ok(RoundConclusion {
            round_number,
            winner,
            decision,
            automatic: false,
            score: ScoreBoard::tally(self.rounds[index].actions.entries()),
            progression,
        })
    }

    /// Mark a round as persisted at `revision`.
    ///
    /// Returns false, leaving the round dirty, when it changed after that
    /// revision was written.
    pub fn mark_synced(&mut self, round_number: u32, revision: u64) -> bool {
        match self.rounds.iter_mut().find(|r| r.round_number == round_number) {
            Some(round) if round.revision == revision => {
                round.is_synced = true;
                true
            }
            _ => false,
        }
    }
}

fn after_deactivation(round: &mut Round, flow: &'static str, outcome: DeactivateOutcome) {
    match outcome {
        DeactivateOutcome::Deactivated(id) => {
            round.touch();
            info!(round_number = round.round_number, flow, action_id = %id, "Action deactivated")
        }
        DeactivateOutcome::NothingToDeactivate => {
            info!(round_number = round.round_number, flow, "Nothing to deactivate")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FighterId, Technique};

    fn session() -> MatchSession {
        MatchSession::new(Fight::new(FighterId::new("blue"), FighterId::new("red")))
    }

    fn time_up() -> RoundEndInputs {
        RoundEndInputs {
            ended_by_time_expiration: true,
            ..RoundEndInputs::default()
        }
    }

    #[test]
    fn test_actions_require_open_round() {
        let mut s = session();
        let err = s
            .record_action(ActionDraft::punch(FighterColor::Blue), Seconds::ZERO)
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingContext(_)));
        assert!(matches!(s.undo_last(), Err(SessionError::MissingContext(_))));
        assert!(s.rounds().is_empty());
    }

    #[test]
    fn test_start_round_validates_duration() {
        let mut s = session();
        assert_eq!(
            s.start_round(75, Seconds::ZERO).unwrap_err(),
            SessionError::InvalidRoundDuration(75)
        );
        assert_eq!(s.start_round(90, Seconds::ZERO).unwrap().round_number, 1);
        assert_eq!(
            s.start_round(90, Seconds::ZERO).unwrap_err(),
            SessionError::RoundInProgress(1)
        );
    }

    #[test]
    fn test_record_action_stamps_clocks() {
        let mut s = session();
        s.start_round(120, Seconds::new(10.0)).unwrap();
        let action = s
            .record_action(
                ActionDraft::kick(FighterColor::Red, Technique::DollyoChagi),
                Seconds::new(40.0),
            )
            .unwrap();
        assert_eq!(action.video_timestamp, Seconds::new(40.0));
        assert_eq!(action.match_clock_timestamp, Seconds::new(90.0));
        assert_eq!(s.live_score().unwrap().red_score, 3);
    }

    #[test]
    fn test_invalid_draft_is_rejected_without_side_effects() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        let err = s
            .record_action(ActionDraft::bare(FighterColor::Red, ActionType::Kick), Seconds::ZERO)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidActionShape(_)));
        assert!(s.current_round().unwrap().actions.is_empty());
    }

    #[test]
    fn test_undo_penalty_and_delete() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(ActionDraft::penalty(FighterColor::Blue, None), Seconds::new(1.0))
            .unwrap();
        let kick_id = s
            .record_action(ActionDraft::punch(FighterColor::Red), Seconds::new(2.0))
            .unwrap()
            .id;
        assert_eq!(s.live_score().unwrap().red_score, 2);

        assert!(s.undo_penalty(FighterColor::Blue).unwrap().is_deactivated());
        assert_eq!(
            s.undo_penalty(FighterColor::Blue).unwrap(),
            DeactivateOutcome::NothingToDeactivate
        );
        assert_eq!(
            s.delete_action(kick_id).unwrap(),
            DeactivateOutcome::Deactivated(kick_id)
        );
        assert_eq!(s.live_score().unwrap(), ScoreBoard::default());
        assert_eq!(s.current_round().unwrap().actions.len(), 2);
    }

    #[test]
    fn test_stale_save_leaves_round_dirty() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(ActionDraft::punch(FighterColor::Blue), Seconds::new(1.0))
            .unwrap();
        let written = s.round(1).unwrap().revision;

        s.undo_last().unwrap();
        assert!(!s.mark_synced(1, written));
        assert!(!s.round(1).unwrap().is_synced);

        let current = s.round(1).unwrap().revision;
        assert!(s.mark_synced(1, current));
        assert!(s.round(1).unwrap().is_synced);
        assert_eq!(s.undo_last().unwrap(), DeactivateOutcome::NothingToDeactivate);
        assert!(s.round(1).unwrap().is_synced);
    }

    #[test]
    fn test_ending_round_rejects_ledger_changes() {
        let mut s = session();
        s.start_round(60, Seconds::ZERO).unwrap();
        let id = s
            .record_action(ActionDraft::punch(FighterColor::Red), Seconds::new(2.0))
            .unwrap()
            .id;
        assert_eq!(s.begin_ending(Seconds::new(61.0)).unwrap(), (1, true));

        assert_eq!(
            s.record_action(ActionDraft::punch(FighterColor::Blue), Seconds::new(62.0))
                .unwrap_err(),
            SessionError::RoundEnding(1)
        );
        assert_eq!(s.undo_last().unwrap_err(), SessionError::RoundEnding(1));
        assert_eq!(s.delete_action(id).unwrap_err(), SessionError::RoundEnding(1));
        assert_eq!(
            s.undo_penalty(FighterColor::Red).unwrap_err(),
            SessionError::RoundEnding(1)
        );
        assert_eq!(
            s.ensure_replay_available(FighterColor::Blue).unwrap_err(),
            SessionError::RoundEnding(1)
        );
        assert_eq!(s.live_score().unwrap().red_score, 1);

        s.abandon_ending();
        assert!(s.undo_last().unwrap().is_deactivated());

        s.begin_ending(Seconds::new(61.0)).unwrap();
        s.conclude_round(time_up(), Seconds::new(61.0)).unwrap();
        assert!(!s.ending);
    }

    #[test]
    fn test_pause_shifts_clock() {
        let mut s = session();
        s.start_round(60, Seconds::ZERO).unwrap();
        s.add_pause(Seconds::new(20.0)).unwrap();
        assert_eq!(s.clock_remaining(Seconds::new(50.0)).unwrap(), Seconds::new(30.0));
        assert!(!s.is_clock_expired(Seconds::new(79.0)).unwrap());
        assert!(s.is_clock_expired(Seconds::new(80.0)).unwrap());
    }

    #[test]
    fn test_conclude_round_sets_winner_and_closes() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(
            ActionDraft::kick(FighterColor::Blue, Technique::BandalChagi),
            Seconds::new(5.0),
        )
        .unwrap();
        let conclusion = s.conclude_round(time_up(), Seconds::new(120.0)).unwrap();

        assert_eq!(conclusion.decision, VictoryDecision::FinalScore);
        assert_eq!(conclusion.winner, Some(FighterColor::Blue));
        assert!(conclusion.automatic);
        assert_eq!(
            conclusion.progression,
            ProgressionOutcome::PrepareNextRound {
                next_round_number: 2
            }
        );
        let round = s.round(1).unwrap();
        assert_eq!(round.round_winner_fighter_id, Some(FighterId::new("blue")));
        assert_eq!(round.end_time, Some(Seconds::new(120.0)));
        assert!(s.current_round().is_err());
    }

    #[test]
    fn test_referee_fills_undecided_round() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        let inputs = RoundEndInputs {
            ended_by_time_expiration: true,
            hits: Some(HitCounts { blue: 2, red: 2 }),
            referee_winner: Some(FighterColor::Red),
        };
        let conclusion = s.conclude_round(inputs, Seconds::new(120.0)).unwrap();
        assert_eq!(conclusion.decision, VictoryDecision::Referee);
        assert_eq!(conclusion.winner, Some(FighterColor::Red));
        assert!(!conclusion.automatic);
        assert_eq!(s.round(1).unwrap().blue_hits, 2);
    }

    #[test]
    fn test_referee_answer_ignored_when_rules_decide() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(ActionDraft::punch(FighterColor::Blue), Seconds::new(3.0))
            .unwrap();
        let inputs = RoundEndInputs {
            referee_winner: Some(FighterColor::Red),
            ..time_up()
        };
        let conclusion = s.conclude_round(inputs, Seconds::new(120.0)).unwrap();
        assert_eq!(conclusion.winner, Some(FighterColor::Blue));
    }

    #[test]
    fn test_fight_complete_after_knockout() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(
            ActionDraft::kick(FighterColor::Red, Technique::SpinningHeadKick),
            Seconds::new(30.0),
        )
        .unwrap();
        let conclusion = s
            .conclude_round(RoundEndInputs::default(), Seconds::new(31.0))
            .unwrap();
        assert_eq!(conclusion.decision, VictoryDecision::Knockout);
        assert!(matches!(
            conclusion.progression,
            ProgressionOutcome::FightDecided { .. }
        ));
        assert_eq!(
            s.start_round(120, Seconds::new(40.0)).unwrap_err(),
            SessionError::FightComplete
        );
    }

    #[test]
    fn test_video_replay_spends_challenge() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        let replay = s
            .resolve_video_replay(FighterColor::Blue, false, Seconds::new(20.0))
            .unwrap();
        assert!(!replay.was_accepted);
        assert_eq!(replay.match_clock_timestamp, Seconds::new(100.0));
        assert_eq!(
            s.resolve_video_replay(FighterColor::Blue, true, Seconds::new(25.0))
                .unwrap_err(),
            SessionError::ReplayUnavailable(FighterColor::Blue)
        );
        assert!(s.ensure_replay_available(FighterColor::Red).is_ok());

        let round = s.current_round().unwrap();
        assert_eq!(round.video_replays.len(), 1);
        assert_eq!(
            round.actions.last_recorded().map(|a| a.action_type),
            Some(ActionType::VideoReplayOutcome)
        );
        assert_eq!(s.live_score().unwrap(), ScoreBoard::default());
    }

    #[test]
    fn test_redecide_round() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.conclude_round(time_up(), Seconds::new(120.0)).unwrap();
        assert_eq!(
            s.redecide_round(2, Some(FighterColor::Red), VictoryDecision::Referee)
                .unwrap_err(),
            SessionError::RoundNotFound(2)
        );

        let conclusion = s
            .redecide_round(1, Some(FighterColor::Red), VictoryDecision::Referee)
            .unwrap();
        assert_eq!(conclusion.winner, Some(FighterColor::Red));
        assert_eq!(
            s.round(1).unwrap().round_winner_fighter_id,
            Some(FighterId::new("red"))
        );
        assert_eq!(s.fight().round_ids, vec![1]);
    }

    #[test]
    fn test_redecide_rejected_once_fight_decided() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(
            ActionDraft::kick(FighterColor::Blue, Technique::HeadKick),
            Seconds::new(5.0),
        )
        .unwrap();
        s.conclude_round(time_up(), Seconds::new(6.0)).unwrap();
        assert_eq!(
            s.redecide_round(1, Some(FighterColor::Red), VictoryDecision::Referee)
                .unwrap_err(),
            SessionError::FightAlreadyDecided
        );
    }

    #[test]
    fn test_redecide_rejected_while_round_open() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.record_action(ActionDraft::punch(FighterColor::Blue), Seconds::new(5.0))
            .unwrap();
        s.conclude_round(time_up(), Seconds::new(120.0)).unwrap();
        s.start_round(120, Seconds::new(130.0)).unwrap();
        s.record_action(ActionDraft::punch(FighterColor::Red), Seconds::new(135.0))
            .unwrap();
        s.conclude_round(time_up(), Seconds::new(250.0)).unwrap();
        s.start_round(120, Seconds::new(260.0)).unwrap();

        assert_eq!(
            s.redecide_round(1, Some(FighterColor::Blue), VictoryDecision::Referee)
                .unwrap_err(),
            SessionError::RoundInProgress(3)
        );
        assert!(s.fight().fight_result.is_none());

        s.record_action(
            ActionDraft::kick(FighterColor::Red, Technique::DollyoChagi),
            Seconds::new(270.0),
        )
        .unwrap();
        let conclusion = s.conclude_round(time_up(), Seconds::new(380.0)).unwrap();
        match conclusion.progression {
            ProgressionOutcome::FightDecided { result } => {
                assert_eq!(result.winner_fighter_id, Some(FighterId::new("red")));
            }
            other => panic!("expected decided fight, got {other:?}"),
        }
    }

    #[test]
    fn test_restore_reopens_unfinished_round() {
        let mut s = session();
        s.start_round(120, Seconds::ZERO).unwrap();
        s.conclude_round(time_up(), Seconds::new(120.0)).unwrap();
        s.start_round(90, Seconds::new(150.0)).unwrap();

        let restored = MatchSession::restore(s.fight().clone(), s.rounds().to_vec());
        assert_eq!(restored.current_round().unwrap().round_number, 2);

        let closed = MatchSession::restore(s.fight().clone(), s.rounds()[..1].to_vec());
        assert!(closed.current_round().is_err());
        assert_eq!(closed.next_round_number(), 2);
    }
}
