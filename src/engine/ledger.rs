use crate::domain::{Action, ActionId, ActionType, FighterColor};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a soft-delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "actionId")]
pub enum DeactivateOutcome {
    Deactivated(ActionId),
    /// No matching active entry; the ledger is unchanged.
    NothingToDeactivate,
}

impl DeactivateOutcome {
    pub fn is_deactivated(&self) -> bool {
        matches!(self, DeactivateOutcome::Deactivated(_))
    }
}

/// Append-only, soft-deletable log of a round's actions.
///
/// Insertion order is chronological order. Entries are never removed; undo
/// and delete flip `active` to false and every aggregate filters on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLedger {
    entries: Vec<Action>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a ledger from stored entries, keeping their order.
    pub fn from_entries(entries: Vec<Action>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Action] {
        &self.entries
    }

    pub fn active(&self) -> impl Iterator<Item = &Action> {
        self.entries.iter().filter(|a| a.active)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn append(&mut self, action: Action) {
        debug!(
            action_id = %action.id,
            color = %action.fighter_color,
            action_type = ?action.action_type,
            "Appending action to ledger"
        );
        self.entries.push(action);
    }

    /// Soft-delete the entry with `id` if it is still active.
    pub fn deactivate(&mut self, id: ActionId) -> DeactivateOutcome {
        match self.entries.iter_mut().find(|a| a.id == id && a.active) {
            Some(action) => {
                action.active = false;
                DeactivateOutcome::Deactivated(id)
            }
            None => DeactivateOutcome::NothingToDeactivate,
        }
    }

    /// Soft-delete the most recent active entry of `color` and `action_type`.
    pub fn deactivate_last_matching(
        &mut self,
        color: FighterColor,
        action_type: ActionType,
    ) -> DeactivateOutcome {
        self.deactivate_last_where(|a| a.fighter_color == color && a.action_type == action_type)
    }

    /// Soft-delete the most recent active entry.
    pub fn undo_last(&mut self) -> DeactivateOutcome {
        self.deactivate_last_where(|_| true)
    }

    fn deactivate_last_where<F>(&mut self, pred: F) -> DeactivateOutcome
    where
        F: Fn(&Action) -> bool,
    {
        match self.entries.iter_mut().rev().find(|a| a.active && pred(a)) {
            Some(action) => {
                action.active = false;
                DeactivateOutcome::Deactivated(action.id)
            }
            None => DeactivateOutcome::NothingToDeactivate,
        }
    }

    /// Most recent entry regardless of its active flag.
    pub fn last_recorded(&self) -> Option<&Action> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionDraft, Seconds, Technique};

    fn action(draft: ActionDraft) -> Action {
        Action::from_draft(draft, Seconds::new(60.0), Seconds::new(10.0)).unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut ledger = ActionLedger::new();
        let first = action(ActionDraft::punch(FighterColor::Blue));
        let second = action(ActionDraft::kick(FighterColor::Red, Technique::CutKick));
        let (first_id, second_id) = (first.id, second.id);
        ledger.append(first);
        ledger.append(second);

        let ids: Vec<_> = ledger.entries().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first_id, second_id]);
    }

    #[test]
    fn test_deactivate_keeps_record() {
        let mut ledger = ActionLedger::new();
        let kick = action(ActionDraft::kick(FighterColor::Blue, Technique::HeadKick));
        let id = kick.id;
        ledger.append(kick);

        assert_eq!(ledger.deactivate(id), DeactivateOutcome::Deactivated(id));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.entries()[0].active);
        assert_eq!(ledger.active().count(), 0);
    }

    #[test]
    fn test_deactivate_twice_is_stale() {
        let mut ledger = ActionLedger::new();
        let kick = action(ActionDraft::punch(FighterColor::Red));
        let id = kick.id;
        ledger.append(kick);

        ledger.deactivate(id);
        assert_eq!(ledger.deactivate(id), DeactivateOutcome::NothingToDeactivate);
        assert_eq!(
            ledger.deactivate(ActionId::new()),
            DeactivateOutcome::NothingToDeactivate
        );
    }

    #[test]
    fn test_deactivate_last_matching_picks_most_recent() {
        let mut ledger = ActionLedger::new();
        let older = action(ActionDraft::penalty(FighterColor::Blue, None));
        let newer = action(ActionDraft::penalty(FighterColor::Blue, None));
        let red = action(ActionDraft::penalty(FighterColor::Red, None));
        let (older_id, newer_id) = (older.id, newer.id);
        ledger.append(older);
        ledger.append(newer);
        ledger.append(red);

        let outcome = ledger.deactivate_last_matching(FighterColor::Blue, ActionType::Penalty);
        assert_eq!(outcome, DeactivateOutcome::Deactivated(newer_id));
        let outcome = ledger.deactivate_last_matching(FighterColor::Blue, ActionType::Penalty);
        assert_eq!(outcome, DeactivateOutcome::Deactivated(older_id));
        let outcome = ledger.deactivate_last_matching(FighterColor::Blue, ActionType::Penalty);
        assert_eq!(outcome, DeactivateOutcome::NothingToDeactivate);
    }

    #[test]
    fn test_undo_last_skips_inactive_entries() {
        let mut ledger = ActionLedger::new();
        let first = action(ActionDraft::punch(FighterColor::Blue));
        let second = action(ActionDraft::punch(FighterColor::Red));
        let (first_id, second_id) = (first.id, second.id);
        ledger.append(first);
        ledger.append(second);

        assert_eq!(ledger.undo_last(), DeactivateOutcome::Deactivated(second_id));
        assert_eq!(ledger.undo_last(), DeactivateOutcome::Deactivated(first_id));
        assert_eq!(ledger.undo_last(), DeactivateOutcome::NothingToDeactivate);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut ledger = ActionLedger::new();
        let before = ledger.clone();
        assert_eq!(ledger.undo_last(), DeactivateOutcome::NothingToDeactivate);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_last_recorded_ignores_active_flag() {
        let mut ledger = ActionLedger::new();
        let kick = action(ActionDraft::kick(FighterColor::Blue, Technique::HeadKick));
        let id = kick.id;
        ledger.append(kick);
        ledger.deactivate(id);
        assert_eq!(ledger.last_recorded().map(|a| a.id), Some(id));
    }
}
