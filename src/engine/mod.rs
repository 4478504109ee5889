//! Pure computation engine(s) for deterministic scoring logic.
//!
//! Nothing in here performs I/O or holds state beyond its arguments; the
//! session and orchestration layers feed it and persist what it returns.

pub mod clock;
pub mod decision;
pub mod ledger;
pub mod progression;
pub mod score;

pub use decision::{decide_round, RoundDecision, RoundDecisionInput, PENALTY_LIMIT, POINT_GAP};
pub use ledger::{ActionLedger, DeactivateOutcome};
pub use progression::{record_round_outcome, ProgressionOutcome, RoundWins};
pub use score::{compute_score, count_penalties, ScoreBoard};
