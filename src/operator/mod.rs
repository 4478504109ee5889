//! Operator-input abstraction: questions the scoring core asks a human.
//!
//! Every prompt is an asynchronous request/response pair. A prompt can be
//! answered or dismissed; dismissal resolves through [`PromptDefaults`] so the
//! match never hangs waiting on an operator.

use crate::domain::{FighterColor, Seconds};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

pub mod channel;
pub mod scripted;

pub use channel::{ChannelOperator, PromptAnswer, PromptKind, PromptRequest};
pub use scripted::ScriptedOperator;

/// Answer to a single prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<T> {
    Answered(T),
    /// The operator closed the prompt without answering.
    Dismissed,
}

impl<T> Prompt<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Prompt::Answered(v),
            None => Prompt::Dismissed,
        }
    }

    pub fn answered(self) -> Option<T> {
        match self {
            Prompt::Answered(v) => Some(v),
            Prompt::Dismissed => None,
        }
    }
}

/// Manually counted strikes for both fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitCounts {
    pub blue: u32,
    pub red: u32,
}

/// Operator input trait for the prompts the scoring core raises.
#[async_trait]
pub trait OperatorInput: Send + Sync + fmt::Debug {
    /// Round duration in seconds (60, 90 or 120).
    async fn round_duration(&self, round_number: u32) -> Result<Prompt<u32>, OperatorError>;

    /// Manual hit counts for the round being closed.
    async fn hit_counts(&self, round_number: u32) -> Result<Prompt<HitCounts>, OperatorError>;

    /// Length of a stoppage to exclude from the match clock.
    async fn pause_duration(&self, round_number: u32) -> Result<Prompt<Seconds>, OperatorError>;

    /// Referee's call when automatic rules cannot pick a winner.
    async fn referee_winner(&self, round_number: u32) -> Result<Prompt<FighterColor>, OperatorError>;

    /// Whether the round ended because the clock ran out.
    async fn ended_by_time(&self, round_number: u32) -> Result<Prompt<bool>, OperatorError>;

    /// Whether the video replay requested by `requested_by` is accepted.
    async fn video_replay_outcome(
        &self,
        requested_by: FighterColor,
    ) -> Result<Prompt<bool>, OperatorError>;
}

/// Error type for the prompt channel itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    /// The operator side of the channel is gone.
    Disconnected,
    /// The operator replied with an answer for a different prompt.
    UnexpectedAnswer(String),
    Other(String),
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorError::Disconnected => write!(f, "Operator disconnected"),
            OperatorError::UnexpectedAnswer(msg) => write!(f, "Unexpected answer: {}", msg),
            OperatorError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for OperatorError {}

/// Fallback values used when a prompt is dismissed or fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptDefaults {
    pub round_secs: u32,
    pub pause: Seconds,
    pub referee_winner: FighterColor,
}

impl Default for PromptDefaults {
    fn default() -> Self {
        Self {
            round_secs: 120,
            pause: Seconds::ZERO,
            referee_winner: FighterColor::Blue,
        }
    }
}

/// Collapse a prompt result to its answer, logging dismissals and failures.
///
/// A failed prompt is treated exactly like a dismissed one.
pub fn answer_of<T: fmt::Debug>(prompt: &str, result: Result<Prompt<T>, OperatorError>) -> Option<T> {
    match result {
        Ok(Prompt::Answered(value)) => Some(value),
        Ok(Prompt::Dismissed) => {
            info!(prompt, "Prompt dismissed, using default");
            None
        }
        Err(e) => {
            warn!(prompt, error = %e, "Prompt failed, using default");
            None
        }
    }
}
