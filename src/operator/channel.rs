//! Operator reached over a channel, for UIs that answer prompts
//! asynchronously.
//!
//! Each prompt is sent as a [`PromptRequest`] carrying a oneshot reply slot.
//! Dropping the reply slot without sending is a dismissal.

use super::{HitCounts, OperatorError, OperatorInput, Prompt};
use crate::domain::{FighterColor, Seconds};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Which question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    RoundDuration { round_number: u32 },
    HitCounts { round_number: u32 },
    PauseDuration { round_number: u32 },
    RefereeWinner { round_number: u32 },
    EndedByTime { round_number: u32 },
    VideoReplayOutcome { requested_by: FighterColor },
}

/// The operator's answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptAnswer {
    Secs(u32),
    Hits(HitCounts),
    Pause(Seconds),
    Color(FighterColor),
    Flag(bool),
}

#[derive(Debug)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub reply: oneshot::Sender<PromptAnswer>,
}

#[derive(Debug, Clone)]
pub struct ChannelOperator {
    requests: mpsc::Sender<PromptRequest>,
}

impl ChannelOperator {
    /// Create an operator and the receiving end the UI drains.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PromptRequest>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { requests: tx }, rx)
    }

    async fn ask(&self, kind: PromptKind) -> Result<Prompt<PromptAnswer>, OperatorError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(PromptRequest { kind, reply })
            .await
            .map_err(|_| OperatorError::Disconnected)?;
        // A dropped reply slot means the prompt was closed unanswered.
        Ok(Prompt::from_option(response.await.ok()))
    }
}

fn expect<T>(
    answer: Prompt<PromptAnswer>,
    pick: impl FnOnce(PromptAnswer) -> Option<T>,
) -> Result<Prompt<T>, OperatorError> {
    match answer {
        Prompt::Dismissed => Ok(Prompt::Dismissed),
        Prompt::Answered(a) => pick(a)
            .map(Prompt::Answered)
            .ok_or_else(|| OperatorError::UnexpectedAnswer(format!("{:?}", a))),
    }
}

#[async_trait]
impl OperatorInput for ChannelOperator {
    async fn round_duration(&self, round_number: u32) -> Result<Prompt<u32>, OperatorError> {
        let answer = self.ask(PromptKind::RoundDuration { round_number }).await?;
        expect(answer, |a| match a {
            PromptAnswer::Secs(secs) => Some(secs),
            _ => None,
        })
    }

    async fn hit_counts(&self, round_number: u32) -> Result<Prompt<HitCounts>, OperatorError> {
        let answer = self.ask(PromptKind::HitCounts { round_number }).await?;
        expect(answer, |a| match a {
            PromptAnswer::Hits(hits) => Some(hits),
            _ => None,
        })
    }

    async fn pause_duration(&self, round_number: u32) -> Result<Prompt<Seconds>, OperatorError> {
        let answer = self.ask(PromptKind::PauseDuration { round_number }).await?;
        expect(answer, |a| match a {
            PromptAnswer::Pause(secs) => Some(secs),
            _ => None,
        })
    }

    async fn referee_winner(&self, round_number: u32) -> Result<Prompt<FighterColor>, OperatorError> {
        let answer = self.ask(PromptKind::RefereeWinner { round_number }).await?;
        expect(answer, |a| match a {
            PromptAnswer::Color(color) => Some(color),
            _ => None,
        })
    }

    async fn ended_by_time(&self, round_number: u32) -> Result<Prompt<bool>, OperatorError> {
        let answer = self.ask(PromptKind::EndedByTime { round_number }).await?;
        expect(answer, |a| match a {
            PromptAnswer::Flag(flag) => Some(flag),
            _ => None,
        })
    }

    async fn video_replay_outcome(
        &self,
        requested_by: FighterColor,
    ) -> Result<Prompt<bool>, OperatorError> {
        let answer = self
            .ask(PromptKind::VideoReplayOutcome { requested_by })
            .await?;
        expect(answer, |a| match a {
            PromptAnswer::Flag(flag) => Some(flag),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answered_prompt() {
        let (operator, mut rx) = ChannelOperator::new(4);
        let ui = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            assert_eq!(request.kind, PromptKind::RefereeWinner { round_number: 2 });
            request.reply.send(PromptAnswer::Color(FighterColor::Red)).unwrap();
        });

        let answer = operator.referee_winner(2).await.unwrap();
        assert_eq!(answer, Prompt::Answered(FighterColor::Red));
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_reply_is_dismissal() {
        let (operator, mut rx) = ChannelOperator::new(4);
        let ui = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            drop(request.reply);
        });

        assert_eq!(operator.pause_duration(1).await.unwrap(), Prompt::Dismissed);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_channel_is_disconnected() {
        let (operator, rx) = ChannelOperator::new(1);
        drop(rx);
        assert_eq!(
            operator.ended_by_time(1).await.unwrap_err(),
            OperatorError::Disconnected
        );
    }

    #[tokio::test]
    async fn test_wrong_answer_kind() {
        let (operator, mut rx) = ChannelOperator::new(1);
        let ui = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            request.reply.send(PromptAnswer::Flag(true)).unwrap();
        });

        assert!(matches!(
            operator.hit_counts(1).await,
            Err(OperatorError::UnexpectedAnswer(_))
        ));
        ui.await.unwrap();
    }
}
