//! Action type representing a single scoring-relevant event in a round.

use crate::domain::{ActionId, FighterColor, Seconds, Technique, TechniqueCategory, PENALTY_POINTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Kick,
    Punch,
    Penalty,
    VideoReplayOutcome,
}

impl ActionType {
    /// Whether this type scores through a technique.
    pub fn is_strike(&self) -> bool {
        matches!(self, ActionType::Kick | ActionType::Punch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    LeftLeg,
    RightLeg,
    LeftArm,
    RightArm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Head,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Attack,
    Defense,
    Clinch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyType {
    CrossingLine,
    Falling,
    Avoiding,
    Grabbing,
    Pushing,
    KickingBelowWaist,
    RaisingKnee,
    HittingHeadWithHand,
    Misconduct,
}

/// Rejection reasons for a malformed action draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidActionShape {
    #[error("{0:?} action requires a technique")]
    MissingTechnique(ActionType),
    #[error("technique {technique:?} does not match action type {action_type:?}")]
    TechniqueMismatch {
        action_type: ActionType,
        technique: Technique,
    },
    #[error("penalty type is only valid on penalty actions")]
    UnexpectedPenaltyType,
}

/// Operator-side shape of an action before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDraft {
    pub fighter_color: FighterColor,
    pub action_type: ActionType,
    #[serde(default)]
    pub technique: Option<Technique>,
    #[serde(default)]
    pub limb_used: Option<Limb>,
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub situation: Option<Situation>,
    #[serde(default)]
    pub penalty_type: Option<PenaltyType>,
}

impl ActionDraft {
    pub fn kick(color: FighterColor, technique: Technique) -> Self {
        Self::bare(color, ActionType::Kick).with_technique(technique)
    }

    pub fn punch(color: FighterColor) -> Self {
        Self::bare(color, ActionType::Punch).with_technique(Technique::Punch)
    }

    pub fn penalty(color: FighterColor, penalty_type: Option<PenaltyType>) -> Self {
        let mut draft = Self::bare(color, ActionType::Penalty);
        draft.penalty_type = penalty_type;
        draft
    }

    pub fn bare(color: FighterColor, action_type: ActionType) -> Self {
        Self {
            fighter_color: color,
            action_type,
            technique: None,
            limb_used: None,
            zone: None,
            situation: None,
            penalty_type: None,
        }
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    /// Check the draft against the per-type shape rules.
    pub fn validate(&self) -> Result<(), InvalidActionShape> {
        if self.action_type.is_strike() {
            let technique = self
                .technique
                .ok_or(InvalidActionShape::MissingTechnique(self.action_type))?;
            let expected = match self.action_type {
                ActionType::Punch => TechniqueCategory::Punch,
                _ => TechniqueCategory::Kick,
            };
            if technique.category() != expected {
                return Err(InvalidActionShape::TechniqueMismatch {
                    action_type: self.action_type,
                    technique,
                });
            }
        }
        if self.penalty_type.is_some() && self.action_type != ActionType::Penalty {
            return Err(InvalidActionShape::UnexpectedPenaltyType);
        }
        Ok(())
    }
}

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,
    pub fighter_color: FighterColor,
    pub action_type: ActionType,
    pub technique: Option<Technique>,
    pub limb_used: Option<Limb>,
    pub zone: Option<Zone>,
    /// Match clock reading (seconds remaining) when the action happened.
    pub match_clock_timestamp: Seconds,
    /// Position in the source video.
    pub video_timestamp: Seconds,
    pub situation: Option<Situation>,
    pub penalty_type: Option<PenaltyType>,
    pub active: bool,
}

impl Action {
    /// Validate a draft and stamp it with clock readings and a fresh id.
    pub fn from_draft(
        draft: ActionDraft,
        match_clock_timestamp: Seconds,
        video_timestamp: Seconds,
    ) -> Result<Self, InvalidActionShape> {
        draft.validate()?;
        // Kick/punch carry a technique by now; other types never do.
        let technique = if draft.action_type.is_strike() {
            draft.technique
        } else {
            None
        };
        Ok(Action {
            id: ActionId::new(),
            fighter_color: draft.fighter_color,
            action_type: draft.action_type,
            technique,
            limb_used: draft.limb_used,
            zone: draft.zone,
            match_clock_timestamp,
            video_timestamp,
            situation: draft.situation,
            penalty_type: draft.penalty_type,
            active: true,
        })
    }

    /// Points this action is worth, before attribution.
    pub fn points(&self) -> u32 {
        match self.action_type {
            ActionType::Kick | ActionType::Punch => {
                self.technique.map(|t| t.points()).unwrap_or(0)
            }
            ActionType::Penalty => PENALTY_POINTS,
            ActionType::VideoReplayOutcome => 0,
        }
    }

    /// The color whose score this action's points are added to.
    pub fn credited_to(&self) -> FighterColor {
        match self.action_type {
            ActionType::Penalty => self.fighter_color.opponent(),
            _ => self.fighter_color,
        }
    }

    /// Technique of a kick or punch; `None` for every other type.
    pub fn strike_technique(&self) -> Option<Technique> {
        if self.action_type.is_strike() {
            self.technique
        } else {
            None
        }
    }
}
