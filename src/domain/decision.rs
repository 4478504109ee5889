//! Round decision categories.

use serde::{Deserialize, Serialize};

/// How a round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VictoryDecision {
    Knockout,
    TechnicalKnockout,
    Disqualification,
    PointGap,
    PunitiveDeclaration,
    FinalScore,
    SuperiorityDecision,
    Referee,
}

impl VictoryDecision {
    /// Direct victories end the fight immediately, whatever the round count.
    pub fn is_direct_victory(&self) -> bool {
        matches!(
            self,
            VictoryDecision::Knockout
                | VictoryDecision::TechnicalKnockout
                | VictoryDecision::Disqualification
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VictoryDecision::Knockout => "Knockout",
            VictoryDecision::TechnicalKnockout => "Technical Knockout",
            VictoryDecision::Disqualification => "Disqualification",
            VictoryDecision::PointGap => "Point Gap",
            VictoryDecision::PunitiveDeclaration => "Punitive Declaration",
            VictoryDecision::FinalScore => "Final Score",
            VictoryDecision::SuperiorityDecision => "Superiority Decision",
            VictoryDecision::Referee => "Referee Decision",
        }
    }
}

impl std::fmt::Display for VictoryDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
