//! Video replay (IVR) challenge record.

use crate::domain::{FighterColor, Seconds};
use serde::{Deserialize, Serialize};

/// A resolved replay challenge attached to the round it was raised in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReplay {
    pub requested_by_color: FighterColor,
    pub match_clock_timestamp: Seconds,
    pub was_accepted: bool,
}
