//! Match clock derived from the video clock.
//!
//! The match clock counts down from the round's time limit. Elapsed time is
//! the video position past the round's start anchor, minus operator-entered
//! pauses.

use crate::domain::{Round, Seconds};

/// Match time elapsed at `video_now`, never negative.
pub fn elapsed(round: &Round, video_now: Seconds) -> Seconds {
    let raw = video_now - round.start_time - round.paused_secs;
    raw.clamp(Seconds::ZERO, Seconds::new(f64::MAX))
}

/// Match time remaining at `video_now`, within `[0, time_limit]`.
pub fn remaining(round: &Round, video_now: Seconds) -> Seconds {
    (round.round_time_limit - elapsed(round, video_now)).clamp(Seconds::ZERO, round.round_time_limit)
}

pub fn is_expired(round: &Round, video_now: Seconds) -> bool {
    remaining(round, video_now) <= Seconds::ZERO
}
