//! Video-clock collaborator: the scoring core reads the playback position
//! but never controls playback.

use crate::domain::Seconds;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub trait VideoClock: Send + Sync + fmt::Debug {
    /// Current playback position.
    fn current_position(&self) -> Seconds;
}

/// A clock whose position is set by whoever drives playback.
#[derive(Debug, Default)]
pub struct ManualVideoClock {
    bits: AtomicU64,
}

impl ManualVideoClock {
    pub fn at(position: Seconds) -> Self {
        Self {
            bits: AtomicU64::new(position.as_f64().to_bits()),
        }
    }

    pub fn seek(&self, position: Seconds) {
        self.bits.store(position.as_f64().to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, by: Seconds) {
        self.seek(self.current_position() + by);
    }
}

impl VideoClock for ManualVideoClock {
    fn current_position(&self) -> Seconds {
        Seconds::new(f64::from_bits(self.bits.load(Ordering::Relaxed)))
    }
}
