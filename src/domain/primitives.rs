//! Domain primitives: FighterColor, FighterId, FightId, ActionId, Seconds.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Corner color of a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FighterColor {
    Blue,
    Red,
}

impl FighterColor {
    /// The other corner.
    pub fn opponent(&self) -> Self {
        match self {
            FighterColor::Blue => FighterColor::Red,
            FighterColor::Red => FighterColor::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FighterColor::Blue => "blue",
            FighterColor::Red => "red",
        }
    }
}

impl std::fmt::Display for FighterColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fighter color: {0}")]
pub struct ColorParseError(pub String);

impl FromStr for FighterColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(FighterColor::Blue),
            "red" => Ok(FighterColor::Red),
            other => Err(ColorParseError(other.to_string())),
        }
    }
}

/// Opaque fighter identifier owned by the roster system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FighterId(pub String);

impl FighterId {
    pub fn new(id: impl Into<String>) -> Self {
        FighterId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FighterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fight identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FightId(pub Uuid);

impl FightId {
    pub fn new() -> Self {
        FightId(Uuid::new_v4())
    }
}

impl Default for FightId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FightId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(FightId)
    }
}

/// Ledger entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub Uuid);

impl ActionId {
    pub fn new() -> Self {
        ActionId(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ActionId)
    }
}

/// A clock reading in seconds (video position or match clock).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);

impl Seconds {
    pub const ZERO: Seconds = Seconds(0.0);

    pub fn new(secs: f64) -> Self {
        Seconds(secs)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Clamp into `[min, max]`; NaN collapses to `min`.
    pub fn clamp(self, min: Seconds, max: Seconds) -> Seconds {
        if self.0.is_nan() || self.0 < min.0 {
            min
        } else if self.0 > max.0 {
            max
        } else {
            self
        }
    }
}

impl std::ops::Add for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Seconds {
    type Output = Seconds;

    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s", self.0)
    }
}
