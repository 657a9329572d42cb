//! Configuration errors. Raised once at load or engine construction, never
//! mid-simulation.

use std::fmt;

use crate::enums::AttackKind;

#[derive(Debug)]
pub enum ConfigError {
    /// A numeric field that must be strictly positive was not.
    NonPositive { field: &'static str, value: f32 },
    /// A numeric field that may be zero but not negative (or NaN) was.
    Negative { field: &'static str, value: f32 },
    /// An attack's hit window is not within `0 <= start < end <= 1`.
    InvalidHitWindow {
        kind: AttackKind,
        start: f32,
        end: f32,
    },
    /// An attack deals no damage.
    ZeroDamage { kind: AttackKind },
    /// The arena cannot hold both actors side by side.
    ArenaTooNarrow { arena_width: f32, actor_width: f32 },
    /// Max health must be at least one.
    ZeroHealth,
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must be zero or positive, got {value}")
            }
            Self::InvalidHitWindow { kind, start, end } => write!(
                f,
                "{kind:?} hit window [{start}, {end}] must satisfy 0 <= start < end <= 1"
            ),
            Self::ZeroDamage { kind } => write!(f, "{kind:?} must deal at least 1 damage"),
            Self::ArenaTooNarrow {
                arena_width,
                actor_width,
            } => write!(
                f,
                "arena width {arena_width} cannot fit two actors of width {actor_width}"
            ),
            Self::ZeroHealth => write!(f, "max_health must be at least 1"),
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
