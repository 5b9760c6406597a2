//! Error types for the edges of the game (tuning, run start, leaderboard)
//!
//! The simulation itself cannot fail on finite inputs; these only cover
//! configuration and the external collaborators.

use std::fmt;

/// Invalid tuning values
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Obstacle spawn range `[min, max]` is empty or a single point
    DegenerateSpawnRange { min: f32, max: f32 },
    /// A dimension or rate that must be strictly positive is not
    NonPositive { field: &'static str, value: f32 },
    /// Actor cannot fit through the gap
    GapTooSmall { gap: f32, actor_height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateSpawnRange { min, max } => {
                write!(f, "degenerate obstacle spawn range: [{min}, {max}]")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::GapTooSmall { gap, actor_height } => write!(
                f,
                "obstacle gap {gap} is not taller than the actor ({actor_height})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Reasons a start request is refused
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartError {
    /// Player name is empty after trimming
    MissingPlayerName,
    /// The start gate (payment) has not been satisfied
    GateClosed,
    /// A run is already in progress
    AlreadyRunning,
    /// The host could not schedule frames for the run
    NoFrames,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlayerName => write!(f, "a player name is required to start"),
            Self::GateClosed => write!(f, "start gate is closed (payment required)"),
            Self::AlreadyRunning => write!(f, "a run is already in progress"),
            Self::NoFrames => write!(f, "no frame scheduler available"),
        }
    }
}

impl std::error::Error for StartError {}

/// Leaderboard submission or fetch failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// Backend not available on this platform / not configured
    Unavailable,
    /// Request could not be built or sent
    Transport(String),
    /// Server answered with a non-success status
    Status(u16),
    /// Response body could not be decoded
    Decode(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "leaderboard backend unavailable"),
            Self::Transport(msg) => write!(f, "leaderboard request failed: {msg}"),
            Self::Status(code) => write!(f, "leaderboard returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "leaderboard response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ConfigError::DegenerateSpawnRange { min: 50.0, max: 20.0 };
        assert_eq!(err.to_string(), "degenerate obstacle spawn range: [50, 20]");
        assert_eq!(SubmitError::Status(503).to_string(), "leaderboard returned HTTP 503");
        assert!(StartError::GateClosed.to_string().contains("payment"));
    }
}
