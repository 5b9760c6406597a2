//! Penguin Circuit - A side-scrolling flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacle field, collisions, scoring, run lifecycle)
//! - `session`: Owns a run and wires scheduler, gate and leaderboard together
//! - `scheduler`: Frame scheduling with acquire/release semantics
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod gate;
pub mod leaderboard;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StartError, SubmitError};
pub use leaderboard::{Leaderboard, ScoreRecord, ScoreSubmitter};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Downward acceleration added to velocity every tick
    pub const GRAVITY: f32 = 0.25;
    /// Velocity set by a flap (negative = up)
    pub const FLAP_IMPULSE: f32 = -8.0;

    /// Penguin defaults - fixed horizontal position, square hitbox
    pub const ACTOR_X: f32 = 100.0;
    pub const ACTOR_WIDTH: f32 = 50.0;
    pub const ACTOR_HEIGHT: f32 = 50.0;

    /// Tilt is velocity * factor, clamped to [min, max] degrees
    pub const TILT_FACTOR: f32 = 1.5;
    pub const TILT_MIN_DEG: f32 = -15.0;
    pub const TILT_MAX_DEG: f32 = 70.0;

    /// Rug (obstacle) defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const OBSTACLE_GAP: f32 = 250.0;
    /// Horizontal scroll per tick
    pub const SCROLL_SPEED: f32 = 2.5;
    /// New rug spawns once the newest one is this far from the right edge
    pub const SPAWN_SPACING: f32 = 300.0;
    /// Minimum top segment height
    pub const SPAWN_TOP_MARGIN: f32 = 50.0;
    /// Subtracted from the spawn range upper bound (bottom segment headroom)
    pub const SPAWN_BOTTOM_MARGIN: f32 = 100.0;

    /// Collision grace period after a run starts
    pub const IMMUNITY_MS: f64 = 1500.0;
    /// Minimum interval between visible score updates
    pub const SCORE_PUBLISH_INTERVAL_MS: f64 = 100.0;

    /// Number of leaderboard entries shown
    pub const LEADERBOARD_SIZE: usize = 10;
}

/// Clamp a tilt angle into the allowed range
#[inline]
pub fn clamp_tilt(degrees: f32) -> f32 {
    degrees.clamp(consts::TILT_MIN_DEG, consts::TILT_MAX_DEG)
}
