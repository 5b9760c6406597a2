//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as an explicit `now_ms` argument
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod immunity;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Aabb, detect_collision};
pub use field::advance_field;
pub use immunity::ImmunityGate;
pub use score::ScoreTracker;
pub use state::{Actor, Collision, GameEvent, GameState, Obstacle, RunPhase, Snapshot};
pub use tick::{TickInput, tick};
