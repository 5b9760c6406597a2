//! Game state and core simulation types
//!
//! `GameState` is owned by the simulation loop for the whole run. Anything
//! outside the loop reads a [`Snapshot`] copy instead.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::immunity::ImmunityGate;
use super::score::ScoreTracker;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for a start request
    Idle,
    /// Playing, collisions suppressed by the immunity window
    Immune,
    /// Active gameplay
    Playing,
    /// Run ended by a collision
    Ended,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    TopObstacle,
    BottomObstacle,
    OutOfBounds,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    ImmunityEnded,
    ObstacleSpawned { top_height: f32 },
    Scored { total: u32 },
    RunEnded { final_score: u32, cause: Collision },
}

/// The penguin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Field-relative top edge (origin top, y grows downward)
    pub y: f32,
    /// Units per tick, positive = falling
    pub velocity: f32,
    /// Visual tilt in degrees, derived from velocity every tick
    pub tilt: f32,
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Actor {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            y: tuning.field_height / 2.0,
            velocity: 0.0,
            tilt: 0.0,
            x: tuning.actor_x,
            width: tuning.actor_width,
            height: tuning.actor_height,
        }
    }
}

/// A rug pair: top segment from the field top to `top_height`, bottom
/// segment from `top_height + gap` to the field bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub top_height: f32,
    pub width: f32,
    pub gap: f32,
    /// Already credited to the score
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, top_height: f32, width: f32, gap: f32) -> Self {
        Self {
            x,
            top_height,
            width,
            gap,
            scored: false,
        }
    }

    #[inline]
    pub fn gap_start(&self) -> f32 {
        self.top_height
    }

    #[inline]
    pub fn gap_end(&self) -> f32 {
        self.top_height + self.gap
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Published, read-only view of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RunPhase,
    /// Throttled score projection
    pub score: u32,
    pub playing: bool,
    pub ended: bool,
    pub immune: bool,
    pub ticks: u64,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed of the current run
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub actor: Actor,
    /// Spawn order == left-to-right order
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreTracker,
    pub immunity: ImmunityGate,
    /// Ticks simulated in the current run
    pub ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state. Tuning is expected to be validated already.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let actor = Actor::new(&tuning);
        let score = ScoreTracker::new(tuning.score_publish_interval_ms);
        let immunity = ImmunityGate::new(tuning.immunity_ms);
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Idle,
            actor,
            obstacles: Vec::new(),
            score,
            immunity,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// Idle/Ended -> Immune. Resets actor, obstacles and score and arms
    /// the immunity gate at `now_ms`. Returns false if a run is active.
    pub fn start(&mut self, now_ms: f64, seed: u64) -> bool {
        if self.is_playing() {
            return false;
        }
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.actor = Actor::new(&self.tuning);
        self.obstacles.clear();
        self.score.reset(now_ms);
        self.immunity.arm(now_ms);
        self.ticks = 0;
        self.phase = RunPhase::Immune;
        self.push_event(GameEvent::RunStarted { seed });
        log::info!("Run started (seed {})", seed);
        true
    }

    /// Any phase -> Idle
    pub fn reset(&mut self) {
        self.phase = RunPhase::Idle;
        self.actor = Actor::new(&self.tuning);
        self.obstacles.clear();
        self.score.reset_counter();
        self.immunity.disarm();
    }

    /// Active -> Ended, force-syncing the visible score
    pub fn end(&mut self, cause: Collision) {
        if !self.is_playing() {
            return;
        }
        self.phase = RunPhase::Ended;
        self.score.force_sync();
        let final_score = self.score.total();
        self.push_event(GameEvent::RunEnded { final_score, cause });
        log::info!("Run ended: {:?}, score {}", cause, final_score);
    }

    /// Immune or Playing
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, RunPhase::Immune | RunPhase::Playing)
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RunPhase::Ended
    }

    pub fn is_immune(&self) -> bool {
        self.phase == RunPhase::Immune
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score.visible(),
            playing: self.is_playing(),
            ended: self.is_ended(),
            immune: self.is_immune(),
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(Tuning::default(), 1);
        assert_eq!(state.phase, RunPhase::Idle);
        assert!(!state.is_playing());
        assert!(!state.is_ended());
        assert_eq!(state.actor.y, 300.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.actor.y = 12.0;
        state.actor.velocity = 5.0;
        state.obstacles.push(Obstacle::new(10.0, 100.0, 80.0, 250.0));

        assert!(state.start(1000.0, 42));
        assert_eq!(state.phase, RunPhase::Immune);
        assert_eq!(state.actor.y, 300.0);
        assert_eq!(state.actor.velocity, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score.total(), 0);
        assert_eq!(state.snapshot().score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted { seed: 42 }]);

        // Second start while running is refused
        assert!(!state.start(1001.0, 43));
        assert_eq!(state.seed, 42);
    }

    #[test]
    fn test_end_only_from_active_run() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.end(Collision::OutOfBounds);
        assert_eq!(state.phase, RunPhase::Idle);

        state.start(0.0, 1);
        state.end(Collision::TopObstacle);
        assert!(state.is_ended());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_obstacle_gap_bounds() {
        let obstacle = Obstacle::new(500.0, 120.0, 80.0, 250.0);
        assert_eq!(obstacle.gap_start(), 120.0);
        assert_eq!(obstacle.gap_end(), 370.0);
        assert_eq!(obstacle.right_edge(), 580.0);
    }
}
