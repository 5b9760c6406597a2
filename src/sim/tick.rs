//! Per-frame simulation tick
//!
//! One tick runs the whole pipeline in a fixed order:
//! physics -> obstacle field -> collision (unless immune) -> scoring.

use super::collision::detect_collision;
use super::field::advance_field;
use super::physics;
use super::state::{GameEvent, GameState, RunPhase};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (click/tap/space) received since the previous tick
    pub flap: bool,
}

/// Advance the game state by one frame. `now_ms` is the wall-clock time of
/// the frame, used by the immunity window and the score throttle.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    // Only an active run simulates; flaps outside one are dropped
    if !state.is_playing() {
        return;
    }

    if state.phase == RunPhase::Immune && !state.immunity.is_immune(now_ms) {
        state.phase = RunPhase::Playing;
        state.push_event(GameEvent::ImmunityEnded);
        log::info!("Immunity ended after {} ticks", state.ticks);
    }

    state.ticks += 1;

    if input.flap {
        physics::flap(&mut state.actor, state.tuning.flap_impulse);
    }
    physics::integrate(&mut state.actor, state.tuning.gravity);

    if let Some(top_height) = advance_field(&mut state.obstacles, &state.tuning, &mut state.rng) {
        log::debug!("Spawned rug with top height {:.1}", top_height);
        state.push_event(GameEvent::ObstacleSpawned { top_height });
    }

    if state.phase == RunPhase::Playing {
        if let Some(cause) =
            detect_collision(&state.actor, &state.obstacles, state.tuning.field_height)
        {
            state.end(cause);
            return;
        }
    }

    let actor_x = state.actor.x;
    if state.score.credit_passed(&mut state.obstacles, actor_x) > 0 {
        let total = state.score.total();
        state.push_event(GameEvent::Scored { total });
    }
    state.score.sync(now_ms);
}
