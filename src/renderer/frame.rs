//! Per-tick draw description
//!
//! Everything the drawing layer needs for one frame, in field coordinates
//! (origin top-left, y down). Built from a [`GameState`] after the tick.

use crate::sim::GameState;

/// Alpha of the penguin at `now_ms`. Pulses while immune unless reduced
/// motion is on.
pub fn actor_alpha(immune: bool, now_ms: f64, reduced_motion: bool) -> f32 {
    if !immune || reduced_motion {
        return 1.0;
    }
    0.6 + (now_ms / 100.0).sin() as f32 * 0.2
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorSprite {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, positive = nose down
    pub rotation_deg: f32,
    pub alpha: f32,
}

impl ActorSprite {
    /// Rotation pivot
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSprite {
    pub x: f32,
    pub width: f32,
    /// Top rug spans `0..top_height`
    pub top_height: f32,
    /// Bottom rug spans `gap_end..field_height`
    pub gap_end: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub field_width: f32,
    pub field_height: f32,
    pub actor: ActorSprite,
    pub obstacles: Vec<ObstacleSprite>,
    /// Authoritative score; only the HUD snapshot is throttled
    pub score: u32,
    pub immune: bool,
}

impl RenderFrame {
    pub fn from_state(state: &GameState, now_ms: f64, reduced_motion: bool) -> Self {
        let immune = state.is_immune();
        let actor = &state.actor;
        Self {
            field_width: state.tuning.field_width,
            field_height: state.tuning.field_height,
            actor: ActorSprite {
                x: actor.x,
                y: actor.y,
                width: actor.width,
                height: actor.height,
                rotation_deg: actor.tilt,
                alpha: actor_alpha(immune, now_ms, reduced_motion),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleSprite {
                    x: o.x,
                    width: o.width,
                    top_height: o.gap_start(),
                    gap_end: o.gap_end(),
                })
                .collect(),
            score: state.score.total(),
            immune,
        }
    }
}
