//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can load alternative
//! values from JSON. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,

    pub gravity: f32,
    pub flap_impulse: f32,

    pub actor_x: f32,
    pub actor_width: f32,
    pub actor_height: f32,

    pub obstacle_width: f32,
    pub obstacle_gap: f32,
    pub scroll_speed: f32,
    pub spawn_spacing: f32,
    pub spawn_top_margin: f32,
    pub spawn_bottom_margin: f32,

    pub immunity_ms: f64,
    pub score_publish_interval_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            actor_x: ACTOR_X,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            scroll_speed: SCROLL_SPEED,
            spawn_spacing: SPAWN_SPACING,
            spawn_top_margin: SPAWN_TOP_MARGIN,
            spawn_bottom_margin: SPAWN_BOTTOM_MARGIN,
            immunity_ms: IMMUNITY_MS,
            score_publish_interval_ms: SCORE_PUBLISH_INTERVAL_MS,
        }
    }
}

impl Tuning {
    /// Inclusive range the top segment height is drawn from
    pub fn spawn_range(&self) -> (f32, f32) {
        let min = self.spawn_top_margin;
        let max = self.field_height - self.obstacle_gap - self.spawn_bottom_margin;
        (min, max)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_gap", self.obstacle_gap),
            ("scroll_speed", self.scroll_speed),
            ("spawn_spacing", self.spawn_spacing),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.obstacle_gap <= self.actor_height {
            return Err(ConfigError::GapTooSmall {
                gap: self.obstacle_gap,
                actor_height: self.actor_height,
            });
        }

        let (min, max) = self.spawn_range();
        if max <= min {
            return Err(ConfigError::DegenerateSpawnRange { min, max });
        }

        Ok(())
    }

    /// Parse tuning from JSON, falling back to defaults for missing keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert_eq!(tuning.validate(), Ok(()));
        assert_eq!(tuning.spawn_range(), (50.0, 250.0));
    }

    #[test]
    fn test_degenerate_spawn_range_rejected() {
        let tuning = Tuning {
            field_height: 400.0,
            ..Default::default()
        };
        // 400 - 250 - 100 = 50, not above the 50 minimum
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::DegenerateSpawnRange { min: 50.0, max: 50.0 })
        );
    }

    #[test]
    fn test_gap_must_fit_actor() {
        let tuning = Tuning {
            obstacle_gap: 40.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::GapTooSmall { .. })));
    }

    #[test]
    fn test_non_positive_rejected() {
        let tuning = Tuning {
            scroll_speed: 0.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::NonPositive {
                field: "scroll_speed",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.obstacle_gap, OBSTACLE_GAP);
    }
}
