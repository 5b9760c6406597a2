//! Score accrual with a throttled visible projection
//!
//! `total` is authoritative and used by all game logic. `visible` is what
//! the HUD shows; it follows `total` at most once per publish interval and
//! is forced in sync at run start and run end.

use serde::{Deserialize, Serialize};

use super::state::Obstacle;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTracker {
    total: u32,
    visible: u32,
    interval_ms: f64,
    last_publish_ms: Option<f64>,
}

impl ScoreTracker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            total: 0,
            visible: 0,
            interval_ms,
            last_publish_ms: None,
        }
    }

    /// Zero both values, publishing the zero at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.reset_counter();
        self.last_publish_ms = Some(now_ms);
    }

    /// Zero both values and clear the publish clock, so the next change
    /// publishes on the first `sync`
    pub fn reset_counter(&mut self) {
        self.total = 0;
        self.visible = 0;
        self.last_publish_ms = None;
    }

    /// Credit every unscored obstacle whose right edge is left of `actor_x`.
    /// Returns the number of points added.
    pub fn credit_passed(&mut self, obstacles: &mut [Obstacle], actor_x: f32) -> u32 {
        let mut added = 0;
        for obstacle in obstacles.iter_mut() {
            if !obstacle.scored && obstacle.right_edge() < actor_x {
                obstacle.scored = true;
                self.total += 1;
                added += 1;
            }
        }
        added
    }

    /// Publish `total` to `visible` if it differs and the interval allows.
    /// Returns true when the visible value changed.
    pub fn sync(&mut self, now_ms: f64) -> bool {
        if self.visible == self.total {
            return false;
        }
        let due = match self.last_publish_ms {
            Some(last) => now_ms - last > self.interval_ms,
            None => true,
        };
        if due {
            self.visible = self.total;
            self.last_publish_ms = Some(now_ms);
        }
        due
    }

    /// Publish unconditionally (run end)
    pub fn force_sync(&mut self) {
        self.visible = self.total;
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn visible(&self) -> u32 {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_at(x: f32) -> Obstacle {
        Obstacle::new(x, 100.0, 80.0, 250.0)
    }

    #[test]
    fn test_credits_once_per_obstacle() {
        let mut tracker = ScoreTracker::new(100.0);
        let mut obstacles = vec![obstacle_at(10.0), obstacle_at(400.0)];

        // Right edge at 90 < 100
        assert_eq!(tracker.credit_passed(&mut obstacles, 100.0), 1);
        assert!(obstacles[0].scored);
        assert!(!obstacles[1].scored);

        // Same state again: nothing new
        assert_eq!(tracker.credit_passed(&mut obstacles, 100.0), 0);
        obstacles[0].x = -50.0;
        assert_eq!(tracker.credit_passed(&mut obstacles, 100.0), 0);
        assert_eq!(tracker.total(), 1);
    }

    #[test]
    fn test_right_edge_must_be_strictly_left() {
        let mut tracker = ScoreTracker::new(100.0);
        let mut obstacles = vec![obstacle_at(20.0)];
        // Right edge exactly at actor x
        assert_eq!(tracker.credit_passed(&mut obstacles, 100.0), 0);
        obstacles[0].x = 19.5;
        assert_eq!(tracker.credit_passed(&mut obstacles, 100.0), 1);
    }

    #[test]
    fn test_visible_is_throttled() {
        let mut tracker = ScoreTracker::new(100.0);
        tracker.reset(0.0);
        let mut obstacles = vec![obstacle_at(0.0)];
        tracker.credit_passed(&mut obstacles, 100.0);

        // Too soon after the reset publish
        assert!(!tracker.sync(50.0));
        assert_eq!(tracker.visible(), 0);
        assert_eq!(tracker.total(), 1);

        assert!(tracker.sync(101.0));
        assert_eq!(tracker.visible(), 1);
    }

    #[test]
    fn test_pending_value_catches_up() {
        let mut tracker = ScoreTracker::new(100.0);
        tracker.reset(0.0);
        let mut first = vec![obstacle_at(0.0)];
        tracker.credit_passed(&mut first, 100.0);
        assert!(tracker.sync(200.0));

        let mut second = vec![obstacle_at(0.0)];
        tracker.credit_passed(&mut second, 100.0);
        assert!(!tracker.sync(250.0));
        assert_eq!(tracker.visible(), 1);

        // No further scoring, the lagging value still lands
        assert!(tracker.sync(301.0));
        assert_eq!(tracker.visible(), 2);
    }

    #[test]
    fn test_force_sync_and_reset() {
        let mut tracker = ScoreTracker::new(100.0);
        tracker.reset(0.0);
        let mut obstacles = vec![obstacle_at(0.0), obstacle_at(5.0)];
        tracker.credit_passed(&mut obstacles, 100.0);
        tracker.force_sync();
        assert_eq!(tracker.visible(), 2);

        tracker.reset(1000.0);
        assert_eq!(tracker.total(), 0);
        assert_eq!(tracker.visible(), 0);
    }

    #[test]
    fn test_reset_counter_clears_publish_clock() {
        let mut tracker = ScoreTracker::new(100.0);
        tracker.reset(1000.0);
        tracker.reset_counter();
        let mut obstacles = vec![obstacle_at(0.0)];
        tracker.credit_passed(&mut obstacles, 100.0);

        // Within the interval of the last publish, but the clock was cleared
        assert!(tracker.sync(1001.0));
        assert_eq!(tracker.visible(), 1);
    }
}
