//! Obstacle field: scroll, retire and spawn rugs
//!
//! The queue is kept in spawn order. Every rug spawns at the right edge and
//! all rugs move at the same speed, so spawn order is also screen order and
//! the oldest rug is always the leftmost.

use rand::Rng;

use super::state::Obstacle;
use crate::tuning::Tuning;

/// Advance all obstacles by one tick, drop the ones that scrolled off the
/// left edge and spawn at most one new obstacle.
///
/// Returns the top height of the spawned obstacle, if any.
pub fn advance_field<R: Rng + ?Sized>(
    obstacles: &mut Vec<Obstacle>,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<f32> {
    scroll(obstacles, tuning.scroll_speed);
    retire_offscreen(obstacles);

    if should_spawn(obstacles, tuning) {
        let top_height = random_top_height(tuning, rng);
        obstacles.push(Obstacle::new(
            tuning.field_width,
            top_height,
            tuning.obstacle_width,
            tuning.obstacle_gap,
        ));
        Some(top_height)
    } else {
        None
    }
}

/// Move every obstacle left by `speed`
pub fn scroll(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= speed;
    }
}

/// Remove obstacles whose right edge passed the field's left boundary.
/// Returns how many were removed.
pub fn retire_offscreen(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.x >= -o.width);
    before - obstacles.len()
}

/// Empty queue, or the newest obstacle has moved far enough from the right edge
pub fn should_spawn(obstacles: &[Obstacle], tuning: &Tuning) -> bool {
    match obstacles.last() {
        None => true,
        Some(newest) => newest.x < tuning.field_width - tuning.spawn_spacing,
    }
}

/// Uniform top segment height in the tuning's spawn range
pub fn random_top_height<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    let (min, max) = tuning.spawn_range();
    debug_assert!(max > min, "degenerate spawn range [{min}, {max}]");
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
