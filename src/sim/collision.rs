//! Collision detection between the penguin and the rug field
//!
//! Everything here is a pure function of its inputs: same actor, same
//! obstacles, same field bounds, same verdict.

use glam::Vec2;

use super::state::{Actor, Collision, Obstacle};

/// Axis-aligned box in field coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Open-interval overlap on both axes (touching edges do not collide)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Hitbox of the penguin
pub fn actor_box(actor: &Actor) -> Aabb {
    Aabb::new(actor.x, actor.y, actor.width, actor.height)
}

/// Top segment: field top down to the gap start
pub fn top_box(obstacle: &Obstacle) -> Aabb {
    Aabb::new(obstacle.x, 0.0, obstacle.width, obstacle.gap_start())
}

/// Bottom segment: gap end down to the field bottom
pub fn bottom_box(obstacle: &Obstacle, field_height: f32) -> Aabb {
    let gap_end = obstacle.gap_end();
    Aabb::new(obstacle.x, gap_end, obstacle.width, field_height - gap_end)
}

/// Actor's top edge is above the field or below its bottom
pub fn out_of_bounds(actor: &Actor, field_height: f32) -> bool {
    actor.y < 0.0 || actor.y > field_height
}

/// First collision of the actor with the field bounds or any obstacle.
///
/// Bounds are checked first, then obstacles in queue order; the scan stops
/// at the first hit.
pub fn detect_collision(
    actor: &Actor,
    obstacles: &[Obstacle],
    field_height: f32,
) -> Option<Collision> {
    if out_of_bounds(actor, field_height) {
        return Some(Collision::OutOfBounds);
    }

    let hitbox = actor_box(actor);
    for obstacle in obstacles {
        if hitbox.overlaps(&top_box(obstacle)) {
            return Some(Collision::TopObstacle);
        }
        if hitbox.overlaps(&bottom_box(obstacle, field_height)) {
            return Some(Collision::BottomObstacle);
        }
    }
    None
}
