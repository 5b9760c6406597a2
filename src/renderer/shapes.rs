//! Shape generation for 2D primitives
//!
//! Everything here works in field coordinates (origin top-left, y down)
//! and emits triangle lists.

use glam::Vec2;
use std::f32::consts::PI;

use super::frame::{ActorSprite, ObstacleSprite, RenderFrame};
use super::vertex::{Vertex, colors};

/// Distance between rug stripes
pub const STRIPE_SPACING: f32 = 20.0;
pub const STRIPE_THICKNESS: f32 = 4.0;
const RUG_SHADOW_OFFSET: f32 = 5.0;
const ELLIPSE_SEGMENTS: u32 = 32;

/// Score digit cell size and position
const DIGIT_WIDTH: f32 = 28.0;
const DIGIT_HEIGHT: f32 = 48.0;
const DIGIT_SPACING: f32 = 8.0;
const SCORE_TOP: f32 = 14.0;
const SCORE_OUTLINE_OFFSET: f32 = 2.0;

/// Axis-aligned quad with one color per corner (top-left, top-right,
/// bottom-left, bottom-right)
pub fn quad(min: Vec2, max: Vec2, corners: [[f32; 4]; 4]) -> Vec<Vertex> {
    let [tl, tr, bl, br] = corners;
    vec![
        Vertex::new(min.x, min.y, tl),
        Vertex::new(max.x, min.y, tr),
        Vertex::new(min.x, max.y, bl),
        Vertex::new(min.x, max.y, bl),
        Vertex::new(max.x, min.y, tr),
        Vertex::new(max.x, max.y, br),
    ]
}

/// Solid rectangle from its top-left corner
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    if w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }
    quad(
        Vec2::new(x, y),
        Vec2::new(x + w, y + h),
        [color; 4],
    )
}

/// Vertical sky gradient over the whole field
pub fn background(width: f32, height: f32) -> Vec<Vertex> {
    quad(
        Vec2::ZERO,
        Vec2::new(width, height),
        [colors::SKY_TOP, colors::SKY_TOP, colors::SKY_BOTTOM, colors::SKY_BOTTOM],
    )
}

/// One rug segment spanning `y0..y1`: edge-center-edge horizontal gradient
/// with gold stripes every [`STRIPE_SPACING`] from `y0`
pub fn rug_segment(x: f32, width: f32, y0: f32, y1: f32) -> Vec<Vertex> {
    if y1 <= y0 {
        return Vec::new();
    }
    let mid = x + width / 2.0;
    let (edge, center) = (colors::RUG_EDGE, colors::RUG_CENTER);

    let mut vertices = rect(x, y0 + RUG_SHADOW_OFFSET, width, y1 - y0, colors::RUG_SHADOW);
    vertices.extend(quad(
        Vec2::new(x, y0),
        Vec2::new(mid, y1),
        [edge, center, edge, center],
    ));
    vertices.extend(quad(
        Vec2::new(mid, y0),
        Vec2::new(x + width, y1),
        [center, edge, center, edge],
    ));
    vertices.extend(stripes(x, width, y0, y1));
    vertices
}

/// Horizontal stripes centered on `y0, y0 + 20, ...` below `y1`, clipped
/// to the segment
pub fn stripes(x: f32, width: f32, y0: f32, y1: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let half = STRIPE_THICKNESS / 2.0;
    let mut y = y0;
    while y < y1 {
        let top = (y - half).max(y0);
        let bottom = (y + half).min(y1);
        vertices.extend(rect(x, top, width, bottom - top, colors::RUG_STRIPE));
        y += STRIPE_SPACING;
    }
    vertices
}

/// Top and bottom rug of one obstacle
pub fn obstacle(sprite: &ObstacleSprite, field_height: f32) -> Vec<Vertex> {
    let mut vertices = rug_segment(sprite.x, sprite.width, 0.0, sprite.top_height);
    vertices.extend(rug_segment(
        sprite.x,
        sprite.width,
        sprite.gap_end,
        field_height,
    ));
    vertices
}

/// Filled ellipse around `center`, rotated by `rotation` radians
/// (clockwise on screen, since y points down)
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rot = Vec2::from_angle(rotation);
    let point =
        |theta: f32| center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()));

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = point(theta1);
        let p2 = point(theta2);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Penguin: black body with a white belly shifted 5 units toward its feet,
/// both rotated about the sprite center
pub fn penguin(sprite: &ActorSprite) -> Vec<Vertex> {
    let (cx, cy) = sprite.center();
    let center = Vec2::new(cx, cy);
    let rotation = sprite.rotation_deg.to_radians();
    let belly_center = center + Vec2::from_angle(rotation).rotate(Vec2::new(0.0, 5.0));

    let mut vertices = ellipse(
        center,
        Vec2::new(sprite.width / 2.0, sprite.height / 2.0),
        rotation,
        colors::faded(colors::PENGUIN_BODY, sprite.alpha),
        ELLIPSE_SEGMENTS,
    );
    vertices.extend(ellipse(
        belly_center,
        Vec2::new(sprite.width / 3.0, sprite.height / 3.0),
        rotation,
        colors::faded(colors::PENGUIN_BELLY, sprite.alpha),
        ELLIPSE_SEGMENTS,
    ));
    vertices
}

/// Lit segments for a decimal digit:
/// [top, top-left, top-right, middle, bottom-left, bottom-right, bottom]
pub fn segments_for_digit(digit: u32) -> [bool; 7] {
    match digit {
        0 => [true, true, true, false, true, true, true],
        1 => [false, false, true, false, false, true, false],
        2 => [true, false, true, true, true, false, true],
        3 => [true, false, true, true, false, true, true],
        4 => [false, true, true, true, false, true, false],
        5 => [true, true, false, true, false, true, true],
        6 => [true, true, false, true, true, true, true],
        7 => [true, false, true, false, false, true, false],
        8 => [true; 7],
        9 => [true, true, true, true, false, true, true],
        _ => [false; 7],
    }
}

/// One seven-segment digit in the `w` x `h` cell at `origin`
pub fn digit(value: u32, origin: Vec2, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    let lit = segments_for_digit(value);
    let bar = w * 0.18;
    let horizontal_width = w - 2.0 * bar;
    let vertical_height = (h - 3.0 * bar) / 2.0;

    let left = origin.x;
    let right = origin.x + w - bar;
    let inner = origin.x + bar;
    let top = origin.y;
    let middle = origin.y + bar + vertical_height;
    let bottom = origin.y + h - bar;

    // (x, y, width, height) per segment, same order as `segments_for_digit`
    let boxes = [
        (inner, top, horizontal_width, bar),
        (left, top + bar, bar, vertical_height),
        (right, top + bar, bar, vertical_height),
        (inner, middle, horizontal_width, bar),
        (left, middle + bar, bar, vertical_height),
        (right, middle + bar, bar, vertical_height),
        (inner, bottom, horizontal_width, bar),
    ];

    let mut vertices = Vec::new();
    for (on, (x, y, bw, bh)) in lit.iter().zip(boxes) {
        if *on {
            vertices.extend(rect(x, y, bw, bh, color));
        }
    }
    vertices
}

/// Width of `score` rendered as digits
pub fn score_width(score: u32) -> f32 {
    let n = score.to_string().len() as f32;
    n * DIGIT_WIDTH + (n - 1.0) * DIGIT_SPACING
}

/// Score centered horizontally near the top, with a soft outline
pub fn score(value: u32, field_width: f32) -> Vec<Vertex> {
    let start_x = field_width / 2.0 - score_width(value) / 2.0;
    let mut vertices = Vec::new();

    for (offset, color) in [
        (SCORE_OUTLINE_OFFSET, colors::SCORE_OUTLINE),
        (0.0, colors::SCORE),
    ] {
        let mut x = start_x + offset;
        for ch in value.to_string().chars() {
            let d = ch.to_digit(10).unwrap_or(0);
            vertices.extend(digit(
                d,
                Vec2::new(x, SCORE_TOP + offset),
                DIGIT_WIDTH,
                DIGIT_HEIGHT,
                color,
            ));
            x += DIGIT_WIDTH + DIGIT_SPACING;
        }
    }
    vertices
}

/// Full frame: background, rugs, penguin, score
pub fn frame_vertices(frame: &RenderFrame) -> Vec<Vertex> {
    let mut vertices = background(frame.field_width, frame.field_height);
    for sprite in &frame.obstacles {
        vertices.extend(obstacle(sprite, frame.field_height));
    }
    vertices.extend(penguin(&frame.actor));
    vertices.extend(score(frame.score, frame.field_width));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    fn sprite(rotation_deg: f32, alpha: f32) -> ActorSprite {
        ActorSprite {
            x: 100.0,
            y: 300.0,
            width: 50.0,
            height: 50.0,
            rotation_deg,
            alpha,
        }
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(10.0, 20.0, 30.0, 40.0, colors::SCORE);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
        assert!(rect(0.0, 0.0, 0.0, 10.0, colors::SCORE).is_empty());
    }

    #[test]
    fn test_stripes_every_twenty_units() {
        // 0, 20, 40, 60, 80
        assert_eq!(stripes(0.0, 80.0, 0.0, 100.0).len(), 5 * 6);
        // 350, 370, ..., 590
        assert_eq!(stripes(0.0, 80.0, 350.0, 600.0).len(), 13 * 6);
        let (min, max) = bounds(&stripes(0.0, 80.0, 350.0, 600.0));
        assert_eq!(min.y, 350.0);
        assert_eq!(max.y, 592.0);
    }

    #[test]
    fn test_obstacle_leaves_gap_clear() {
        let sprite = ObstacleSprite {
            x: 400.0,
            width: 80.0,
            top_height: 100.0,
            gap_end: 350.0,
        };
        let v = obstacle(&sprite, 600.0);
        let in_gap = v
            .iter()
            .filter(|v| v.position[1] > 100.0 + RUG_SHADOW_OFFSET && v.position[1] < 350.0)
            .count();
        assert_eq!(in_gap, 0);
    }

    #[test]
    fn test_penguin_rotation_and_alpha() {
        let upright = penguin(&sprite(0.0, 1.0));
        let (min, max) = bounds(&upright);
        assert!((min.x - 100.0).abs() < 0.01 && (max.x - 150.0).abs() < 0.01);
        assert!((min.y - 300.0).abs() < 0.01 && (max.y - 350.0).abs() < 0.01);

        // Belly hangs below center before rotation, to the left after 90 degrees
        let belly = |v: &[Vertex]| Vec2::from(v[ELLIPSE_SEGMENTS as usize * 3].position);
        assert!((belly(&upright) - Vec2::new(125.0, 330.0)).length() < 0.01);
        let turned = penguin(&sprite(90.0, 1.0));
        assert!((belly(&turned) - Vec2::new(120.0, 325.0)).length() < 0.01);

        let faded = penguin(&sprite(0.0, 0.5));
        assert!(faded.iter().all(|v| v.color[3] == 0.5));
    }

    #[test]
    fn test_seven_segment_digits() {
        assert_eq!(digit(1, Vec2::ZERO, 28.0, 48.0, colors::SCORE).len(), 2 * 6);
        assert_eq!(digit(8, Vec2::ZERO, 28.0, 48.0, colors::SCORE).len(), 7 * 6);
        let (min, max) = bounds(&digit(8, Vec2::ZERO, 28.0, 48.0, colors::SCORE));
        assert_eq!(min, Vec2::ZERO);
        assert!((max - Vec2::new(28.0, 48.0)).length() < 1e-4);
    }

    #[test]
    fn test_score_is_centered() {
        let v: Vec<Vertex> = score(88, 800.0)
            .into_iter()
            .filter(|v| v.color == colors::SCORE)
            .collect();
        let (min, max) = bounds(&v);
        assert!(((min.x + max.x) / 2.0 - 400.0).abs() < 1e-3);
        assert_eq!(score_width(0), DIGIT_WIDTH);
    }

    #[test]
    fn test_frame_draw_order() {
        let frame = RenderFrame {
            field_width: 800.0,
            field_height: 600.0,
            actor: sprite(0.0, 1.0),
            obstacles: vec![],
            score: 3,
            immune: false,
        };
        let v = frame_vertices(&frame);
        // Background first, score last
        assert_eq!(v[0].color, colors::SKY_TOP);
        assert_eq!(v.last().map(|v| v.color), Some(colors::SCORE));
    }
}
