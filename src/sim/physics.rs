//! Penguin physics: gravity, flap impulse and tilt

use super::state::Actor;
use crate::clamp_tilt;
use crate::consts::TILT_FACTOR;

/// Advance the actor by one tick.
///
/// Position moves by the velocity held at the start of the tick, and the
/// velocity picks up gravity for the next one. Tilt is a direct function
/// of the resulting velocity.
pub fn integrate(actor: &mut Actor, gravity: f32) {
    let pre_velocity = actor.velocity;
    actor.y += pre_velocity;
    actor.velocity = pre_velocity + gravity;
    // Invariant between ticks: tilt == tilt_for(velocity)
    actor.tilt = tilt_for(actor.velocity);
}

/// Replace the current velocity with the flap impulse
#[inline]
pub fn flap(actor: &mut Actor, impulse: f32) {
    actor.velocity = impulse;
}

/// Tilt in degrees for a given velocity
#[inline]
pub fn tilt_for(velocity: f32) -> f32 {
    clamp_tilt(velocity * TILT_FACTOR)
}
