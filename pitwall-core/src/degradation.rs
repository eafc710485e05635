//! Tire degradation model.
//!
//! Pure functions: no state, no failure modes. Grip is clamped to
//! `[0, MAX_GRIP]` on the way in so callers never need to pre-validate it.

use crate::catalog::{TireCompound, Track};

/// Grip of a freshly fitted set.
pub const MAX_GRIP: f64 = 100.0;

/// Seconds of pace lost per point of grip deficit.
pub const GRIP_PACE_FACTOR: f64 = 0.12;

/// Divides `wear * degradation` into the grip lost per lap.
pub const WEAR_DIVISOR: f64 = 4.0;

pub fn clamp_grip(grip: f64) -> f64 {
    grip.clamp(0.0, MAX_GRIP)
}

/// Lap time in seconds for the given tire condition.
pub fn lap_pace(track: &Track, tire: TireCompound, grip: f64) -> f64 {
    track.base_pace + tire.pace_penalty() + (MAX_GRIP - clamp_grip(grip)) * GRIP_PACE_FACTOR
}

/// Grip lost over one lap on this track.
pub fn grip_loss_per_lap(track: &Track, tire: TireCompound) -> f64 {
    tire.wear_rate() * track.degradation / WEAR_DIVISOR
}

/// Grip remaining after one more lap, never below zero.
pub fn next_grip(track: &Track, tire: TireCompound, grip: f64) -> f64 {
    (clamp_grip(grip) - grip_loss_per_lap(track, tire)).max(0.0)
}
