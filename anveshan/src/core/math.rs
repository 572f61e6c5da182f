//! Angle utilities and easing curves.
//!
//! All angles are in radians unless the name says otherwise.

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Golden angle in radians, used to spread candidates around a circle.
pub const GOLDEN_ANGLE: f32 = 2.399_963;

/// Cubic ease-in: maps [0,1] to [0,1] with most of the mass near 0.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Time-derived rotation phase in [0, 2π).
///
/// Successive calls a fraction of a second apart produce different phases so
/// sampling patterns do not repeat.
#[inline]
pub fn rotating_phase(elapsed_secs: f32) -> f32 {
    let turns = elapsed_secs * 0.618_034;
    (turns - turns.floor()) * TWO_PI
}
