// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Math helpers covering scalar utilities, 3D vectors, rotation matrices and
//! quaternions.

use std::f64::consts::TAU;

mod mat3;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use quat::Quat;
pub use vec3::Vec3;

/// Threshold below which lengths, denominators and cosines are treated as zero.
pub const SMALL: f64 = 1e-12;

/// Sentinel magnitude used to build inverted (empty) bounding boxes.
pub const LARGE: f64 = 1e10;

/// Clamps `value` to the inclusive `[min, max]` range.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max, "invalid clamp range: {min} > {max}");
    value.max(min).min(max)
}

/// Converts degrees to radians.
pub fn deg_to_rad(value: f64) -> f64 {
    value * (TAU / 360.0)
}

/// Converts radians to degrees.
pub fn rad_to_deg(value: f64) -> f64 {
    value * (360.0 / TAU)
}
