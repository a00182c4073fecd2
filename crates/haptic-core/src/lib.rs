// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! haptic-core: linear-algebra primitives shared by the haptic crates.
//!
//! Everything runs in `f64`. Haptic servo loops compare distances against
//! margins a few orders of magnitude below the workspace size, which `f32`
//! cannot resolve reliably.
#![forbid(unsafe_code)]

/// Vector, matrix and quaternion primitives.
pub mod math;

pub use math::{Mat3, Quat, Vec3, LARGE, SMALL};
