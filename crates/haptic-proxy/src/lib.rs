// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Constraint-based proxy force rendering.
//!
//! [`ProxyForceAlgorithm`] keeps a proxy point outside the meshes of a
//! [`haptic_geom::CollisionWorld`] while it chases the haptic device, and
//! renders a spring force between the two. [`ServoLoop`] wires an algorithm
//! to a [`HapticDevice`].
#![forbid(unsafe_code)]

mod algorithm;
mod error;
mod friction;
mod servo;
mod settings;
mod shading;
mod state;

pub use algorithm::ProxyForceAlgorithm;
pub use error::ProxyError;
pub use servo::{HapticDevice, ServoLoop};
pub use settings::ProxySettings;
pub use state::ProxyState;
