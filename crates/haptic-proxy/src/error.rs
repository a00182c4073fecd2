// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

/// Errors raised while configuring the proxy or talking to a device.
///
/// [`crate::ProxyForceAlgorithm::compute_forces`] never fails; these only
/// surface from setters and the servo loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProxyError {
    /// A setting was negative, non-finite or otherwise out of range.
    #[error("invalid proxy setting: {0}")]
    InvalidSettings(String),
    /// The haptic device failed to report a position or accept a force.
    #[error("haptic device error: {0}")]
    Device(String),
}
