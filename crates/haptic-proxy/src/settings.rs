// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use haptic_geom::CollisionSettings;
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// Tunables of the proxy force algorithm.
///
/// Persisted by `haptic-config` under the `proxy` key; unknown fields fall
/// back to their defaults when loading older files.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Physical radius of the proxy sphere. Collision indices must be built
    /// with the same radius.
    pub radius: f64,
    /// Lower bound for the initial safety margin kept between proxy and surface.
    pub epsilon_base: f64,
    /// Apply the static/dynamic friction cone when sliding along a surface.
    pub friction_enabled: bool,
    /// Interpolate vertex normals to smooth the rendered normal force.
    pub force_shading_enabled: bool,
    /// Largest angle (radians) between shaded and contact normal for which
    /// shading is applied.
    pub force_shading_angle_threshold: f64,
    /// Scales the dynamic friction angle below which a slipping proxy sticks again.
    pub friction_dyn_hysteresis_multiplier: f64,
    /// Treat back faces as solid.
    pub check_both_sides_of_triangle: bool,
    /// Anchor the proxy to the contacted mesh so it follows that mesh's motion.
    pub use_dynamic_proxy: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            radius: 0.01,
            epsilon_base: 1e-5,
            friction_enabled: true,
            force_shading_enabled: false,
            force_shading_angle_threshold: 1.0,
            friction_dyn_hysteresis_multiplier: 0.6,
            check_both_sides_of_triangle: false,
            use_dynamic_proxy: false,
        }
    }
}

impl ProxySettings {
    /// Rejects negative or non-finite numeric settings.
    pub fn validate(&self) -> Result<(), ProxyError> {
        let fields = [
            ("radius", self.radius),
            ("epsilon_base", self.epsilon_base),
            (
                "force_shading_angle_threshold",
                self.force_shading_angle_threshold,
            ),
            (
                "friction_dyn_hysteresis_multiplier",
                self.friction_dyn_hysteresis_multiplier,
            ),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ProxyError::InvalidSettings(format!("{name} = {value}")));
            }
        }
        if self.epsilon_base == 0.0 && self.radius == 0.0 {
            return Err(ProxyError::InvalidSettings(
                "epsilon_base and radius cannot both be zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Collision query settings matching these proxy settings.
    pub fn collision_settings(&self) -> CollisionSettings {
        CollisionSettings {
            collision_radius: self.radius,
            check_for_nearest_collision_only: true,
            check_both_sides_of_triangle: self.check_both_sides_of_triangle,
            adjust_object_motion: self.use_dynamic_proxy,
        }
    }
}
