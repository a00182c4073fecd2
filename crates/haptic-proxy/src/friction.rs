// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static/dynamic friction cone applied to unobstructed sliding moves.
//!
//! The cone is centred on the (projected) goal. Its radius is the device's
//! penetration depth behind the contact plane times the active friction
//! coefficient. A proxy inside the cone stays where it is; outside it is
//! dragged onto the cone's perimeter.

use haptic_core::math::{Vec3, SMALL};
use haptic_geom::Material;
use tracing::trace;

/// Inputs of one friction test.
#[derive(Debug, Copy, Clone)]
pub(crate) struct FrictionContact {
    /// Where the proxy is now.
    pub(crate) proxy: Vec3,
    /// Where the proxy would go without friction.
    pub(crate) goal: Vec3,
    /// Unconstrained device position.
    pub(crate) device: Vec3,
    /// Unit normal of the plane the proxy slides on.
    pub(crate) normal: Vec3,
    /// Material of the contacted surface.
    pub(crate) material: Material,
    /// Scales the dynamic friction angle for the slip-to-stick transition.
    pub(crate) hysteresis: f64,
}

/// Updates the stick/slip flag and returns the proxy's next position.
pub(crate) fn test_friction_and_move_proxy(contact: &FrictionContact, slipping: &mut bool) -> Vec3 {
    let mu_static = contact.material.static_friction;
    let mu_dynamic = contact.material.dynamic_friction;

    let projected_device = contact
        .device
        .project_on_plane(&contact.proxy, &contact.normal);
    let depth = (contact.device - projected_device).length();

    let cos_angle = (contact.proxy - contact.device)
        .normalize()
        .dot(&contact.normal)
        .clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    let was_slipping = *slipping;
    if mu_dynamic > mu_static {
        *slipping = true;
    } else if *slipping {
        if angle < mu_dynamic.atan() * contact.hysteresis {
            *slipping = false;
        }
    } else if angle > mu_static.atan() {
        *slipping = true;
    }
    if was_slipping != *slipping {
        trace!(slipping = *slipping, angle, "friction state changed");
    }

    let mu = if *slipping { mu_dynamic } else { mu_static };
    let cone_radius = (depth * mu).abs();

    let offset = contact.proxy - contact.goal;
    let distance = offset.length();
    if distance < SMALL {
        return contact.proxy;
    }
    if distance > cone_radius {
        contact.goal + offset.scale(cone_radius / distance)
    } else {
        contact.proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(proxy_x: f64, goal_x: f64, material: Material) -> FrictionContact {
        FrictionContact {
            proxy: Vec3::new(proxy_x, 0.0, 0.0),
            goal: Vec3::new(goal_x, 0.0, 0.0),
            device: Vec3::new(goal_x, 0.0, -0.1),
            normal: Vec3::UNIT_Z,
            material,
            hysteresis: 0.6,
        }
    }

    #[test]
    fn frictionless_surface_slides_to_goal() {
        let mut slipping = true;
        let next = test_friction_and_move_proxy(&contact(0.0, 0.5, Material::default()), &mut slipping);
        assert!((next - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-15);
    }

    #[test]
    fn small_offset_sticks() {
        let mut slipping = false;
        let material = Material::new(1000.0, 0.5, 0.3);
        let next = test_friction_and_move_proxy(&contact(0.0, 0.01, material), &mut slipping);
        assert_eq!(next, Vec3::ZERO);
        assert!(!slipping);
    }

    #[test]
    fn large_offset_slips_onto_dynamic_cone() {
        let mut slipping = false;
        let material = Material::new(1000.0, 0.5, 0.3);
        let next = test_friction_and_move_proxy(&contact(0.0, 0.5, material), &mut slipping);
        assert!(slipping);
        // depth 0.1, dynamic cone radius 0.03 around the goal.
        assert!((next.x() - 0.47).abs() < 1e-12);
    }

    #[test]
    fn dynamic_above_static_always_slips() {
        let mut slipping = false;
        let material = Material::new(1000.0, 0.1, 0.4);
        test_friction_and_move_proxy(&contact(0.0, 0.001, material), &mut slipping);
        assert!(slipping);
    }

    #[test]
    fn slipping_proxy_sticks_again_inside_hysteresis_angle() {
        let mut slipping = true;
        let material = Material::new(1000.0, 0.5, 0.3);
        test_friction_and_move_proxy(&contact(0.0, 0.001, material), &mut slipping);
        assert!(!slipping);
    }
}
