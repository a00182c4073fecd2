// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use haptic_core::math::Vec3;
use haptic_geom::{CollisionEvent, CollisionRecorder, MeshId};

/// Fraction of the initial margin below which the margin never shrinks.
pub(crate) const EPSILON_MINIMAL_RATIO: f64 = 0.01;
/// Fraction of the proxy radius used as the initial margin.
pub(crate) const EPSILON_RADIUS_RATIO: f64 = 0.01;

/// Safety margins kept between the proxy and the surfaces it rests on.
///
/// `value` shrinks while the proxy sits closer to a surface than the margin
/// and is restored to `initial` once every contact is released.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Epsilons {
    pub(crate) value: f64,
    pub(crate) minimal: f64,
    pub(crate) initial: f64,
    pub(crate) collision_detection: f64,
}

impl Epsilons {
    pub(crate) fn new(epsilon_base: f64, radius: f64) -> Self {
        let initial = epsilon_base.max(EPSILON_RADIUS_RATIO * radius);
        Self {
            value: initial,
            minimal: EPSILON_MINIMAL_RATIO * initial,
            initial,
            collision_detection: initial,
        }
    }

    pub(crate) fn restore(&mut self) {
        self.value = self.initial;
        self.collision_detection = self.initial;
    }

    /// Tightens the margin to `clearance` when the proxy is already closer
    /// than the current margin.
    pub(crate) fn shrink_to(&mut self, clearance: f64) {
        if clearance < self.value {
            self.value = clearance.max(self.minimal);
            self.collision_detection = self.value;
        }
    }
}

/// Everything the proxy carries from one servo tick to the next.
#[derive(Debug, Clone)]
pub struct ProxyState {
    pub(crate) device_global_position: Vec3,
    pub(crate) proxy_global_position: Vec3,
    pub(crate) next_best_proxy_global_position: Vec3,
    pub(crate) constraints: [CollisionRecorder; 3],
    pub(crate) contact_count: usize,
    pub(crate) epsilons: Epsilons,
    pub(crate) slipping: bool,
    pub(crate) last_global_force: Vec3,
    pub(crate) normal_force: Vec3,
    pub(crate) tangential_force: Vec3,
    pub(crate) anchor: Option<(MeshId, Vec3)>,
}

impl ProxyState {
    pub(crate) fn new(position: Vec3, epsilons: Epsilons) -> Self {
        Self {
            device_global_position: position,
            proxy_global_position: position,
            next_best_proxy_global_position: position,
            constraints: Default::default(),
            contact_count: 0,
            epsilons,
            slipping: true,
            last_global_force: Vec3::ZERO,
            normal_force: Vec3::ZERO,
            tangential_force: Vec3::ZERO,
            anchor: None,
        }
    }

    /// Releases every contact and zeroes the force.
    pub(crate) fn release(&mut self) {
        for recorder in &mut self.constraints {
            recorder.clear();
        }
        self.contact_count = 0;
        self.epsilons.restore();
        self.slipping = true;
        self.anchor = None;
        self.zero_forces();
    }

    pub(crate) fn zero_forces(&mut self) {
        self.last_global_force = Vec3::ZERO;
        self.normal_force = Vec3::ZERO;
        self.tangential_force = Vec3::ZERO;
    }

    /// Tool position received on the last tick.
    pub fn device_global_position(&self) -> Vec3 {
        self.device_global_position
    }

    /// Proxy position after the last tick.
    pub fn proxy_global_position(&self) -> Vec3 {
        self.proxy_global_position
    }

    /// Number of active constraint planes (0 to 3).
    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Nearest hit behind constraint `index`, `None` unless `index < contact_count`.
    pub fn constraint(&self, index: usize) -> Option<&CollisionEvent> {
        if index >= self.contact_count {
            return None;
        }
        self.constraints.get(index)?.nearest.as_ref()
    }

    /// Current proxy/surface margin.
    pub fn epsilon(&self) -> f64 {
        self.epsilons.value
    }

    /// Floor the margin never shrinks below.
    pub fn epsilon_minimal(&self) -> f64 {
        self.epsilons.minimal
    }

    /// Margin restored whenever contact is lost.
    pub fn epsilon_initial(&self) -> f64 {
        self.epsilons.initial
    }

    /// Extension added past the goal when searching for obstacles.
    pub fn epsilon_collision_detection(&self) -> f64 {
        self.epsilons.collision_detection
    }

    /// `true` while the dynamic friction cone applies.
    pub fn is_slipping(&self) -> bool {
        self.slipping
    }

    /// Force rendered on the last tick.
    pub fn last_global_force(&self) -> Vec3 {
        self.last_global_force
    }

    /// Component of the last force along the contact normal (shaded if enabled).
    pub fn normal_force(&self) -> Vec3 {
        self.normal_force
    }

    /// Component of the last force tangent to the contact plane.
    pub fn tangential_force(&self) -> Vec3 {
        self.tangential_force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_margin_follows_radius_or_base() {
        let small = Epsilons::new(1e-5, 0.0001);
        assert_eq!(small.initial, 1e-5);
        let large = Epsilons::new(1e-5, 0.1);
        assert!((large.initial - 0.001).abs() < 1e-15);
        assert!((large.minimal - 1e-5).abs() < 1e-15);
    }

    #[test]
    fn margin_shrinks_but_not_below_minimal() {
        let mut eps = Epsilons::new(1e-3, 0.0);
        eps.shrink_to(5e-4);
        assert_eq!(eps.value, 5e-4);
        assert_eq!(eps.collision_detection, 5e-4);
        eps.shrink_to(1e-9);
        assert_eq!(eps.value, eps.minimal);
        eps.shrink_to(1.0);
        assert_eq!(eps.value, eps.minimal);
        eps.restore();
        assert_eq!(eps.value, 1e-3);
    }

    #[test]
    fn constraints_beyond_contact_count_are_hidden() {
        let state = ProxyState::new(Vec3::ZERO, Epsilons::new(1e-5, 0.01));
        assert!(state.constraint(0).is_none());
        assert!(state.constraint(7).is_none());
    }
}
