// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The finger-proxy force algorithm.
//!
//! Each tick the proxy walks toward the device position in up to three
//! passes. Pass 0 moves straight at the goal until the first surface.
//! Pass 1 slides along that surface's plane. Pass 2 slides along the crease
//! where the first two planes meet. A third hit pins the proxy in a corner.
//! Unobstructed slides go through the friction cone, and the rendered force
//! is a spring between proxy and device.

use haptic_core::math::{Vec3, SMALL};
use haptic_geom::{CollisionEvent, CollisionSettings, CollisionWorld, Material};
use tracing::trace;

use crate::error::ProxyError;
use crate::friction::{test_friction_and_move_proxy, FrictionContact};
use crate::settings::ProxySettings;
use crate::shading::{shade_normal_force, shaded_normal};
use crate::state::{Epsilons, ProxyState};

/// Proxy force renderer for one haptic tool.
///
/// Holds the world it queries and the state carried across servo ticks.
/// One instance per tool; it is not meant to be shared between threads
/// while ticking.
#[derive(Debug)]
pub struct ProxyForceAlgorithm<W> {
    world: Option<W>,
    settings: ProxySettings,
    collision: CollisionSettings,
    state: ProxyState,
}

/// Borrowed view used while resolving one tick.
struct Solver<'a, W: ?Sized> {
    world: &'a W,
    settings: &'a ProxySettings,
    collision: &'a CollisionSettings,
    state: &'a mut ProxyState,
}

impl<W: CollisionWorld> ProxyForceAlgorithm<W> {
    /// Creates an algorithm without a world; it renders zero force until
    /// [`ProxyForceAlgorithm::initialize`] or [`ProxyForceAlgorithm::set_world`].
    pub fn new(settings: ProxySettings) -> Result<Self, ProxyError> {
        settings.validate()?;
        Ok(Self {
            world: None,
            collision: settings.collision_settings(),
            state: ProxyState::new(
                Vec3::ZERO,
                Epsilons::new(settings.epsilon_base, settings.radius),
            ),
            settings,
        })
    }

    /// Attaches `world` and places proxy and device at `initial_position`.
    ///
    /// Meshes in `world` must have collision indices built with the proxy
    /// radius.
    pub fn initialize(&mut self, world: W, initial_position: Vec3) {
        self.world = Some(world);
        self.state = ProxyState::new(initial_position, self.epsilons());
    }

    /// Swaps the world, keeping the proxy where it is. Contacts refer to the
    /// old world and are released.
    pub fn set_world(&mut self, world: W) -> Option<W> {
        self.state.release();
        self.world.replace(world)
    }

    /// The attached world.
    pub fn world(&self) -> Option<&W> {
        self.world.as_ref()
    }

    /// Mutable access to the attached world, e.g. to move meshes.
    pub fn world_mut(&mut self) -> Option<&mut W> {
        self.world.as_mut()
    }

    /// Current settings.
    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// State carried across ticks.
    pub fn state(&self) -> &ProxyState {
        &self.state
    }

    /// Changes the proxy radius and re-derives the margins.
    ///
    /// Collision indices must be rebuilt with the new radius by the caller.
    pub fn set_proxy_radius(&mut self, radius: f64) -> Result<(), ProxyError> {
        let settings = ProxySettings {
            radius,
            ..self.settings
        };
        self.apply_settings(settings)
    }

    /// Changes the lower bound of the initial margin.
    pub fn set_epsilon_base_value(&mut self, epsilon_base: f64) -> Result<(), ProxyError> {
        let settings = ProxySettings {
            epsilon_base,
            ..self.settings
        };
        self.apply_settings(settings)
    }

    /// Replaces every setting at once.
    pub fn set_settings(&mut self, settings: ProxySettings) -> Result<(), ProxyError> {
        self.apply_settings(settings)
    }

    fn apply_settings(&mut self, settings: ProxySettings) -> Result<(), ProxyError> {
        settings.validate()?;
        self.settings = settings;
        self.collision = settings.collision_settings();
        self.state.epsilons = self.epsilons();
        Ok(())
    }

    fn epsilons(&self) -> Epsilons {
        Epsilons::new(self.settings.epsilon_base, self.settings.radius)
    }

    /// Snaps the proxy onto the last device position, clears contacts and
    /// zeroes the force.
    pub fn reset(&mut self) {
        let state = &mut self.state;
        state.proxy_global_position = state.device_global_position;
        state.next_best_proxy_global_position = state.device_global_position;
        state.release();
    }

    /// Runs one servo tick for the device at `device_global_position` and
    /// returns the force to render.
    ///
    /// Without a world the force is zero and the proxy does not move.
    pub fn compute_forces(&mut self, device_global_position: Vec3) -> Vec3 {
        self.state.device_global_position = device_global_position;
        let Some(world) = self.world.as_ref() else {
            self.state.contact_count = 0;
            self.state.zero_forces();
            return Vec3::ZERO;
        };
        let mut solver = Solver {
            world,
            settings: &self.settings,
            collision: &self.collision,
            state: &mut self.state,
        };
        solver.follow_anchor();
        solver.compute_next_best_proxy_position(device_global_position);
        solver.state.proxy_global_position = solver.state.next_best_proxy_global_position;
        solver.update_forces();
        solver.update_anchor();
        self.state.last_global_force
    }
}

impl<W: CollisionWorld + ?Sized> Solver<'_, W> {
    fn goal_achieved(&self, proxy: &Vec3, goal: &Vec3) -> bool {
        proxy.distance(goal) < self.state.epsilons.minimal
    }

    /// Moves a proxy that rests on a moving mesh along with that mesh.
    fn follow_anchor(&mut self) {
        if !self.settings.use_dynamic_proxy {
            return;
        }
        if let Some((mesh, local)) = self.state.anchor {
            if let Some(global) = self.world.to_global(mesh, &local) {
                self.state.proxy_global_position = global;
            }
        }
    }

    fn update_anchor(&mut self) {
        self.state.anchor = if self.settings.use_dynamic_proxy && self.state.contact_count > 0 {
            self.constraint(0).and_then(|event| {
                let mesh = event.triangle.mesh;
                self.world
                    .to_local(mesh, &self.state.proxy_global_position)
                    .map(|local| (mesh, local))
            })
        } else {
            None
        };
    }

    fn constraint(&self, slot: usize) -> Option<CollisionEvent> {
        self.state.constraints[slot].nearest
    }

    fn material(&self, slot: usize) -> Material {
        self.constraint(slot)
            .and_then(|event| self.world.material(event.triangle))
            .unwrap_or_default()
    }

    /// Searches `from → goal` (extended by the detection margin) and, on a
    /// hit, returns the furthest point along the way that keeps the margin
    /// to the contacted surface. The hit is left in constraint `slot`.
    fn advance_toward(&mut self, slot: usize, from: Vec3, goal: Vec3) -> Option<Vec3> {
        let offset = goal - from;
        let distance = offset.length();
        if distance < SMALL {
            return None;
        }
        let direction = offset.scale(1.0 / distance);
        let end = goal + direction.scale(self.state.epsilons.collision_detection);

        let recorder = &mut self.state.constraints[slot];
        recorder.clear();
        if !self
            .world
            .compute_collision_detection(&from, &end, recorder, self.collision)
        {
            return None;
        }
        let event = recorder.nearest?;

        let cos_angle = -direction.dot(&event.global_normal);
        let along = event.squared_distance.sqrt();
        let advance = if cos_angle > SMALL {
            self.state.epsilons.shrink_to(along * cos_angle);
            along - self.state.epsilons.value / cos_angle
        } else {
            0.0
        };
        Some(from + direction.scale(advance.clamp(0.0, distance)))
    }

    fn slide_with_friction(&mut self, proxy: Vec3, goal: Vec3, normal: Vec3) -> Vec3 {
        if !self.settings.friction_enabled {
            return goal;
        }
        let contact = FrictionContact {
            proxy,
            goal,
            device: self.state.device_global_position,
            normal,
            material: self.material(0),
            hysteresis: self.settings.friction_dyn_hysteresis_multiplier,
        };
        test_friction_and_move_proxy(&contact, &mut self.state.slipping)
    }

    fn compute_next_best_proxy_position(&mut self, goal: Vec3) {
        let previous = self.state.contact_count;
        self.resolve_constraints(goal);
        let contacts = self.state.contact_count;
        for recorder in &mut self.state.constraints[contacts..] {
            recorder.clear();
        }
        if contacts == 0 {
            self.state.epsilons.restore();
            self.state.slipping = true;
        }
        if contacts != previous {
            trace!(from = previous, to = contacts, "proxy contact count changed");
        }
    }

    fn resolve_constraints(&mut self, goal: Vec3) {
        let proxy = self.state.proxy_global_position;
        self.state.contact_count = 0;

        // Pass 0: straight at the goal.
        if self.goal_achieved(&proxy, &goal) {
            self.state.next_best_proxy_global_position = proxy;
            return;
        }
        let Some(first) = self.advance_toward(0, proxy, goal) else {
            self.state.next_best_proxy_global_position = goal;
            return;
        };
        self.state.contact_count = 1;
        self.state.next_best_proxy_global_position = first;
        let Some(normal0) = self.constraint(0).map(|e| e.global_normal) else {
            return;
        };

        // Pass 1: slide on the first plane.
        let goal1 = if (goal - first).dot(&normal0) < 0.0 {
            goal.project_on_plane(&first, &normal0)
        } else {
            goal
        };
        if self.goal_achieved(&first, &goal1) {
            return;
        }
        let Some(second) = self.advance_toward(1, first, goal1) else {
            self.state.next_best_proxy_global_position =
                self.slide_with_friction(first, goal1, normal0);
            return;
        };
        self.state.contact_count = 2;
        self.state.next_best_proxy_global_position = second;
        let Some(normal1) = self.constraint(1).map(|e| e.global_normal) else {
            return;
        };

        // Pass 2: slide along the crease of both planes.
        let crease = normal0.cross(&normal1);
        if crease.length() < SMALL {
            return;
        }
        let crease = crease.normalize();
        let goal2 = goal.project_on_line(&second, &crease);
        if self.goal_achieved(&second, &goal2) {
            return;
        }
        let Some(third) = self.advance_toward(2, second, goal2) else {
            let normal = (normal0 + normal1).normalize();
            self.state.next_best_proxy_global_position =
                self.slide_with_friction(second, goal2, normal);
            return;
        };
        self.state.contact_count = 3;
        self.state.next_best_proxy_global_position = third;
    }

    fn update_forces(&mut self) {
        let Some(contact) = self.constraint(0).filter(|_| self.state.contact_count > 0) else {
            self.state.zero_forces();
            return;
        };
        let stiffness = self.material(0).stiffness;
        let force = (self.state.proxy_global_position - self.state.device_global_position)
            .scale(stiffness);

        let normal = contact.global_normal;
        let mut normal_force = normal.scale(force.dot(&normal));
        let tangential_force = force - normal_force;

        if self.settings.force_shading_enabled && self.state.contact_count == 1 {
            let shaded = self
                .world
                .shading_triangle(contact.triangle)
                .and_then(|tri| shaded_normal(&tri, &contact.global_pos));
            if let Some(shaded) = shaded {
                normal_force = shade_normal_force(
                    normal_force,
                    &normal,
                    &shaded,
                    self.settings.force_shading_angle_threshold,
                );
            }
        }

        self.state.normal_force = normal_force;
        self.state.tangential_force = tangential_force;
        self.state.last_global_force = normal_force + tangential_force;
    }
}
