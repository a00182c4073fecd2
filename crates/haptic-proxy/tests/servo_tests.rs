#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Servo loop driving a scripted device.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use haptic_core::math::Vec3;
use haptic_geom::{Material, Mesh, World};
use haptic_proxy::{HapticDevice, ProxyError, ProxyForceAlgorithm, ProxySettings, ServoLoop};

/// Replays positions and records every force it is sent.
struct ScriptedDevice {
    positions: VecDeque<Vec3>,
    forces: Rc<RefCell<Vec<Vec3>>>,
}

impl HapticDevice for ScriptedDevice {
    fn position(&mut self) -> Result<Vec3, ProxyError> {
        self.positions
            .pop_front()
            .ok_or_else(|| ProxyError::Device("script exhausted".to_owned()))
    }

    fn send_force(&mut self, force: Vec3) -> Result<(), ProxyError> {
        self.forces.borrow_mut().push(force);
        Ok(())
    }
}

fn floor_world() -> World {
    let mut mesh = Mesh::with_material(Material::new(500.0, 0.0, 0.0));
    mesh.add_triangle(
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    )
    .unwrap();
    let mut world = World::new();
    world.add_mesh(mesh);
    world.build_collision_indices(0.0).unwrap();
    world
}

fn servo(positions: &[Vec3]) -> (ServoLoop<World>, Rc<RefCell<Vec<Vec3>>>) {
    let settings = ProxySettings {
        radius: 0.0,
        ..ProxySettings::default()
    };
    let mut algorithm = ProxyForceAlgorithm::new(settings).unwrap();
    algorithm.initialize(floor_world(), Vec3::new(0.0, 0.0, 0.1));
    let forces = Rc::new(RefCell::new(Vec::new()));
    let device = ScriptedDevice {
        positions: positions.iter().copied().collect(),
        forces: Rc::clone(&forces),
    };
    (ServoLoop::new(algorithm, Box::new(device)), forces)
}

#[test]
fn each_tick_sends_the_computed_force() {
    let (mut servo, forces) = servo(&[
        Vec3::new(0.0, 0.0, 0.05),
        Vec3::new(0.0, 0.0, -0.02),
        Vec3::new(0.0, 0.0, 0.3),
    ]);
    servo.run(3).unwrap();
    assert_eq!(servo.tick_count(), 3);

    let forces = forces.borrow();
    assert_eq!(forces.len(), 3);
    assert_eq!(forces[0], Vec3::ZERO);
    assert!(forces[1].z() > 500.0 * 0.02);
    assert_eq!(forces[2], Vec3::ZERO);
    assert_eq!(servo.algorithm().state().contact_count(), 0);
}

#[test]
fn device_errors_stop_the_loop() {
    let (mut servo, forces) = servo(&[Vec3::new(0.0, 0.0, -0.02)]);
    let err = servo.run(5).unwrap_err();
    assert!(matches!(err, ProxyError::Device(_)));
    assert_eq!(servo.tick_count(), 1);
    assert_eq!(forces.borrow().len(), 1);
}

#[test]
fn single_tick_returns_force_and_parts_come_back() {
    let (mut servo, _forces) = servo(&[Vec3::new(0.0, 0.0, -0.02)]);
    let force = servo.tick().unwrap();
    assert!(force.z() > 0.0);
    servo.algorithm_mut().reset();
    let (algorithm, _device) = servo.into_parts();
    assert_eq!(algorithm.state().last_global_force(), Vec3::ZERO);
}
