// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Haptic servo loop: read the device, compute the force, send it back.

use std::time::Duration;

use haptic_core::math::Vec3;
use haptic_geom::CollisionWorld;
use tracing::{debug, info, instrument};

use crate::algorithm::ProxyForceAlgorithm;
use crate::error::ProxyError;

/// A force-feedback device as seen by the servo loop.
pub trait HapticDevice {
    /// Current tool position in world coordinates.
    fn position(&mut self) -> Result<Vec3, ProxyError>;
    /// Renders `force` on the device.
    fn send_force(&mut self, force: Vec3) -> Result<(), ProxyError>;
}

/// Drives one proxy algorithm from one device at a fixed period.
pub struct ServoLoop<W> {
    algorithm: ProxyForceAlgorithm<W>,
    device: Box<dyn HapticDevice>,
    period: Option<Duration>,
    tick_count: u64,
}

impl<W: CollisionWorld> ServoLoop<W> {
    /// Creates a loop that ticks as fast as it is called.
    pub fn new(algorithm: ProxyForceAlgorithm<W>, device: Box<dyn HapticDevice>) -> Self {
        Self {
            algorithm,
            device,
            period: None,
            tick_count: 0,
        }
    }

    /// Sleeps `period` after every tick in [`ServoLoop::run`].
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// The driven algorithm.
    pub fn algorithm(&self) -> &ProxyForceAlgorithm<W> {
        &self.algorithm
    }

    /// Mutable access to the driven algorithm.
    pub fn algorithm_mut(&mut self) -> &mut ProxyForceAlgorithm<W> {
        &mut self.algorithm
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Runs one servo cycle and returns the force sent to the device.
    pub fn tick(&mut self) -> Result<Vec3, ProxyError> {
        let position = self.device.position()?;
        let force = self.algorithm.compute_forces(position);
        self.device.send_force(force)?;
        self.tick_count += 1;
        if self.tick_count.is_multiple_of(1000) {
            debug!(
                tick = self.tick_count,
                contacts = self.algorithm.state().contact_count(),
                "servo tick"
            );
        }
        Ok(force)
    }

    /// Runs `ticks` cycles, stopping at the first device error.
    #[instrument(skip(self))]
    pub fn run(&mut self, ticks: u64) -> Result<(), ProxyError> {
        info!(period = ?self.period, "servo loop started");
        for _ in 0..ticks {
            self.tick()?;
            if let Some(period) = self.period {
                std::thread::sleep(period);
            }
        }
        info!(ticks = self.tick_count, "servo loop stopped");
        Ok(())
    }

    /// Stops driving the device and hands back its parts.
    pub fn into_parts(self) -> (ProxyForceAlgorithm<W>, Box<dyn HapticDevice>) {
        (self.algorithm, self.device)
    }
}
