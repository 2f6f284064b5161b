//! Frame driver: the one place that advances a system each frame

use crate::clock::FrameClock;
use crate::system::RuntimeSystem;
use pyro_core::{Result, Scene};

/// Owns a clock and a system and advances both once per frame.
///
/// Stopping a show is simply not calling [`FrameDriver::step`] or
/// [`FrameDriver::frame`] again; [`FrameDriver::shutdown`] releases
/// whatever the system still holds in the scene.
pub struct FrameDriver<S: RuntimeSystem> {
    pub clock: FrameClock,
    system: S,
    initialized: bool,
}

impl<S: RuntimeSystem> FrameDriver<S> {
    pub fn new(system: S) -> Self {
        Self::with_clock(system, FrameClock::new())
    }

    pub fn with_clock(system: S, clock: FrameClock) -> Self {
        Self {
            clock,
            system,
            initialized: false,
        }
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut S {
        &mut self.system
    }

    fn ensure_initialized(&mut self, scene: &mut dyn Scene) -> Result<()> {
        if !self.initialized {
            self.system.initialize(scene)?;
            self.initialized = true;
            log::debug!("initialized system '{}'", self.system.name());
        }
        Ok(())
    }

    /// Interactive frame: read the wall clock, then run the frame
    pub fn frame(&mut self, scene: &mut dyn Scene) -> Result<()> {
        self.clock.tick();
        self.run_frame(scene)
    }

    /// Headless frame with an explicit delta
    pub fn step(&mut self, scene: &mut dyn Scene, dt: f64) -> Result<()> {
        self.clock.advance(dt);
        self.run_frame(scene)
    }

    fn run_frame(&mut self, scene: &mut dyn Scene) -> Result<()> {
        self.ensure_initialized(scene)?;

        self.system.update(scene, self.clock.delta_time)
    }

    /// Step with a fixed delta until the system is idle or `max_time` elapses.
    /// Returns the number of frames run.
    pub fn run_until_idle(&mut self, scene: &mut dyn Scene, dt: f64, max_time: f64) -> Result<u64> {
        let start = self.clock.frame_count;
        self.ensure_initialized(scene)?;
        while !self.system.is_idle() && self.clock.total_time < max_time {
            self.step(scene, dt)?;
        }
        Ok(self.clock.frame_count - start)
    }

    pub fn shutdown(&mut self, scene: &mut dyn Scene) -> Result<()> {
        log::debug!("shutting down system '{}'", self.system.name());
        self.system.shutdown(scene)
    }
}
