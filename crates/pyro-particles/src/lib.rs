//! Pyro Particles - Firework simulation
//!
//! Provides per-emitter firework simulation with:
//! - Structure-of-arrays particle buffers seeded per firework type
//! - Two-phase kinematics (ascent, burst) driven by a per-type profile table
//! - Ring-buffered trail history and delayed streak layers
//! - An emitter registry with delayed launches and lifecycle events
//! - Packed point-cloud snapshots for the renderer

pub mod curves;
pub mod emitter;
pub mod frame;
pub mod kinematics;
pub mod particle;
pub mod rand;
pub mod registry;
pub mod show;
pub mod streak;
pub mod texture;
pub mod trail;

use pyro_core::{Result, Scene, Vec3};
use pyro_runtime::RuntimeSystem;

pub use emitter::{Emitter, EmitterConfig, EmitterState, EmitterUpdate};
pub use frame::{EmitterFrame, PointVertex};
pub use kinematics::{profile_for, BurstProfile, KinematicsProfile, KinematicsSettings, Phase};
pub use particle::{ParticleBuffer, SpreadFamily};
pub use registry::{EmitterRegistry, LaunchOutcome, TickReport};
pub use show::ShowFile;
pub use streak::{StreakLayer, StreakLayers};
pub use texture::TextureCache;
pub use trail::TrailHistory;

/// The firework system; implements RuntimeSystem for integration with the frame driver.
///
/// Fireworks queued before the first frame are launched on `initialize`.
/// Lifecycle events accumulate in the registry until the host calls
/// `registry_mut().drain_events()`, which it should do every frame.
pub struct FireworkSystem {
    registry: EmitterRegistry,
    scene_origin: Vec3,
    queued: Vec<EmitterConfig>,
    last_report: TickReport,
}

impl FireworkSystem {
    pub fn new(registry: EmitterRegistry, scene_origin: Vec3) -> Self {
        Self {
            registry,
            scene_origin,
            queued: Vec::new(),
            last_report: TickReport::default(),
        }
    }

    /// A system that will launch every firework in `show` on its first frame
    pub fn from_show(show: ShowFile, seed: u32, scene_origin: Vec3) -> Result<Self> {
        let registry = EmitterRegistry::new(show.settings, seed)?;
        let mut system = Self::new(registry, scene_origin);
        system.queued = show.fireworks;
        Ok(system)
    }

    /// Queue fireworks for the next `initialize`
    pub fn queue(&mut self, configs: impl IntoIterator<Item = EmitterConfig>) {
        self.queued.extend(configs);
    }

    /// Launch immediately, bypassing the queue
    pub fn launch(&mut self, configs: &[EmitterConfig], scene: &mut dyn Scene) -> Vec<LaunchOutcome> {
        self.registry.launch(configs, self.scene_origin, scene)
    }

    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EmitterRegistry {
        &mut self.registry
    }

    /// Report from the most recent update
    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }
}

impl RuntimeSystem for FireworkSystem {
    fn initialize(&mut self, scene: &mut dyn Scene) -> Result<()> {
        let queued = std::mem::take(&mut self.queued);
        if queued.is_empty() {
            return Ok(());
        }
        let outcomes = self.registry.launch(&queued, self.scene_origin, scene);
        let rejected = outcomes.iter().filter(|o| o.is_rejected()).count();
        log::info!(
            "launched {} firework(s), {rejected} rejected",
            outcomes.len() - rejected
        );
        Ok(())
    }

    fn update(&mut self, scene: &mut dyn Scene, dt: f64) -> Result<()> {
        self.last_report = self.registry.tick(dt as f32, scene);
        Ok(())
    }

    fn shutdown(&mut self, scene: &mut dyn Scene) -> Result<()> {
        let destroyed = self.registry.clear(scene);
        if destroyed > 0 {
            log::debug!("shutdown released {destroyed} emitter(s)");
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.queued.is_empty() && self.registry.is_idle()
    }

    fn name(&self) -> &str {
        "fireworks"
    }
}
