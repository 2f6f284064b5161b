//! Owns every live emitter and the launches still waiting on their delay

use crate::emitter::{Emitter, EmitterConfig, EmitterState};
use crate::frame::EmitterFrame;
use crate::kinematics::KinematicsSettings;
use crate::rand::ParticleRng;
use crate::texture::TextureCache;
use pyro_core::{EmitterId, PyroError, Result, Scene, Vec3};
use pyro_runtime::{EventBus, ShowEvent};
use serde::Serialize;

/// What happened to one entry of a [`EmitterRegistry::launch`] call
#[derive(Debug)]
pub enum LaunchOutcome {
    Spawned(EmitterId),
    Scheduled { id: EmitterId, delay: f32 },
    Rejected(PyroError),
}

impl LaunchOutcome {
    pub fn id(&self) -> Option<EmitterId> {
        match self {
            LaunchOutcome::Spawned(id) | LaunchOutcome::Scheduled { id, .. } => Some(*id),
            LaunchOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, LaunchOutcome::Rejected(_))
    }
}

/// Summary of one [`EmitterRegistry::tick`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub spawned: Vec<EmitterId>,
    pub destroyed: Vec<EmitterId>,
    /// Emitters still active after the sweep
    pub live: usize,
    pub particles: usize,
}

struct PendingLaunch {
    id: EmitterId,
    config: EmitterConfig,
    remaining: f32,
}

/// The set of fireworks in a show.
///
/// Emitters are updated in launch order. A destroyed emitter is removed in
/// the same tick that destroyed it.
pub struct EmitterRegistry {
    emitters: Vec<Emitter>,
    pending: Vec<PendingLaunch>,
    settings: KinematicsSettings,
    textures: TextureCache,
    rng: ParticleRng,
    next_id: EmitterId,
    events: EventBus,
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::build(KinematicsSettings::default(), 1)
    }
}

impl EmitterRegistry {
    /// A registry whose emitters all share `settings`; `seed` fixes every
    /// random draw so equal seeds replay identically.
    pub fn new(settings: KinematicsSettings, seed: u32) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(settings, seed))
    }

    fn build(settings: KinematicsSettings, seed: u32) -> Self {
        Self {
            emitters: Vec::new(),
            pending: Vec::new(),
            settings,
            textures: TextureCache::new(),
            rng: ParticleRng::new(seed),
            next_id: EmitterId(1),
            events: EventBus::new(),
        }
    }

    fn allocate_id(&mut self) -> EmitterId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Launch a batch of fireworks around `scene_origin`.
    ///
    /// Each config is validated on its own: a bad entry is rejected without
    /// affecting the others or any emitter already running.
    pub fn launch(
        &mut self,
        configs: &[EmitterConfig],
        scene_origin: Vec3,
        scene: &mut dyn Scene,
    ) -> Vec<LaunchOutcome> {
        configs
            .iter()
            .map(|config| self.launch_one(config, scene_origin, scene))
            .collect()
    }

    fn launch_one(
        &mut self,
        config: &EmitterConfig,
        scene_origin: Vec3,
        scene: &mut dyn Scene,
    ) -> LaunchOutcome {
        if let Err(err) = config.validate() {
            return self.reject(err);
        }

        let id = self.allocate_id();
        let mut config = config.clone();
        config.origin = scene_origin + config.origin;

        if config.delay > 0.0 {
            let delay = config.delay;
            self.events.push(ShowEvent::Scheduled {
                id,
                firework_type: config.firework_type,
                delay,
            });
            log::debug!("emitter {id} scheduled in {delay:.2}s");
            self.pending.push(PendingLaunch {
                id,
                config,
                remaining: delay,
            });
            return LaunchOutcome::Scheduled { id, delay };
        }

        match self.spawn(id, config, scene) {
            Ok(()) => LaunchOutcome::Spawned(id),
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: PyroError) -> LaunchOutcome {
        log::warn!("launch rejected: {err}");
        self.events.push(ShowEvent::Rejected {
            reason: err.to_string(),
        });
        LaunchOutcome::Rejected(err)
    }

    fn spawn(&mut self, id: EmitterId, config: EmitterConfig, scene: &mut dyn Scene) -> Result<()> {
        let mut rng = self.rng.fork();
        let firework_type = config.firework_type;
        let origin = config.origin;
        let emitter = Emitter::create(
            id,
            config,
            &self.settings,
            scene,
            &mut self.textures,
            &mut rng,
        )?;
        self.emitters.push(emitter);
        self.events.push(ShowEvent::Launched {
            id,
            firework_type,
            origin,
        });
        Ok(())
    }

    /// Advance the show by `dt` seconds.
    ///
    /// Live emitters are updated first; launches whose delay runs out during
    /// this tick are then created and updated with whatever part of `dt` was
    /// left after the delay expired. Destroyed emitters are swept before
    /// returning.
    pub fn tick(&mut self, dt: f32, scene: &mut dyn Scene) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut report = TickReport::default();

        for emitter in self.emitters.iter_mut() {
            step_emitter(emitter, dt, scene, &mut self.events, &mut report);
        }

        let mut due = Vec::new();
        for mut launch in std::mem::take(&mut self.pending) {
            launch.remaining -= dt;
            if launch.remaining > 0.0 {
                self.pending.push(launch);
            } else {
                due.push(launch);
            }
        }
        for launch in due {
            let leftover = -launch.remaining;
            match self.spawn(launch.id, launch.config, scene) {
                Ok(()) => {
                    report.spawned.push(launch.id);
                    if let Some(emitter) = self.emitters.last_mut() {
                        step_emitter(emitter, leftover, scene, &mut self.events, &mut report);
                    }
                }
                Err(err) => {
                    self.reject(err);
                }
            }
        }

        self.emitters.retain(|e| e.state() == EmitterState::Active);

        report.live = self.emitters.len();
        report.particles = self.total_particles();
        log::trace!(
            "tick {dt:.4}s: {} live, {} particles, {} pending",
            report.live,
            report.particles,
            self.pending.len()
        );
        report
    }

    /// Destroy every emitter and drop all pending launches now.
    /// Returns how many emitters were destroyed.
    pub fn clear(&mut self, scene: &mut dyn Scene) -> usize {
        let mut destroyed = 0;
        for emitter in self.emitters.iter_mut() {
            if emitter.destroy(scene) {
                self.events.push(ShowEvent::Destroyed {
                    id: emitter.id(),
                    elapsed: emitter.elapsed(),
                });
                destroyed += 1;
            }
        }
        self.emitters.clear();
        if !self.pending.is_empty() {
            log::debug!("dropped {} pending launch(es)", self.pending.len());
        }
        self.pending.clear();
        destroyed
    }

    /// Stop one firework early, whether it is live or still waiting on its delay
    pub fn cancel(&mut self, id: EmitterId, scene: &mut dyn Scene) -> Result<()> {
        if let Some(index) = self.pending.iter().position(|p| p.id == id) {
            self.pending.remove(index);
            log::debug!("pending emitter {id} cancelled");
            return Ok(());
        }
        let index = self
            .emitters
            .iter()
            .position(|e| e.id() == id)
            .ok_or(PyroError::EmitterNotFound(id.raw()))?;
        let mut emitter = self.emitters.remove(index);
        emitter.destroy(scene);
        self.events.push(ShowEvent::Destroyed {
            id,
            elapsed: emitter.elapsed(),
        });
        Ok(())
    }

    /// Render snapshots of every live emitter, in launch order
    pub fn frames(&self) -> Vec<EmitterFrame> {
        self.emitters.iter().filter_map(|e| e.frame()).collect()
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.id() == id)
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// No live emitters and nothing scheduled
    pub fn is_idle(&self) -> bool {
        self.emitters.is_empty() && self.pending.is_empty()
    }

    pub fn total_particles(&self) -> usize {
        self.emitters.iter().map(|e| e.particle_count()).sum()
    }

    pub fn settings(&self) -> &KinematicsSettings {
        &self.settings
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Take every lifecycle event pushed since the last drain.
    ///
    /// Hosts should call this once per frame; past
    /// [`pyro_runtime::DEFAULT_EVENT_LIMIT`] undrained events the oldest
    /// are dropped.
    pub fn drain_events(&mut self) -> Vec<ShowEvent> {
        self.events.drain()
    }
}

fn step_emitter(
    emitter: &mut Emitter,
    dt: f32,
    scene: &mut dyn Scene,
    events: &mut EventBus,
    report: &mut TickReport,
) {
    let update = emitter.update(dt, scene);
    if let Some(center) = update.burst_started {
        events.push(ShowEvent::Burst {
            id: emitter.id(),
            center,
        });
    }
    if update.state == EmitterState::Destroyed {
        events.push(ShowEvent::Destroyed {
            id: emitter.id(),
            elapsed: emitter.elapsed(),
        });
        report.destroyed.push(emitter.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyro_core::FireworkType;
    use pyro_runtime::SceneGraph;

    fn config(firework_type: FireworkType, duration: f32) -> EmitterConfig {
        EmitterConfig {
            firework_type,
            duration,
            particle_count: 20,
            ..Default::default()
        }
    }

    #[test]
    fn launch_then_clear_leaves_scene_empty() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        let a = EmitterConfig {
            trail: Some(10),
            ..config(FireworkType::Peony, 3.0)
        };
        let b = EmitterConfig {
            streaks: Some(3),
            ..config(FireworkType::Boom, 2.0)
        };
        let outcomes = registry.launch(&[a, b], Vec3::ZERO, &mut scene);
        assert!(outcomes.iter().all(|o| matches!(o, LaunchOutcome::Spawned(_))));
        assert_eq!(registry.len(), 2);
        assert_eq!(scene.live_count(), 4);

        assert_eq!(registry.clear(&mut scene), 2);
        assert!(registry.is_empty());
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.leaked_count(), 0);
        assert_eq!(scene.double_releases(), 0);
    }

    #[test]
    fn invalid_config_rejected_without_side_effects() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        registry.launch(&[config(FireworkType::Ring, 2.0)], Vec3::ZERO, &mut scene);

        let bad = EmitterConfig {
            particle_count: 0,
            ..Default::default()
        };
        let outcomes = registry.launch(&[bad], Vec3::ZERO, &mut scene);
        assert!(outcomes[0].is_rejected());
        assert_eq!(registry.len(), 1);
        assert_eq!(scene.live_count(), 1);

        let events = registry.drain_events();
        assert!(matches!(events.last(), Some(ShowEvent::Rejected { .. })));
    }

    #[test]
    fn ids_are_per_registry() {
        let mut scene = SceneGraph::new();
        let mut first = EmitterRegistry::default();
        let mut second = EmitterRegistry::default();
        let c = config(FireworkType::Default, 1.0);
        let a = first.launch(&[c.clone()], Vec3::ZERO, &mut scene);
        let b = second.launch(&[c], Vec3::ZERO, &mut scene);
        assert_eq!(a[0].id(), Some(EmitterId(1)));
        assert_eq!(a[0].id(), b[0].id());
    }

    #[test]
    fn emitters_are_swept_on_expiry() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        registry.launch(
            &[config(FireworkType::Palm, 0.5), config(FireworkType::Comet, 2.0)],
            Vec3::ZERO,
            &mut scene,
        );

        let mut destroyed = Vec::new();
        for _ in 0..40 {
            let report = registry.tick(1.0 / 60.0, &mut scene);
            destroyed.extend(report.destroyed);
        }
        assert_eq!(destroyed, vec![EmitterId(1)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(EmitterId(1)).is_none());
        assert_eq!(scene.primitives_for(EmitterId(1)), 0);
        assert_eq!(registry.total_particles(), 20);
    }

    #[test]
    fn delayed_launch_spawns_on_expiry_tick() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        let delayed = EmitterConfig {
            delay: 0.25,
            ..config(FireworkType::Willow, 2.0)
        };
        let outcomes = registry.launch(&[delayed], Vec3::ZERO, &mut scene);
        assert!(matches!(outcomes[0], LaunchOutcome::Scheduled { .. }));
        assert_eq!(registry.pending_len(), 1);
        assert!(registry.is_empty());
        assert!(!registry.is_idle());
        assert_eq!(scene.live_count(), 0);

        let report = registry.tick(0.2, &mut scene);
        assert!(report.spawned.is_empty());

        let report = registry.tick(0.1, &mut scene);
        assert_eq!(report.spawned, vec![EmitterId(1)]);
        assert_eq!(registry.pending_len(), 0);
        let emitter = registry.get(EmitterId(1)).unwrap();
        assert!((emitter.elapsed() - 0.05).abs() < 1e-4);
    }

    #[test]
    fn scene_origin_offsets_launch_position() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        let c = EmitterConfig {
            origin: Vec3::new(1.0, 0.0, 0.0),
            ..config(FireworkType::Vase, 2.0)
        };
        registry.launch(&[c], Vec3::new(10.0, 5.0, 0.0), &mut scene);
        let emitter = registry.get(EmitterId(1)).unwrap();
        assert_eq!(emitter.config().origin, Vec3::new(11.0, 5.0, 0.0));
        assert_eq!(emitter.buffer().unwrap().position(0), Vec3::new(11.0, 5.0, 0.0));
    }

    #[test]
    fn lifecycle_events_in_order() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        registry.launch(&[config(FireworkType::Flower, 1.0)], Vec3::ZERO, &mut scene);
        for _ in 0..80 {
            registry.tick(1.0 / 60.0, &mut scene);
        }
        let events = registry.drain_events();
        assert!(matches!(events[0], ShowEvent::Launched { .. }));
        assert!(matches!(events[1], ShowEvent::Burst { .. }));
        assert!(matches!(events[2], ShowEvent::Destroyed { .. }));
        assert_eq!(events.len(), 3);
        assert!(registry.is_idle());
    }

    #[test]
    fn cancel_live_and_pending() {
        let mut scene = SceneGraph::new();
        let mut registry = EmitterRegistry::default();
        let later = EmitterConfig {
            delay: 1.0,
            ..config(FireworkType::Crosette, 2.0)
        };
        registry.launch(
            &[config(FireworkType::Crosette, 2.0), later],
            Vec3::ZERO,
            &mut scene,
        );
        registry.cancel(EmitterId(1), &mut scene).unwrap();
        registry.cancel(EmitterId(2), &mut scene).unwrap();
        assert!(registry.is_idle());
        assert_eq!(scene.live_count(), 0);
        assert!(matches!(
            registry.cancel(EmitterId(7), &mut scene),
            Err(PyroError::EmitterNotFound(7))
        ));
    }

    #[test]
    fn equal_seeds_replay_identically() {
        let run = |seed| {
            let mut scene = SceneGraph::new();
            let mut registry = EmitterRegistry::new(KinematicsSettings::default(), seed).unwrap();
            registry.launch(
                &[config(FireworkType::Chrysanthemum, 2.0), config(FireworkType::Windy, 2.0)],
                Vec3::ZERO,
                &mut scene,
            );
            for _ in 0..30 {
                registry.tick(1.0 / 60.0, &mut scene);
            }
            registry
                .frames()
                .iter()
                .flat_map(|f| f.particle_floats().to_vec())
                .collect::<Vec<f32>>()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = KinematicsSettings {
            drag: 1.5,
            ..Default::default()
        };
        assert!(EmitterRegistry::new(settings, 1).is_err());
    }
}
