//! Emitter configuration (parsed from TOML) and the emitter lifecycle

use crate::curves::fade_opacity;
use crate::frame::{pack_points, EmitterFrame};
use crate::kinematics::{self, profile_for, KinematicsSettings, KinematicsState, Phase};
use crate::particle::ParticleBuffer;
use crate::rand::ParticleRng;
use crate::streak::StreakLayers;
use crate::trail::TrailHistory;
use pyro_core::{
    Color, EmitterId, FireworkType, Primitive, PrimitiveHandle, PrimitiveKind, PyroError, Result,
    Scene, TextureHandle, TextureSource, Vec3,
};

/// Upper bound on particles per emitter
pub const MAX_PARTICLES: usize = 100_000;
pub const DEFAULT_TRAIL_HISTORY: usize = 10;
pub const DEFAULT_STREAK_LAYERS: usize = 3;

/// Everything needed to launch one firework
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub firework_type: FireworkType,
    pub color: Color,
    /// Lifetime in seconds
    pub duration: f32,
    pub particle_count: usize,
    /// Launch position relative to the scene origin passed to `launch`
    pub origin: Vec3,
    /// Seconds to wait before the emitter is created
    pub delay: f32,
    pub max_speed: f32,
    pub point_size: f32,
    /// Trail history limit, if the emitter draws trails
    pub trail: Option<usize>,
    /// Streak layer count, if the emitter draws streaks
    pub streaks: Option<usize>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            firework_type: FireworkType::Default,
            color: Color::RED,
            duration: 3.0,
            particle_count: 100,
            origin: Vec3::ZERO,
            delay: 0.0,
            max_speed: 20.0,
            point_size: 2.0,
            trail: None,
            streaks: None,
        }
    }
}

impl EmitterConfig {
    /// Parse an EmitterConfig from a `[[firework]]` TOML table.
    ///
    /// Missing keys keep their defaults and unknown firework types fall
    /// back to the default profile; only an unreadable color is an error.
    /// Range checks happen in [`EmitterConfig::validate`] at launch time.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("type").and_then(|v| v.as_str()) {
            config.firework_type = FireworkType::from_name_or_default(v);
        }
        if let Some(v) = table.get("color") {
            config.color = toml_color(v)?;
        }
        if let Some(v) = table.get("duration") {
            config.duration = toml_f32(v, config.duration);
        }
        if let Some(v) = table.get("particle_count") {
            config.particle_count = toml_integer(v).unwrap_or(0).max(0) as usize;
        }
        if let Some(v) = table.get("origin") {
            config.origin = Vec3::from_array(toml_vec3(v, config.origin.to_array()));
        }
        if let Some(v) = table.get("delay") {
            config.delay = toml_f32(v, config.delay);
        }
        if let Some(v) = table.get("max_speed") {
            config.max_speed = toml_f32(v, config.max_speed);
        }
        if let Some(v) = table.get("point_size") {
            config.point_size = toml_f32(v, config.point_size);
        }
        if let Some(v) = table.get("trail") {
            config.trail = toml_optional_count(v, DEFAULT_TRAIL_HISTORY);
        }
        if let Some(v) = table.get("streaks") {
            config.streaks = toml_optional_count(v, DEFAULT_STREAK_LAYERS);
        }

        Ok(config)
    }

    /// Reject configs that cannot produce a meaningful emitter
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(PyroError::ValueOutOfRange {
                field: "duration".into(),
                min: 0.0,
                max: f64::MAX,
                value: self.duration as f64,
            });
        }
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(PyroError::ValueOutOfRange {
                field: "particle_count".into(),
                min: 1.0,
                max: MAX_PARTICLES as f64,
                value: self.particle_count as f64,
            });
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(PyroError::ValueOutOfRange {
                field: "delay".into(),
                min: 0.0,
                max: f64::MAX,
                value: self.delay as f64,
            });
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(PyroError::ValueOutOfRange {
                field: "max_speed".into(),
                min: 0.0,
                max: f64::MAX,
                value: self.max_speed as f64,
            });
        }
        let o = self.origin;
        if !(o.x.is_finite() && o.y.is_finite() && o.z.is_finite()) {
            return Err(PyroError::InvalidConfig("origin must be finite".into()));
        }
        if self.trail == Some(0) || self.streaks == Some(0) {
            return Err(PyroError::InvalidConfig(
                "trail history and streak layers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One-way lifecycle: an emitter never comes back from `Destroyed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    Active,
    Destroyed,
}

/// Result of one [`Emitter::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterUpdate {
    pub state: EmitterState,
    /// Burst center, on the frame the emitter left its ascent
    pub burst_started: Option<Vec3>,
}

/// One firework: its particles, optional trail/streak history and its clock
pub struct Emitter {
    id: EmitterId,
    config: EmitterConfig,
    settings: KinematicsSettings,
    texture: TextureHandle,
    buffer: Option<ParticleBuffer>,
    kinematics: KinematicsState,
    trail: Option<TrailHistory>,
    streaks: Option<StreakLayers>,
    primitives: Vec<PrimitiveHandle>,
    elapsed: f32,
    opacity: f32,
    state: EmitterState,
}

impl Emitter {
    /// Allocate buffers and register the emitter's point clouds with the scene.
    /// `config.origin` is taken as the final world position.
    pub fn create(
        id: EmitterId,
        config: EmitterConfig,
        settings: &KinematicsSettings,
        scene: &mut dyn Scene,
        textures: &mut dyn TextureSource,
        rng: &mut ParticleRng,
    ) -> Result<Self> {
        config.validate()?;

        let count = config.particle_count;
        let origin = config.origin;
        let buffer = ParticleBuffer::create(
            count,
            origin,
            config.firework_type,
            config.max_speed,
            rng,
        );
        let trail = config
            .trail
            .map(|limit| TrailHistory::new(count, limit, origin));
        let streaks = config
            .streaks
            .map(|layers| StreakLayers::new(layers, count, origin));

        let texture = textures.texture_for(config.color);
        let mut primitives = vec![scene.add(Primitive {
            kind: PrimitiveKind::Particles,
            emitter: id,
            texture,
            point_count: count,
            point_size: config.point_size,
        })];
        if let Some(trail) = &trail {
            primitives.push(scene.add(Primitive {
                kind: PrimitiveKind::Trail,
                emitter: id,
                texture,
                point_count: count * trail.history_limit(),
                point_size: config.point_size * 0.5,
            }));
        }
        if let Some(streaks) = &streaks {
            primitives.push(scene.add(Primitive {
                kind: PrimitiveKind::Streaks,
                emitter: id,
                texture,
                point_count: count * streaks.layer_count(),
                point_size: crate::streak::STREAK_POINT_SIZE,
            }));
        }

        log::debug!(
            "emitter {id} created: {} x{count} at ({:.1}, {:.1}, {:.1}), {:.2}s",
            config.firework_type,
            origin.x,
            origin.y,
            origin.z,
            config.duration
        );

        Ok(Self {
            id,
            kinematics: KinematicsState::new(origin),
            config,
            settings: settings.clone(),
            texture,
            buffer: Some(buffer),
            trail,
            streaks,
            primitives,
            elapsed: 0.0,
            opacity: 1.0,
            state: EmitterState::Active,
        })
    }

    /// Advance the emitter's clock and particles by `dt` seconds.
    ///
    /// Order within the call: lifetime check, kinematics, trail/streak
    /// history, opacity. Once the clock passes the duration the emitter
    /// destroys itself and no further kinematics run.
    pub fn update(&mut self, dt: f32, scene: &mut dyn Scene) -> EmitterUpdate {
        let destroyed = EmitterUpdate {
            state: EmitterState::Destroyed,
            burst_started: None,
        };
        if self.state == EmitterState::Destroyed {
            return destroyed;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        if self.elapsed > self.config.duration {
            self.destroy(scene);
            return destroyed;
        }

        let Some(buffer) = self.buffer.as_mut() else {
            return destroyed;
        };

        let outcome = kinematics::advance(
            buffer,
            &mut self.kinematics,
            profile_for(self.config.firework_type),
            &self.settings,
            dt,
            self.elapsed,
            self.config.duration,
        );

        if outcome.phase == Phase::Burst {
            if let Some(trail) = self.trail.as_mut() {
                trail.record_all(buffer);
            }
            if let Some(streaks) = self.streaks.as_mut() {
                streaks.update(buffer);
            }
        }

        let fade = self.elapsed / self.config.duration;
        let speed = buffer.mean_speed() / self.config.max_speed;
        self.opacity = fade_opacity(fade, speed);

        if let Some(center) = outcome.burst_started {
            log::debug!(
                "emitter {} burst at ({:.1}, {:.1}, {:.1})",
                self.id,
                center.x,
                center.y,
                center.z
            );
        }

        EmitterUpdate {
            state: EmitterState::Active,
            burst_started: outcome.burst_started,
        }
    }

    /// Release every buffer and scene primitive. Idempotent; returns whether
    /// this call did the release.
    pub fn destroy(&mut self, scene: &mut dyn Scene) -> bool {
        if self.state == EmitterState::Destroyed {
            return false;
        }
        for handle in self.primitives.drain(..) {
            scene.remove(handle);
            scene.dispose(handle);
        }
        self.buffer = None;
        self.trail = None;
        self.streaks = None;
        self.state = EmitterState::Destroyed;
        log::debug!("emitter {} destroyed after {:.2}s", self.id, self.elapsed);
        true
    }

    /// Snapshot for the renderer; `None` once destroyed
    pub fn frame(&self) -> Option<EmitterFrame> {
        let buffer = self.buffer.as_ref()?;
        let rgb = [self.config.color.r, self.config.color.g, self.config.color.b];
        let size = self.config.point_size;

        let particles = pack_points(buffer.positions(), size, rgb, self.opacity);
        let trail = self
            .trail
            .as_ref()
            .map(|t| pack_points(&t.materialize(), size * 0.5, rgb, self.opacity * 0.5))
            .unwrap_or_default();
        let streaks = self
            .streaks
            .as_ref()
            .map(|s| {
                let per_layer = buffer.len() * 3;
                s.materialize()
                    .chunks(per_layer)
                    .zip(s.layers())
                    .flat_map(|(positions, layer)| {
                        pack_points(positions, layer.size, rgb, layer.opacity)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(EmitterFrame {
            emitter: self.id,
            texture: self.texture,
            particles,
            trail,
            streaks,
        })
    }

    pub fn id(&self) -> EmitterId {
        self.id
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EmitterState::Active
    }

    /// Current material opacity in [0, 1]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn buffer(&self) -> Option<&ParticleBuffer> {
        self.buffer.as_ref()
    }

    pub fn trail(&self) -> Option<&TrailHistory> {
        self.trail.as_ref()
    }

    pub fn streaks(&self) -> Option<&StreakLayers> {
        self.streaks.as_ref()
    }

    pub fn burst_center(&self) -> Option<Vec3> {
        self.kinematics.burst_center()
    }

    /// Scene primitives still owned by this emitter
    pub fn primitives(&self) -> &[PrimitiveHandle] {
        &self.primitives
    }

    /// Live particles; zero once destroyed
    pub fn particle_count(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len())
    }
}

// ── TOML helpers (handle integer/float coercion) ──

pub(crate) fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

pub(crate) fn toml_vec3(v: &toml::Value, default: [f32; 3]) -> [f32; 3] {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 3 {
            return [
                toml_f32(&arr[0], default[0]),
                toml_f32(&arr[1], default[1]),
                toml_f32(&arr[2], default[2]),
            ];
        }
    }
    default
}

fn toml_color(v: &toml::Value) -> Result<Color> {
    if let Some(s) = v.as_str() {
        return Color::parse(s);
    }
    if let Some(i) = v.as_integer() {
        if (0..=0xFF_FFFF).contains(&i) {
            return Ok(Color::from_hex(i as u32));
        }
    }
    Err(PyroError::InvalidColor(v.to_string()))
}

/// Integers, or floats with no fractional part
pub(crate) fn toml_integer(v: &toml::Value) -> Option<i64> {
    v.as_integer().or_else(|| {
        v.as_float()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// `true` → default count, `false` → disabled, number → that count
fn toml_optional_count(v: &toml::Value, default: usize) -> Option<usize> {
    match v {
        toml::Value::Boolean(true) => Some(default),
        toml::Value::Boolean(false) => None,
        _ => toml_integer(v).map(|i| i.max(0) as usize),
    }
}
