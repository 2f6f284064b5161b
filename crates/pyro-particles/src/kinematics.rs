//! Per-frame particle integration: the ascent/burst phase machine and the
//! per-type burst profiles.
//!
//! An emitter's particles go through two windows selected purely by
//! `elapsed / duration`:
//!
//! - **Ascent**: particles climb along +Y, later indices lagging behind,
//!   and freeze once they pass the height ceiling.
//! - **Burst**: gravity, drag and the apex clamp act on the velocities,
//!   then the type's profile fans the particles out around the angle
//!   `2π·i/N`.
//!
//! Profiles are data: one [`BurstProfile`] row per [`FireworkType`] in a
//! static table, all driven through the [`KinematicsProfile`] trait.

use crate::particle::ParticleBuffer;
use crate::rand::index_jitter;
use pyro_core::{FireworkType, PyroError, Result, Vec3};
use std::f32::consts::TAU;

/// Tunable constants shared by every profile
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsSettings {
    /// Fraction of the duration spent in the ascent phase
    pub ascent_ratio: f32,
    /// Height above the emitter origin where ascending particles freeze
    pub height_ceiling: f32,
    /// Constant upward push during ascent, units/s
    pub ascent_thrust: f32,
    /// Per-frame fraction of horizontal velocity applied during ascent (x, z)
    pub ascent_lateral: [f32; 2],
    pub gravity: f32,
    /// Per-frame multiplier on horizontal velocity during burst
    pub drag: f32,
    /// Vertical speed below which the apex decay kicks in
    pub apex_speed: f32,
    pub apex_decay: f32,
}

impl Default for KinematicsSettings {
    fn default() -> Self {
        Self {
            ascent_ratio: 0.2,
            height_ceiling: 60.0,
            ascent_thrust: 100.0,
            ascent_lateral: [0.00002, 0.0006],
            gravity: 9.8,
            drag: 0.97,
            apex_speed: 5.0,
            apex_decay: 0.9,
        }
    }
}

impl KinematicsSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("ascent_ratio", self.ascent_ratio, 0.0, 1.0)?;
        check_range("drag", self.drag, 0.0, 1.0)?;
        check_range("apex_decay", self.apex_decay, 0.0, 1.0)?;
        check_range("height_ceiling", self.height_ceiling, 0.0, f32::MAX)?;
        check_range("gravity", self.gravity, 0.0, f32::MAX)?;
        check_range("apex_speed", self.apex_speed, 0.0, f32::MAX)?;
        if !self.ascent_thrust.is_finite() {
            return Err(PyroError::InvalidConfig("ascent_thrust must be finite".into()));
        }
        Ok(())
    }

    /// Which window `elapsed` falls in for a profile
    pub fn phase_at(&self, profile: &dyn KinematicsProfile, elapsed: f32, duration: f32) -> Phase {
        if !profile.has_ascent() || elapsed > duration * self.ascent_ratio {
            Phase::Burst
        } else {
            Phase::Ascent
        }
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(PyroError::ValueOutOfRange {
            field: field.to_string(),
            min: min as f64,
            max: max as f64,
            value: value as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ascent,
    Burst,
}

/// Where particle `index` of `count` sits in the current frame
#[derive(Debug, Clone, Copy)]
pub struct ParticleStep {
    pub index: usize,
    pub count: usize,
    pub dt: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl ParticleStep {
    /// Evenly distributed fan angle, `2π·i/N`
    pub fn angle(&self) -> f32 {
        TAU * self.index as f32 / self.count as f32
    }
}

/// Shape of one firework type.
///
/// Implementations are pure: they compute a position delta from the
/// particle's index and current state and hold no mutable state of their
/// own. Velocity integration and the ascent ceiling are applied by
/// [`advance`] around these calls.
pub trait KinematicsProfile {
    /// Position delta while climbing. The default models a nozzle spray:
    /// later-indexed particles get a smaller share of their launch speed.
    fn ascent(&self, step: &ParticleStep, velocity: Vec3, settings: &KinematicsSettings) -> Vec3 {
        let lag = 1.0 - step.index as f32 / step.count as f32;
        Vec3::new(
            velocity.x * settings.ascent_lateral[0],
            (velocity.y * lag + settings.ascent_thrust) * step.dt,
            velocity.z * settings.ascent_lateral[1],
        )
    }

    /// Position delta after the shared forces updated `velocity`
    fn burst(&self, step: &ParticleStep, velocity: Vec3, settings: &KinematicsSettings) -> Vec3;

    /// Profiles without an ascent burst from the first frame
    fn has_ascent(&self) -> bool {
        true
    }

    /// How many burst steps run this frame
    fn burst_passes(&self, _elapsed: f32, _duration: f32) -> usize {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BurstRadius {
    Fixed(f32),
    /// `min + index_jitter(i) * span`, stable per particle
    Jittered { min: f32, span: f32 },
}

impl BurstRadius {
    pub fn at(&self, index: usize) -> f32 {
        match *self {
            BurstRadius::Fixed(r) => r,
            BurstRadius::Jittered { min, span } => min + index_jitter(index) * span,
        }
    }
}

/// Which trigonometric term drives depth (Z) motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTerm {
    None,
    Sin,
    Cos,
}

/// Table-driven profile covering every built-in firework type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstProfile {
    pub radius: BurstRadius,
    /// Fraction of horizontal velocity carried into X each frame
    pub carry: f32,
    /// Rate of the radial X term `cos θ · r · dt · rate`
    pub lateral_rate: f32,
    /// Scale vertical velocity by `sin θ`, flattening the burst into a disc
    pub vertical_sine: bool,
    pub gravity_scale: f32,
    pub depth: DepthTerm,
    pub depth_rate: f32,
    pub has_ascent: bool,
    /// Fraction of the duration after which a second burst step runs each frame
    pub second_burst: Option<f32>,
}

impl BurstProfile {
    const fn fan(radius: f32, carry: f32, lateral_rate: f32) -> Self {
        Self {
            radius: BurstRadius::Fixed(radius),
            carry,
            lateral_rate,
            vertical_sine: false,
            gravity_scale: 1.0,
            depth: DepthTerm::Sin,
            depth_rate: 2.0,
            has_ascent: true,
            second_burst: None,
        }
    }
}

const FAN: BurstProfile = BurstProfile::fan(5.0, 0.01, 2.0);

const DEFAULT: BurstProfile = BurstProfile {
    radius: BurstRadius::Fixed(10.0),
    carry: 0.001,
    vertical_sine: true,
    depth: DepthTerm::Cos,
    ..FAN
};

const BOOM: BurstProfile = BurstProfile {
    lateral_rate: 5.0,
    vertical_sine: true,
    gravity_scale: 0.5,
    depth: DepthTerm::None,
    second_burst: Some(0.4),
    ..FAN
};

const MEGAPHONE: BurstProfile = BurstProfile {
    carry: 0.4,
    vertical_sine: true,
    depth: DepthTerm::None,
    ..FAN
};

const WINDY: BurstProfile = BurstProfile {
    lateral_rate: 10.0,
    ..FAN
};

const CHRYSANTHEMUM: BurstProfile = BurstProfile {
    radius: BurstRadius::Jittered {
        min: 4.0,
        span: 5.0,
    },
    carry: 0.0,
    lateral_rate: 3.0,
    depth_rate: 3.0,
    has_ascent: false,
    ..FAN
};

/// Indexed by [`FireworkType::index`]
static PROFILES: [BurstProfile; 13] = [
    DEFAULT,       // default
    BOOM,          // boom
    FAN,           // flower
    MEGAPHONE,     // megaphone
    WINDY,         // windy
    FAN,           // vase
    FAN,           // ring
    FAN,           // willow
    FAN,           // peony
    CHRYSANTHEMUM, // chrysanthemum
    FAN,           // palm
    FAN,           // crosette
    FAN,           // comet
];

/// The built-in profile for a firework type
pub fn profile_for(firework_type: FireworkType) -> &'static BurstProfile {
    &PROFILES[firework_type.index()]
}

impl KinematicsProfile for BurstProfile {
    fn burst(&self, step: &ParticleStep, velocity: Vec3, settings: &KinematicsSettings) -> Vec3 {
        let angle = step.angle();
        let (sin, cos) = angle.sin_cos();
        let radius = self.radius.at(step.index);
        let dt = step.dt;

        let vertical = if self.vertical_sine { sin } else { 1.0 };
        let depth = match self.depth {
            DepthTerm::None => 0.0,
            DepthTerm::Sin => sin * radius * dt * self.depth_rate,
            DepthTerm::Cos => cos * radius * dt * self.depth_rate,
        };

        Vec3::new(
            velocity.x * self.carry + cos * radius * dt * self.lateral_rate,
            velocity.y * dt * vertical - settings.gravity * dt * self.gravity_scale,
            depth,
        )
    }

    fn has_ascent(&self) -> bool {
        self.has_ascent
    }

    fn burst_passes(&self, elapsed: f32, duration: f32) -> usize {
        match self.second_burst {
            Some(ratio) if elapsed > duration * ratio => 2,
            _ => 1,
        }
    }
}

/// Per-emitter bookkeeping the phases share across frames
#[derive(Debug, Clone)]
pub struct KinematicsState {
    origin: Vec3,
    peak: Option<Vec3>,
    burst_center: Option<Vec3>,
}

impl KinematicsState {
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            peak: None,
            burst_center: None,
        }
    }

    /// Highest particle position seen during ascent so far
    pub fn peak(&self) -> Option<Vec3> {
        self.peak
    }

    /// The latched burst center; set on the first burst frame
    pub fn burst_center(&self) -> Option<Vec3> {
        self.burst_center
    }
}

/// What one call to [`advance`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub phase: Phase,
    /// Set on the frame the burst latch fired
    pub burst_started: Option<Vec3>,
}

/// Shared burst-phase forces: gravity on Y, drag on X/Z, apex decay
pub fn integrate_velocity(velocity: Vec3, settings: &KinematicsSettings, dt: f32) -> Vec3 {
    let mut v = Vec3::new(
        velocity.x * settings.drag,
        velocity.y - settings.gravity * dt,
        velocity.z * settings.drag,
    );
    if v.y.abs() < settings.apex_speed {
        v.y *= settings.apex_decay;
    }
    v
}

/// Advance every particle in `buffer` by one frame
pub fn advance(
    buffer: &mut ParticleBuffer,
    state: &mut KinematicsState,
    profile: &dyn KinematicsProfile,
    settings: &KinematicsSettings,
    dt: f32,
    elapsed: f32,
    duration: f32,
) -> StepOutcome {
    let count = buffer.len();
    let phase = settings.phase_at(profile, elapsed, duration);
    let mut burst_started = None;

    match phase {
        Phase::Ascent => {
            let ceiling = state.origin.y + settings.height_ceiling;
            for index in 0..count {
                let position = buffer.position(index);
                if position.y > ceiling {
                    continue;
                }
                let step = ParticleStep {
                    index,
                    count,
                    dt,
                    elapsed,
                    duration,
                };
                let next = position + profile.ascent(&step, buffer.velocity(index), settings);
                buffer.set_position(index, next);

                if state.peak.map_or(true, |peak| next.y > peak.y) {
                    state.peak = Some(next);
                }
            }
        }
        Phase::Burst => {
            if state.burst_center.is_none() {
                let center = state.peak.unwrap_or(state.origin);
                state.burst_center = Some(center);
                burst_started = Some(center);
            }

            for _ in 0..profile.burst_passes(elapsed, duration) {
                for index in 0..count {
                    let step = ParticleStep {
                        index,
                        count,
                        dt,
                        elapsed,
                        duration,
                    };
                    let velocity = integrate_velocity(buffer.velocity(index), settings, dt);
                    buffer.set_velocity(index, velocity);
                    let next = buffer.position(index) + profile.burst(&step, velocity, settings);
                    buffer.set_position(index, next);
                }
            }
        }
    }

    StepOutcome {
        phase,
        burst_started,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::ParticleRng;

    const DT: f32 = 1.0 / 60.0;

    fn setup(t: FireworkType, count: usize) -> (ParticleBuffer, KinematicsState) {
        let mut rng = ParticleRng::new(9);
        let buffer = ParticleBuffer::create(count, Vec3::ZERO, t, 20.0, &mut rng);
        (buffer, KinematicsState::new(Vec3::ZERO))
    }

    fn run(
        buffer: &mut ParticleBuffer,
        state: &mut KinematicsState,
        t: FireworkType,
        elapsed: f32,
        duration: f32,
    ) -> StepOutcome {
        advance(
            buffer,
            state,
            profile_for(t),
            &KinematicsSettings::default(),
            DT,
            elapsed,
            duration,
        )
    }

    #[test]
    fn ascent_climbs_and_later_particles_lag() {
        let (mut buffer, mut state) = setup(FireworkType::Peony, 20);
        let outcome = run(&mut buffer, &mut state, FireworkType::Peony, 0.1, 3.0);
        assert_eq!(outcome.phase, Phase::Ascent);
        assert!(outcome.burst_started.is_none());

        let first = buffer.position(0).y;
        let last = buffer.position(19).y;
        assert!(first > 0.0);
        assert!(first > last);

        let peak = state.peak().unwrap();
        for i in 0..buffer.len() {
            assert!(peak.y >= buffer.position(i).y);
        }
    }

    #[test]
    fn particles_above_ceiling_freeze() {
        let (mut buffer, mut state) = setup(FireworkType::Flower, 4);
        buffer.set_position(2, Vec3::new(0.0, 61.0, 0.0));
        run(&mut buffer, &mut state, FireworkType::Flower, 0.1, 3.0);
        assert_eq!(buffer.position(2), Vec3::new(0.0, 61.0, 0.0));
        assert!(buffer.position(1).y > 0.0);
    }

    #[test]
    fn ceiling_is_relative_to_origin() {
        let mut rng = ParticleRng::new(3);
        let origin = Vec3::new(0.0, 100.0, 0.0);
        let mut buffer = ParticleBuffer::create(3, origin, FireworkType::Ring, 20.0, &mut rng);
        let mut state = KinematicsState::new(origin);
        run(&mut buffer, &mut state, FireworkType::Ring, 0.1, 3.0);
        assert!(buffer.position(0).y > 100.0);
    }

    #[test]
    fn burst_latches_peak_once() {
        let (mut buffer, mut state) = setup(FireworkType::Ring, 10);
        for frame in 1..=30 {
            run(&mut buffer, &mut state, FireworkType::Ring, frame as f32 * DT, 3.0);
        }
        let peak = state.peak().unwrap();

        let first = run(&mut buffer, &mut state, FireworkType::Ring, 0.7, 3.0);
        assert_eq!(first.phase, Phase::Burst);
        assert_eq!(first.burst_started, Some(peak));
        assert_eq!(state.burst_center(), Some(peak));

        let second = run(&mut buffer, &mut state, FireworkType::Ring, 0.72, 3.0);
        assert!(second.burst_started.is_none());
        assert_eq!(state.burst_center(), Some(peak));
    }

    #[test]
    fn burst_applies_gravity_and_drag() {
        let (mut buffer, mut state) = setup(FireworkType::Flower, 8);
        let before = buffer.velocity(3);
        run(&mut buffer, &mut state, FireworkType::Flower, 1.0, 3.0);
        let after = buffer.velocity(3);
        assert!(after.y < before.y);
        assert!((after.x - before.x * 0.97).abs() < 1e-5);
        assert!((after.z - before.z * 0.97).abs() < 1e-5);
    }

    #[test]
    fn apex_decay_damps_slow_vertical_speed() {
        let settings = KinematicsSettings::default();
        let v = integrate_velocity(Vec3::new(0.0, 2.0, 0.0), &settings, DT);
        let expected = (2.0 - 9.8 * DT) * 0.9;
        assert!((v.y - expected).abs() < 1e-6);

        let fast = integrate_velocity(Vec3::new(0.0, 20.0, 0.0), &settings, DT);
        assert!((fast.y - (20.0 - 9.8 * DT)).abs() < 1e-6);
    }

    #[test]
    fn fan_spreads_symmetrically() {
        let step = |index| ParticleStep {
            index,
            count: 16,
            dt: DT,
            elapsed: 1.0,
            duration: 3.0,
        };
        let settings = KinematicsSettings::default();
        let profile = profile_for(FireworkType::Peony);
        let total = (0..16).fold(Vec3::ZERO, |acc, i| {
            acc + profile.burst(&step(i), Vec3::ZERO, &settings)
        });
        assert!(total.x.abs() < 1e-4);
        assert!(total.z.abs() < 1e-4);
    }

    #[test]
    fn planar_profiles_stay_flat() {
        let settings = KinematicsSettings::default();
        for t in [FireworkType::Boom, FireworkType::Megaphone] {
            let step = ParticleStep {
                index: 3,
                count: 10,
                dt: DT,
                elapsed: 1.0,
                duration: 3.0,
            };
            let delta = profile_for(t).burst(&step, Vec3::new(1.0, 1.0, 1.0), &settings);
            assert_eq!(delta.z, 0.0);
        }
    }

    #[test]
    fn chrysanthemum_bursts_immediately() {
        let (mut buffer, mut state) = setup(FireworkType::Chrysanthemum, 12);
        let outcome = run(&mut buffer, &mut state, FireworkType::Chrysanthemum, DT, 3.0);
        assert_eq!(outcome.phase, Phase::Burst);
        assert_eq!(outcome.burst_started, Some(Vec3::ZERO));
    }

    #[test]
    fn chrysanthemum_radius_is_stable_per_particle() {
        let radius = profile_for(FireworkType::Chrysanthemum).radius;
        for i in 0..32 {
            let r = radius.at(i);
            assert!((4.0..9.0).contains(&r));
            assert_eq!(r, radius.at(i));
        }
    }

    #[test]
    fn boom_runs_second_pass_late() {
        let boom = profile_for(FireworkType::Boom);
        assert_eq!(boom.burst_passes(1.0, 3.0), 1);
        assert_eq!(boom.burst_passes(1.5, 3.0), 2);
        assert_eq!(profile_for(FireworkType::Flower).burst_passes(2.9, 3.0), 1);
    }

    #[test]
    fn table_has_a_profile_per_type() {
        for t in FireworkType::ALL {
            let _ = profile_for(t);
        }
        assert_eq!(profile_for(FireworkType::Default).radius, BurstRadius::Fixed(10.0));
        assert_eq!(profile_for(FireworkType::Windy).lateral_rate, 10.0);
    }

    #[test]
    fn settings_validation() {
        assert!(KinematicsSettings::default().validate().is_ok());
        let bad = KinematicsSettings {
            ascent_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(PyroError::ValueOutOfRange { .. })
        ));
        let nan = KinematicsSettings {
            drag: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
