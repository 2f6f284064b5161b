//! Structure-of-arrays particle storage

use crate::rand::ParticleRng;
use pyro_core::{FireworkType, Vec3};
use std::f32::consts::TAU;

/// How a firework type spreads its initial horizontal velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadFamily {
    /// Horizontal speed along X only; the burst profile supplies depth
    Planar,
    /// Strong sideways bias along X
    Windy,
    /// Even spread over the horizontal plane
    Radial,
}

impl SpreadFamily {
    pub fn of(firework_type: FireworkType) -> Self {
        match firework_type {
            FireworkType::Default
            | FireworkType::Boom
            | FireworkType::Megaphone
            | FireworkType::Vase => SpreadFamily::Planar,
            FireworkType::Windy => SpreadFamily::Windy,
            _ => SpreadFamily::Radial,
        }
    }
}

/// Positions and velocities for a fixed set of particles.
///
/// Particle `i` lives at `3i..3i+3` of both arrays. The arrays always have
/// the same length, a multiple of three, and never grow or shrink.
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    velocities: Vec<f32>,
}

impl ParticleBuffer {
    /// Spawn `count` particles at `origin` with type-dependent launch velocities
    pub fn create(
        count: usize,
        origin: Vec3,
        firework_type: FireworkType,
        max_speed: f32,
        rng: &mut ParticleRng,
    ) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut velocities = Vec::with_capacity(count * 3);
        let family = SpreadFamily::of(firework_type);
        let slot = if count > 0 { TAU / count as f32 } else { 0.0 };
        let speed = 0.5 * max_speed;

        for i in 0..count {
            let angle = slot * i as f32 + rng.range(0.0, slot);
            let upward = rng.range(0.3, 0.6) * max_speed;

            positions.extend_from_slice(&origin.to_array());
            let velocity = match family {
                SpreadFamily::Planar => [angle.sin() * speed, upward, 0.0],
                SpreadFamily::Windy => [
                    angle.cos() * speed * 4.0,
                    upward,
                    angle.sin() * speed * 0.5,
                ],
                SpreadFamily::Radial => [
                    angle.cos() * speed * 0.5,
                    upward,
                    angle.sin() * speed * 0.5,
                ],
            };
            velocities.extend_from_slice(&velocity);
        }

        Self {
            positions,
            velocities,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions, i)
    }

    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.velocities, i)
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
    }

    pub fn set_velocity(&mut self, i: usize, v: Vec3) {
        self.velocities[i * 3..i * 3 + 3].copy_from_slice(&v.to_array());
    }

    pub fn speed(&self, i: usize) -> f32 {
        self.velocity(i).length()
    }

    /// Average velocity magnitude; zero for an empty buffer
    pub fn mean_speed(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let total: f32 = (0..self.len()).map(|i| self.speed(i)).sum();
        total / self.len() as f32
    }

    /// Flat `[x0, y0, z0, x1, ...]` positions
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(count: usize, t: FireworkType) -> ParticleBuffer {
        let mut rng = ParticleRng::new(42);
        ParticleBuffer::create(count, Vec3::new(1.0, 2.0, 3.0), t, 20.0, &mut rng)
    }

    #[test]
    fn arrays_match_particle_count() {
        for t in FireworkType::ALL {
            for count in [1, 7, 50] {
                let b = buffer(count, t);
                assert_eq!(b.positions().len(), 3 * count);
                assert_eq!(b.velocities().len(), 3 * count);
                assert_eq!(b.len(), count);
            }
        }
    }

    #[test]
    fn every_particle_starts_at_origin() {
        let b = buffer(25, FireworkType::Peony);
        for i in 0..b.len() {
            assert_eq!(b.position(i), Vec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn empty_buffer_has_no_effect() {
        let b = buffer(0, FireworkType::Default);
        assert!(b.is_empty());
        assert_eq!(b.mean_speed(), 0.0);
    }

    #[test]
    fn planar_types_have_no_depth_velocity() {
        let b = buffer(30, FireworkType::Boom);
        for i in 0..b.len() {
            assert_eq!(b.velocity(i).z, 0.0);
        }
    }

    #[test]
    fn windy_biases_horizontal_speed() {
        let windy = buffer(64, FireworkType::Windy);
        let radial = buffer(64, FireworkType::Flower);
        let max_x = |b: &ParticleBuffer| {
            (0..b.len())
                .map(|i| b.velocity(i).x.abs())
                .fold(0.0f32, f32::max)
        };
        assert!(max_x(&windy) > 4.0 * max_x(&radial) * 0.9);
    }

    #[test]
    fn upward_speed_in_launch_band() {
        let b = buffer(100, FireworkType::Comet);
        for i in 0..b.len() {
            let vy = b.velocity(i).y;
            assert!((6.0..12.0).contains(&vy), "vy = {vy}");
        }
    }

    #[test]
    fn creation_is_deterministic_for_a_seed() {
        let a = buffer(40, FireworkType::Ring);
        let b = buffer(40, FireworkType::Ring);
        assert_eq!(a.velocities(), b.velocities());
    }
}
