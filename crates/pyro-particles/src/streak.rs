//! Streak layers: delayed copies of the particle set that fake motion blur

use crate::particle::ParticleBuffer;
use crate::trail::TrailHistory;
use pyro_core::Vec3;

/// Frames between consecutive streak layers
pub const LAYER_SPACING: usize = 2;
/// Layers stop fading once they reach these floors
pub const OPACITY_FLOOR: f32 = 0.1;
pub const SIZE_FLOOR: f32 = 0.5;
/// Streak points start slightly smaller than the particles they follow
pub const STREAK_POINT_SIZE: f32 = 1.8;

/// Per-layer draw parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakLayer {
    pub opacity: f32,
    pub size: f32,
}

/// `layers` history-delayed copies of an emitter's particles.
///
/// Layer `l` shows where the particles were `2(l+1)` frames ago. Until
/// that many frames have been recorded the layer's points sit at the
/// emitter origin.
#[derive(Debug, Clone)]
pub struct StreakLayers {
    history: TrailHistory,
    layers: Vec<StreakLayer>,
    positions: Vec<f32>,
    particle_count: usize,
    origin: Vec3,
    streak_buffer: usize,
}

impl StreakLayers {
    pub fn new(layers: usize, particle_count: usize, origin: Vec3) -> Self {
        let depth = LAYER_SPACING * layers + 1;
        let mut positions = Vec::with_capacity(layers * particle_count * 3);
        for _ in 0..layers * particle_count {
            positions.extend_from_slice(&origin.to_array());
        }
        Self {
            history: TrailHistory::new(particle_count, depth, origin),
            layers: vec![
                StreakLayer {
                    opacity: 1.0,
                    size: STREAK_POINT_SIZE,
                };
                layers
            ],
            positions,
            particle_count,
            origin,
            streak_buffer: 0,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[StreakLayer] {
        &self.layers
    }

    /// Frames fed into the streaks so far
    pub fn streak_buffer(&self) -> usize {
        self.streak_buffer
    }

    /// Feed the particles' freshly integrated positions and refresh every layer
    pub fn update(&mut self, buffer: &ParticleBuffer) {
        self.history.record_all(buffer);
        self.streak_buffer += 1;

        for (layer_index, layer) in self.layers.iter_mut().enumerate() {
            let age = LAYER_SPACING * (layer_index + 1);
            for particle in 0..self.particle_count {
                let p = self
                    .history
                    .sample(particle, age)
                    .unwrap_or(self.origin);
                let offset = (layer_index * self.particle_count + particle) * 3;
                self.positions[offset..offset + 3].copy_from_slice(&p.to_array());
            }
            fade_layer(layer, layer_index);
        }
    }

    /// Flat positions, layer-major then particle order
    pub fn materialize(&self) -> &[f32] {
        &self.positions
    }

    pub fn position(&self, layer: usize, particle: usize) -> Vec3 {
        Vec3::from_slice(&self.positions, layer * self.particle_count + particle)
    }
}

/// `opacity -= 0.005^(l+1)` and `size -= 0.0005^(l+1)`, each until its floor
fn fade_layer(layer: &mut StreakLayer, layer_index: usize) {
    let exponent = layer_index as i32 + 1;
    if layer.opacity == 0.0 {
        layer.opacity = 1.0;
    }
    if layer.opacity > OPACITY_FLOOR {
        layer.opacity = (layer.opacity - 0.005f32.powi(exponent)).max(OPACITY_FLOOR);
    }
    if layer.size > SIZE_FLOOR {
        layer.size = (layer.size - 0.0005f32.powi(exponent)).max(SIZE_FLOOR);
    }
}
