//! Render snapshots handed to the host each frame

use bytemuck::{Pod, Zeroable};
use pyro_core::{EmitterId, TextureHandle};

/// One point of a point cloud, matching a `vec4 pos_size, vec4 color` vertex.
/// 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// xyz = position, w = point size
    pub pos_size: [f32; 4],
    /// rgb = color, a = opacity
    pub color: [f32; 4],
}

impl PointVertex {
    pub fn new(position: &[f32], size: f32, rgb: [f32; 3], opacity: f32) -> Self {
        Self {
            pos_size: [position[0], position[1], position[2], size],
            color: [rgb[0], rgb[1], rgb[2], opacity],
        }
    }
}

/// Pack a flat xyz array into vertices sharing one size/color/opacity
pub fn pack_points(positions: &[f32], size: f32, rgb: [f32; 3], opacity: f32) -> Vec<PointVertex> {
    positions
        .chunks_exact(3)
        .map(|p| PointVertex::new(p, size, rgb, opacity))
        .collect()
}

/// Everything the renderer needs to draw one emitter this frame.
///
/// A read-only snapshot: it stays valid after the next tick mutates the
/// emitter.
#[derive(Debug, Clone)]
pub struct EmitterFrame {
    pub emitter: EmitterId,
    pub texture: TextureHandle,
    pub particles: Vec<PointVertex>,
    pub trail: Vec<PointVertex>,
    pub streaks: Vec<PointVertex>,
}

impl EmitterFrame {
    /// Flat float view of the particle cloud, 8 floats per point
    pub fn particle_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn trail_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.trail)
    }

    pub fn streak_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.streaks)
    }

    pub fn point_count(&self) -> usize {
        self.particles.len() + self.trail.len() + self.streaks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_vertex_layout() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 32);
        assert_eq!(std::mem::align_of::<PointVertex>(), 4);
    }

    #[test]
    fn packing_and_float_view() {
        let positions = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let points = pack_points(&positions, 2.0, [1.0, 0.5, 0.0], 0.25);
        assert_eq!(points.len(), 2);

        let frame = EmitterFrame {
            emitter: EmitterId(1),
            texture: TextureHandle(0),
            particles: points,
            trail: Vec::new(),
            streaks: Vec::new(),
        };
        let floats = frame.particle_floats();
        assert_eq!(floats.len(), 16);
        assert_eq!(&floats[8..12], &[4.0, 5.0, 6.0, 2.0]);
        assert_eq!(floats[15], 0.25);
        assert_eq!(frame.point_count(), 2);
    }
}
