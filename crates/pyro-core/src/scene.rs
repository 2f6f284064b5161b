//! Collaborator interfaces the host rendering layer implements
//!
//! The simulation never draws anything itself. Emitters register one
//! primitive per point cloud when they are created and release them on
//! destruction; everything in between is read through render snapshots.

use crate::id::EmitterId;
use crate::types::Color;
use serde::{Deserialize, Serialize};

/// Opaque handle to a primitive the scene accepted
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveHandle(pub u64);

/// Opaque handle to a sprite texture
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureHandle(pub u32);

/// What kind of point cloud a primitive draws
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Particles,
    Trail,
    Streaks,
}

/// Description of a point cloud handed to the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub emitter: EmitterId,
    pub texture: TextureHandle,
    pub point_count: usize,
    /// Base point size before per-frame fading
    pub point_size: f32,
}

/// The render graph emitters add to and remove from
pub trait Scene {
    /// Register a primitive; the scene draws it until removed
    fn add(&mut self, primitive: Primitive) -> PrimitiveHandle;

    /// Stop drawing a primitive
    fn remove(&mut self, handle: PrimitiveHandle);

    /// Release the geometry and material behind a removed primitive
    fn dispose(&mut self, handle: PrimitiveHandle);
}

/// Supplies one sprite texture per color
pub trait TextureSource {
    fn texture_for(&mut self, color: Color) -> TextureHandle;
}
