//! Pyro Core - Foundational types for the pyro firework engine
//!
//! This crate provides the types that all other pyro crates depend on:
//! - `EmitterId` - Per-registry emitter identifiers
//! - `Vec3`, `Color` - Spatial and color types
//! - `FireworkType` - Shape profile selector
//! - `Scene`, `TextureSource` - Collaborator interfaces implemented by the host
//! - Error types and Result alias

mod error;
mod firework;
mod id;
mod scene;
mod types;

pub use error::{PyroError, Result};
pub use firework::FireworkType;
pub use id::EmitterId;
pub use scene::{Primitive, PrimitiveHandle, PrimitiveKind, Scene, TextureHandle, TextureSource};
pub use types::{Color, Vec3};
