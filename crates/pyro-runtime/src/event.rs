//! Show lifecycle events

use pyro_core::{EmitterId, FireworkType, Vec3};
use serde::Serialize;

/// Something that happened to an emitter during a tick
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShowEvent {
    /// A delayed launch was accepted and is waiting for its delay to expire
    Scheduled {
        id: EmitterId,
        firework_type: FireworkType,
        delay: f32,
    },
    /// An emitter was created and registered its primitives
    Launched {
        id: EmitterId,
        firework_type: FireworkType,
        origin: Vec3,
    },
    /// The emitter left its ascent phase; `center` is the highest point reached
    Burst { id: EmitterId, center: Vec3 },
    /// The emitter released its buffers and left the registry
    Destroyed { id: EmitterId, elapsed: f32 },
    /// A launch request failed validation and created nothing
    Rejected { reason: String },
}

impl ShowEvent {
    /// The emitter this event concerns, if any
    pub fn emitter(&self) -> Option<EmitterId> {
        match self {
            ShowEvent::Scheduled { id, .. }
            | ShowEvent::Launched { id, .. }
            | ShowEvent::Burst { id, .. }
            | ShowEvent::Destroyed { id, .. } => Some(*id),
            ShowEvent::Rejected { .. } => None,
        }
    }
}
