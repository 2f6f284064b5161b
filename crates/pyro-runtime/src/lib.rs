//! Pyro Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the host drives a show with:
//! - `FrameClock`: per-frame deltas, wall-clock or explicit
//! - `RuntimeSystem`: trait for systems ticked by the frame driver
//! - `FrameDriver`: the single owner of the per-frame `update` call
//! - `ShowEvent` / `EventBus`: lifecycle events drained by the host
//! - `SceneGraph`: in-memory `Scene` for headless runs

mod clock;
mod driver;
mod event;
mod event_bus;
mod scene_graph;
mod system;

pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use driver::FrameDriver;
pub use event::ShowEvent;
pub use event_bus::{EventBus, DEFAULT_EVENT_LIMIT};
pub use scene_graph::SceneGraph;
pub use system::RuntimeSystem;
