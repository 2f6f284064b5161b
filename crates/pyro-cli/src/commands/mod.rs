//! CLI command implementations

pub mod launch;
pub mod playback;
pub mod simulate;
pub mod types;
pub mod validate;
