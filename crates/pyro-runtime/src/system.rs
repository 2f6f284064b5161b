//! Runtime system trait

use pyro_core::{Result, Scene};

/// A system that can be ticked by the frame driver
///
/// `update` runs once per frame with the frame's delta.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, scene: &mut dyn Scene) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, scene: &mut dyn Scene, dt: f64) -> Result<()>;

    /// Called when the driver shuts down; must release everything it added to the scene
    fn shutdown(&mut self, scene: &mut dyn Scene) -> Result<()>;

    /// Whether the system still has work to do; drivers may stop once all are idle
    fn is_idle(&self) -> bool {
        false
    }

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
