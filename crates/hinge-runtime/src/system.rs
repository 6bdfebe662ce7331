//! Runtime system trait

use crate::event_bus::EventBus;
use hinge_core::Result;

/// A system that can be ticked by the game loop
///
/// Systems are updated in registration order. Fixed update runs at a constant
/// rate and carries all simulation state changes; update runs once per frame.
/// Anything a system wants other systems to see goes through the bus.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, events: &mut EventBus) -> Result<()>;

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, events: &mut EventBus, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, events: &mut EventBus, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
