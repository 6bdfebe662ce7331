//! Hinge Runtime - Game loop infrastructure
//!
//! Provides the core game loop building blocks:
//! - `GameClock` — fixed-timestep accumulator for deterministic simulation
//! - `GameEvent` / `EventBus` — typed event queue for inter-system communication
//! - `RuntimeSystem` — trait for systems ticked by the game loop

mod clock;
mod event;
mod event_bus;
mod system;

pub use clock::GameClock;
pub use event::GameEvent;
pub use event_bus::EventBus;
pub use system::RuntimeSystem;
