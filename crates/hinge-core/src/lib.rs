//! Hinge Core - Foundational types for the Hinge mover engine
//!
//! This crate provides the core types that all other Hinge crates depend on:
//! - `EntityId` / `IdAllocator` - Stable identifiers for movers, triggers and activators
//! - `Vec3` - Spatial vector used for keyframe positions and orientations
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{HingeError, Result};
pub use id::{EntityId, IdAllocator};
pub use types::{wrap_angle, Vec3};
