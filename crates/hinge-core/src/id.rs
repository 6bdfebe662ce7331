//! Stable identifiers for movers, triggers and activators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every level object the mover subsystem talks about:
/// the movers themselves, the triggers that activate them, the entities that
/// block them, and the items linked from keyframes.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-level id source for objects a level file leaves unnamed.
///
/// Owned by the level rather than the process, so the ids a level hands out
/// depend only on its own contents and two loads of one file agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out `id` or anything below it.
    pub fn reserve_through(&mut self, id: EntityId) {
        self.next = self.next.max(id.0.saturating_add(1));
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
