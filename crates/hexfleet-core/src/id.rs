//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a part slot within a vessel's part arena.
///
/// Slots are handed out sequentially and never reused, so a `PartId`
/// that outlives its part resolves to nothing instead of to a stranger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

impl PartId {
    /// The arena slot index this id points at.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PartId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`VesselId`] allocation.
static VESSEL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a vessel.
///
/// Parts keep their owner's `VesselId` as a non-owning back-reference:
/// the vessel exclusively owns its parts, the id only names it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VesselId(u64);

impl VesselId {
    /// Allocate a fresh, unique vessel id. Thread-safe.
    pub fn next() -> Self {
        Self(VESSEL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
