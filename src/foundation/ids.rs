use std::sync::atomic::{AtomicU32, Ordering};

/// Identity index of a flame, also used as the owner handle held by iterators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct FlameId(pub u32);

/// Stable identity of an iterator within its owning collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct IteratorId(pub u32);

/// Hands out flame ids; owned by whatever constructs flames (see [`crate::Session`]).
///
/// Ids start at 1 and increase monotonically. Copies reuse the id of their
/// source and never draw from the allocator.
#[derive(Debug, Default)]
pub struct FlameIdAllocator {
    issued: AtomicU32,
}

impl FlameIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self) -> FlameId {
        FlameId(self.issued.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::Relaxed)
    }
}
