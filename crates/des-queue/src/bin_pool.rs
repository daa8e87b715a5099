//! `BinPool` — the bin arena.  Same free-stack discipline as the event pool.

use des_core::{BinId, DesResult, EventId};

use crate::pool::Pool;
use crate::{EventBin, EventPool};

/// Fixed-capacity arena of [`EventBin`] slots.
///
/// The per-slot link threads bins into the queue's sorted chain.
pub struct BinPool {
    pool: Pool<EventBin>,
}

impl BinPool {
    pub fn new(capacity: u32) -> DesResult<Self> {
        Ok(Self { pool: Pool::with_capacity("bin", capacity)? })
    }

    /// Take a free slot and build a bin around `seed`.
    ///
    /// `OutOfCapacity` is reported before the seed is looked at; on any
    /// failure neither pool is modified.
    pub fn acquire<P>(&mut self, events: &mut EventPool<P>, seed: EventId) -> DesResult<BinId> {
        let index = self.pool.acquire_with(|| EventBin::new(events, seed))?;
        Ok(BinId(index))
    }

    /// Return an empty, unlinked bin to the free stack.
    ///
    /// # Panics
    /// Panics if the bin still holds events, is still chained, or is free.
    pub fn release(&mut self, id: BinId) {
        assert!(self.bin(id).is_empty(), "{id} released while holding events");
        self.pool.release(id.0);
    }

    pub fn get(&self, id: BinId) -> Option<&EventBin> {
        self.pool.get(id.0)
    }

    /// Bin lookup for handles known to be in the chain.
    pub(crate) fn bin(&self, id: BinId) -> &EventBin {
        self.pool.live(id.0)
    }

    pub(crate) fn bin_mut(&mut self, id: BinId) -> &mut EventBin {
        self.pool.live_mut(id.0)
    }

    pub fn capacity(&self) -> u32 {
        self.pool.capacity()
    }

    pub fn free_count(&self) -> u32 {
        self.pool.free_count()
    }

    #[inline]
    pub(crate) fn next(&self, id: BinId) -> BinId {
        BinId(self.pool.next(id.0))
    }

    #[inline]
    pub(crate) fn set_next(&mut self, id: BinId, next: BinId) {
        self.pool.set_next(id.0, next.0);
    }
}
