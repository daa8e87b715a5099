//! `EventPool<P>` — the event arena.

use des_core::{DesError, DesResult, Event, EventId, EventKind, Tick};

use crate::pool::{NIL, Pool};

/// Fixed-capacity arena of [`Event<P>`] slots.
///
/// The pool also owns the set of valid event kinds: `acquire` rejects any
/// kind outside `0..kind_count` without consuming a slot.
pub struct EventPool<P> {
    pool:  Pool<Event<P>>,
    kinds: u16,
}

impl<P> EventPool<P> {
    /// Reserve `capacity` event slots accepting `kinds` event kinds.
    pub fn new(capacity: u32, kinds: u16) -> DesResult<Self> {
        if kinds == 0 {
            return Err(DesError::invalid("kinds", "at least one event kind is required"));
        }
        Ok(Self { pool: Pool::with_capacity("event", capacity)?, kinds })
    }

    /// Take a free slot and initialise it as an unlinked event.
    ///
    /// Fails with `OutOfCapacity` when every slot is in use, otherwise with
    /// `InvalidArgument` when `kind` is not registered.  Neither failure
    /// consumes a slot.
    pub fn acquire(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId> {
        let kinds = self.kinds;
        let accepted = self.accepts(kind);
        let index = self.pool.acquire_with(|| {
            if !accepted {
                return Err(DesError::invalid(
                    "kind",
                    format!("{kind} out of range [0;{}]", kinds - 1),
                ));
            }
            Ok(Event::new(time, kind, payload))
        })?;
        Ok(EventId(index))
    }

    /// Clear the event and push its slot onto the free stack.
    ///
    /// # Panics
    /// Panics if the event is still linked into a list or already free.
    pub fn release(&mut self, id: EventId) {
        self.pool.release(id.0);
    }

    /// Move the event out of its slot, leaving the slot held.
    pub fn take(&mut self, id: EventId) -> Event<P> {
        self.pool.take(id.0)
    }

    pub fn is_held(&self, id: EventId) -> bool {
        self.pool.is_held(id.0)
    }

    pub fn get(&self, id: EventId) -> Option<&Event<P>> {
        self.pool.get(id.0)
    }

    pub fn accepts(&self, kind: EventKind) -> bool {
        kind.0 < self.kinds
    }

    pub fn kind_count(&self) -> u16 {
        self.kinds
    }

    pub fn capacity(&self) -> u32 {
        self.pool.capacity()
    }

    pub fn free_count(&self) -> u32 {
        self.pool.free_count()
    }

    // ── Intrusive link access (used by EventList) ─────────────────────────

    #[inline]
    pub(crate) fn next(&self, id: EventId) -> EventId {
        EventId(self.pool.next(id.0))
    }

    #[inline]
    pub(crate) fn set_next(&mut self, id: EventId, next: EventId) {
        self.pool.set_next(id.0, next.0);
    }

    #[inline]
    pub(crate) fn is_linked(&self, id: EventId) -> bool {
        self.pool.next(id.0) != NIL
    }
}
