//! `EventList` — intrusive FIFO of event handles.
//!
//! The list stores only `head`/`tail`; the links themselves live in the event
//! pool's slots, so every operation takes the pool that owns the events.

use des_core::{Event, EventId};

use crate::EventPool;

/// FIFO chain of events threaded through their pool slots.
///
/// An event is a member of at most one list at a time: `insert` requires an
/// unlinked event and `remove` clears the link of the event it pops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventList {
    head: EventId,
    tail: EventId,
    len:  u32,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` at the tail.
    ///
    /// # Panics
    /// Panics if `id` is already linked into a list.
    pub fn insert<P>(&mut self, pool: &mut EventPool<P>, id: EventId) {
        assert!(!pool.is_linked(id), "{id} inserted while linked");

        if self.head.is_valid() {
            pool.set_next(self.tail, id);
        } else {
            self.head = id;
        }
        self.tail = id;
        self.len += 1;
    }

    /// Pop the head, or `None` on an empty list.
    pub fn remove<P>(&mut self, pool: &mut EventPool<P>) -> Option<EventId> {
        let id = self.head;
        if !id.is_valid() {
            return None;
        }

        self.head = pool.next(id);
        pool.set_next(id, EventId::INVALID);
        if !self.head.is_valid() {
            self.tail = EventId::INVALID;
        }
        self.len -= 1;
        Some(id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.head.is_valid()
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn head(&self) -> EventId {
        self.head
    }

    /// Walk the list head to tail.
    pub fn iter<'a, P>(&self, pool: &'a EventPool<P>) -> ListIter<'a, P> {
        ListIter { pool, cursor: self.head }
    }
}

/// Iterator over `(EventId, &Event<P>)` pairs of an [`EventList`].
pub struct ListIter<'a, P> {
    pool:   &'a EventPool<P>,
    cursor: EventId,
}

impl<'a, P> Iterator for ListIter<'a, P> {
    type Item = (EventId, &'a Event<P>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.is_valid() {
            return None;
        }
        let id = self.cursor;
        self.cursor = self.pool.next(id);
        // Linked events are always live.
        self.pool.get(id).map(|event| (id, event))
    }
}
