//! `EventQueue<P>` — sorted chain of timestamp bins over two fixed pools.
//!
//! # Layout
//!
//! ```text
//!   head                                            tail
//!    │                                               │
//!    ▼                                               ▼
//!  [T0: e3 → e7] ──▶ [T2: e1] ──▶ [T5: e0 → e4 → e9]
//! ```
//!
//! Bins are in strictly ascending timestamp order and no two bins share a
//! timestamp.  Within a bin, events come out in the order they went in.
//!
//! # Cost
//!
//! `enqueue` scans bins, not events: O(B) where B is the number of distinct
//! pending timestamps.  `dequeue` is O(1).

use std::ops::Deref;

use des_core::{BinId, DesResult, Event, EventId, EventKind, Tick};
use log::trace;

use crate::list::ListIter;
use crate::{BinPool, EventBin, EventPool, QueueStats};

// ── Dequeued ──────────────────────────────────────────────────────────────────

/// An event popped from the queue.
///
/// Its pool slot stays reserved until the value is handed back through
/// [`EventQueue::recycle`].  Dropping a `Dequeued` without recycling it
/// permanently removes one slot from the event pool.
#[must_use = "dequeued events must be recycled or the event pool starves"]
#[derive(Debug)]
pub struct Dequeued<P> {
    id:    EventId,
    event: Event<P>,
}

impl<P> Dequeued<P> {
    /// The slot this event occupied.
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn event(&self) -> &Event<P> {
        &self.event
    }
}

impl<P> Deref for Dequeued<P> {
    type Target = Event<P>;

    fn deref(&self) -> &Event<P> {
        &self.event
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

/// Time-ordered event queue with fixed event and bin capacities.
pub struct EventQueue<P> {
    events:  EventPool<P>,
    bins:    BinPool,
    head:    BinId,
    tail:    BinId,
    /// Events currently in some bin.
    pending: u32,
    /// Events dequeued and not yet recycled.
    held:    u32,
}

impl<P> EventQueue<P> {
    /// Build a queue accepting only [`EventKind::CUSTOM`] events.
    pub fn new(event_capacity: u32, bin_capacity: u32) -> DesResult<Self> {
        Self::with_kinds(event_capacity, bin_capacity, EventKind::BUILTIN_COUNT)
    }

    /// Build a queue accepting event kinds `0..kinds`.
    ///
    /// If the bin pool cannot be built the already-reserved event pool is
    /// dropped before the error is returned.
    pub fn with_kinds(event_capacity: u32, bin_capacity: u32, kinds: u16) -> DesResult<Self> {
        let events = EventPool::new(event_capacity, kinds)?;
        let bins = BinPool::new(bin_capacity)?;
        Ok(Self {
            events,
            bins,
            head:    BinId::INVALID,
            tail:    BinId::INVALID,
            pending: 0,
            held:    0,
        })
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Insert an event at `time`, coalescing with an existing bin for the same
    /// timestamp or splicing a new bin into its sorted position.
    ///
    /// On failure nothing changes: if the event slot was acquired but no bin
    /// could be, the event slot is released again before returning.
    pub fn enqueue(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId> {
        let event = self.events.acquire(time, kind, payload)?;

        // First bin with a timestamp >= `time`, and its predecessor.  Later
        // than everything pending is the common case and skips the scan.
        let (mut prev, mut curr) = match self.last_time() {
            Some(last) if last < time => (self.tail, BinId::INVALID),
            _ => (BinId::INVALID, self.head),
        };
        while curr.is_valid() && self.bins.bin(curr).time() < time {
            prev = curr;
            curr = self.bins.next(curr);
        }

        if curr.is_valid() && self.bins.bin(curr).time() == time {
            self.bins.bin_mut(curr).insert(&mut self.events, event);
            self.pending += 1;
            trace!("enqueued {event} into {curr} @ {time}");
            return Ok(event);
        }

        let bin = match self.bins.acquire(&mut self.events, event) {
            Ok(bin) => bin,
            Err(e) => {
                self.events.release(event);
                return Err(e);
            }
        };

        self.bins.set_next(bin, curr);
        if prev.is_valid() {
            self.bins.set_next(prev, bin);
        } else {
            self.head = bin;
        }
        if !curr.is_valid() {
            self.tail = bin;
        }
        self.pending += 1;
        trace!("enqueued {event} into new {bin} @ {time}");
        Ok(event)
    }

    /// Pop the next event whose timestamp is strictly below `limit`.
    ///
    /// Returns `None` if the queue is empty or the earliest pending timestamp
    /// is `>= limit`.
    pub fn dequeue(&mut self, limit: Tick) -> Option<Dequeued<P>> {
        let head = self.head;
        if !head.is_valid() || limit <= self.bins.bin(head).time() {
            return None;
        }
        Some(self.pop_head())
    }

    /// Pop the next event regardless of its timestamp.
    pub fn dequeue_next(&mut self) -> Option<Dequeued<P>> {
        if self.head.is_valid() {
            Some(self.pop_head())
        } else {
            None
        }
    }

    /// Return a dequeued event's slot to the event pool.
    pub fn recycle(&mut self, item: Dequeued<P>) {
        assert!(self.events.is_held(item.id), "{} recycled into the wrong queue", item.id);
        self.events.release(item.id);
        self.held -= 1;
    }

    fn pop_head(&mut self) -> Dequeued<P> {
        let head = self.head;
        let bin = self.bins.bin_mut(head);
        let Some(id) = bin.remove(&mut self.events) else {
            unreachable!("{head} is chained while empty");
        };
        let emptied = bin.is_empty();

        if emptied {
            self.head = self.bins.next(head);
            if !self.head.is_valid() {
                self.tail = BinId::INVALID;
            }
            self.bins.set_next(head, BinId::INVALID);
            self.bins.release(head);
        }

        let event = self.events.take(id);
        self.pending -= 1;
        self.held += 1;
        trace!("dequeued {id} @ {}{}", event.time, if emptied { " (bin released)" } else { "" });
        Dequeued { id, event }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.head.is_valid()
    }

    /// Number of pending events.
    #[inline]
    pub fn len(&self) -> u32 {
        self.pending
    }

    /// Number of dequeued events not yet recycled.
    #[inline]
    pub fn held(&self) -> u32 {
        self.held
    }

    /// Timestamp of the earliest pending event.
    pub fn next_time(&self) -> Option<Tick> {
        self.bins.get(self.head).map(EventBin::time)
    }

    /// Timestamp of the latest pending event.
    pub fn last_time(&self) -> Option<Tick> {
        self.bins.get(self.tail).map(EventBin::time)
    }

    /// A pending event by handle.
    pub fn event(&self, id: EventId) -> Option<&Event<P>> {
        self.events.get(id)
    }

    pub fn kind_count(&self) -> u16 {
        self.events.kind_count()
    }

    pub fn event_capacity(&self) -> u32 {
        self.events.capacity()
    }

    pub fn bin_capacity(&self) -> u32 {
        self.bins.capacity()
    }

    /// Walk the bin chain head to tail.
    pub fn bins(&self) -> Bins<'_, P> {
        Bins { queue: self, cursor: self.head }
    }

    /// Number of bins in the chain.
    pub fn bin_count(&self) -> u32 {
        self.bins().count() as u32
    }

    /// Resource accounting for both pools.
    ///
    /// Pending and chained counts are taken by walking the chain, so they are
    /// independent of the pools' own free counts.
    pub fn stats(&self) -> QueueStats {
        let (bins_in_chain, events_pending) = self
            .bins()
            .fold((0u32, 0u32), |(b, e), bin| (b + 1, e + bin.len()));
        QueueStats {
            event_capacity: self.events.capacity(),
            events_free:    self.events.free_count(),
            events_pending,
            events_held:    self.held,
            bin_capacity:   self.bins.capacity(),
            bins_free:      self.bins.free_count(),
            bins_in_chain,
        }
    }
}

// ── Chain iteration ───────────────────────────────────────────────────────────

/// A read-only view of one bin in the chain.
pub struct BinRef<'a, P> {
    id:     BinId,
    bin:    &'a EventBin,
    events: &'a EventPool<P>,
}

impl<'a, P> BinRef<'a, P> {
    pub fn id(&self) -> BinId {
        self.id
    }

    pub fn time(&self) -> Tick {
        self.bin.time()
    }

    pub fn len(&self) -> u32 {
        self.bin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bin.is_empty()
    }

    /// The bin's events in dequeue order.
    pub fn events(&self) -> ListIter<'a, P> {
        self.bin.iter(self.events)
    }
}

/// Iterator over the bin chain, earliest timestamp first.
pub struct Bins<'a, P> {
    queue:  &'a EventQueue<P>,
    cursor: BinId,
}

impl<'a, P> Iterator for Bins<'a, P> {
    type Item = BinRef<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let queue = self.queue;
        let id = self.cursor;
        let bin = queue.bins.get(id)?;
        self.cursor = queue.bins.next(id);
        Some(BinRef { id, bin, events: &queue.events })
    }
}
