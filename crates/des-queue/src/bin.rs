//! `EventBin` — all pending events sharing one exact timestamp.

use des_core::{DesError, DesResult, EventId, Tick};

use crate::list::ListIter;
use crate::{EventList, EventPool};

/// A bucket of same-timestamp events, FIFO in arrival order.
///
/// The bin does not re-check that inserted events carry its timestamp; the
/// queue guarantees that.  A bin is only ever created around a seed event and
/// the queue releases it the moment it empties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBin {
    time:   Tick,
    events: EventList,
}

impl EventBin {
    /// Build a bin around `seed`, taking the seed's timestamp.
    ///
    /// Fails with `InvalidArgument` if `seed` is the `INVALID` handle or does
    /// not name a live event.
    pub fn new<P>(pool: &mut EventPool<P>, seed: EventId) -> DesResult<Self> {
        if !seed.is_valid() {
            return Err(DesError::invalid("seed", "unexpected invalid event handle"));
        }
        let Some(event) = pool.get(seed) else {
            return Err(DesError::invalid("seed", format!("{seed} is not a live event")));
        };

        let time = event.time;
        let mut events = EventList::new();
        events.insert(pool, seed);
        Ok(Self { time, events })
    }

    #[inline]
    pub fn insert<P>(&mut self, pool: &mut EventPool<P>, id: EventId) {
        self.events.insert(pool, id);
    }

    #[inline]
    pub fn remove<P>(&mut self, pool: &mut EventPool<P>) -> Option<EventId> {
        self.events.remove(pool)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.events.len()
    }

    #[inline]
    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn iter<'a, P>(&self, pool: &'a EventPool<P>) -> ListIter<'a, P> {
        self.events.iter(pool)
    }
}
