//! Resource accounting snapshot.

/// Slot usage of both pools at one instant.
///
/// Every event slot is in exactly one of three places (free, pending in a
/// bin, or held by a caller between dequeue and recycle) and every bin slot
/// is either free or chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub event_capacity: u32,
    pub events_free:    u32,
    pub events_pending: u32,
    pub events_held:    u32,
    pub bin_capacity:   u32,
    pub bins_free:      u32,
    pub bins_in_chain:  u32,
}

impl QueueStats {
    /// Whether both pools account for every slot exactly once.
    pub fn is_conserved(&self) -> bool {
        self.events_free + self.events_pending + self.events_held == self.event_capacity
            && self.bins_free + self.bins_in_chain == self.bin_capacity
    }
}
