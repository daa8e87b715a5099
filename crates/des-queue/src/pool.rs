//! `Pool<T>` — fixed-capacity slot arena with an explicit free-index stack.
//!
//! # Slot lifecycle
//!
//! ```text
//!            acquire            take
//!   Free ───────────▶ Live ───────────▶ Held
//!    ▲                 │                  │
//!    └──── release ────┴───── release ────┘
//! ```
//!
//! `Live` slots own their value and may be linked into an intrusive list via
//! the per-slot `next` link.  `Held` slots have had their value moved out to a
//! caller that has not returned the slot yet.  Both count against capacity.
//!
//! The free stack is LIFO, so the most recently released slot is handed out
//! next.  A fresh pool hands out index 0 first.
//!
//! Contract violations (releasing a free slot, releasing a slot that is still
//! linked, touching a slot in the wrong state) panic: they are programmer
//! errors, not runtime conditions.

use des_core::{DesError, DesResult};
use log::debug;

/// The "no link" sentinel for raw slot indices.
pub(crate) const NIL: u32 = u32::MAX;

enum SlotState<T> {
    Free,
    Live(T),
    Held,
}

struct Slot<T> {
    state: SlotState<T>,
    next:  u32,
}

/// A fixed-capacity arena of `T` values addressed by `u32` indices.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free:  Vec<u32>,
    /// Human-readable slot name used in errors and logs ("event", "bin").
    what:  &'static str,
}

impl<T> Pool<T> {
    /// Reserve `capacity` slots and push all of them onto the free stack.
    ///
    /// Fails with `InvalidArgument` when `capacity` is zero (or the reserved
    /// sentinel `u32::MAX`) and with `AllocationFailure` when the backing
    /// storage cannot be reserved.
    pub fn with_capacity(what: &'static str, capacity: u32) -> DesResult<Self> {
        if capacity == 0 || capacity == NIL {
            return Err(DesError::invalid(
                "capacity",
                format!("{what} pool capacity out of range [1;{}]", NIL - 1),
            ));
        }

        let n = capacity as usize;
        let alloc_err = |source| DesError::AllocationFailure { what, requested: capacity, source };

        let mut slots = Vec::new();
        slots.try_reserve_exact(n).map_err(alloc_err)?;
        let mut free = Vec::new();
        free.try_reserve_exact(n).map_err(alloc_err)?;

        slots.extend((0..n).map(|_| Slot { state: SlotState::Free, next: NIL }));
        free.extend((0..capacity).rev());

        debug!("{what} pool ready with {capacity} slots");
        Ok(Self { slots, free, what })
    }

    /// Pop a free slot and fill it with the value produced by `init`.
    ///
    /// Capacity is checked first.  If `init` fails the slot is not consumed
    /// and the pool is left untouched.
    pub fn acquire_with<F>(&mut self, init: F) -> DesResult<u32>
    where
        F: FnOnce() -> DesResult<T>,
    {
        let Some(&index) = self.free.last() else {
            debug!("{} pool exhausted ({} slots)", self.what, self.capacity());
            return Err(DesError::OutOfCapacity { what: self.what, capacity: self.capacity() });
        };
        let value = init()?;
        self.free.pop();

        let slot = &mut self.slots[index as usize];
        debug_assert!(matches!(slot.state, SlotState::Free));
        debug_assert_eq!(slot.next, NIL);
        slot.state = SlotState::Live(value);
        Ok(index)
    }

    /// Move the value out of a live slot.  The slot stays reserved (`Held`)
    /// until [`release`][Self::release] is called for it.
    ///
    /// # Panics
    /// Panics if the slot is not live or is still linked.
    pub fn take(&mut self, index: u32) -> T {
        let slot = &mut self.slots[index as usize];
        assert_eq!(slot.next, NIL, "{} slot {index} taken while linked", self.what);
        match std::mem::replace(&mut slot.state, SlotState::Held) {
            SlotState::Live(value) => value,
            other => {
                slot.state = other;
                panic!("{} slot {index} taken while not live", self.what);
            }
        }
    }

    /// Return a live or held slot to the free stack, dropping any value.
    ///
    /// # Panics
    /// Panics on double release or if the slot is still linked.
    pub fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        assert!(
            !matches!(slot.state, SlotState::Free),
            "{} slot {index} released twice",
            self.what,
        );
        assert_eq!(slot.next, NIL, "{} slot {index} released while linked", self.what);
        slot.state = SlotState::Free;
        self.free.push(index);
    }

    /// Whether `index` is a held slot (taken and awaiting release).
    pub fn is_held(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|s| matches!(s.state, SlotState::Held))
    }

    /// The value of a live slot, or `None` for free/held/out-of-range slots.
    pub fn get(&self, index: u32) -> Option<&T> {
        match self.slots.get(index as usize)?.state {
            SlotState::Live(ref value) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        match self.slots.get_mut(index as usize)?.state {
            SlotState::Live(ref mut value) => Some(value),
            _ => None,
        }
    }

    /// Like [`get`][Self::get], for indices the caller knows to be live.
    ///
    /// # Panics
    /// Panics if the slot is not live.
    pub fn live(&self, index: u32) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("{} slot {index} is not live", self.what),
        }
    }

    pub fn live_mut(&mut self, index: u32) -> &mut T {
        let what = self.what;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("{what} slot {index} is not live"),
        }
    }

    #[inline]
    pub fn next(&self, index: u32) -> u32 {
        self.slots[index as usize].next
    }

    #[inline]
    pub fn set_next(&mut self, index: u32, next: u32) {
        self.slots[index as usize].next = next;
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    #[inline]
    pub fn free_count(&self) -> u32 {
        self.free.len() as u32
    }

    /// Slots that are live or held.
    #[inline]
    pub fn in_use(&self) -> u32 {
        self.capacity() - self.free_count()
    }
}
