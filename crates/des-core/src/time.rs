//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer `Tick` counter.  The simulator advances it by a fixed
//! `time_step` per `simulate()` call; events are due in a step when their
//! timestamp is strictly below `now + time_step`.
//!
//! Integer time keeps same-timestamp coalescing exact: two events either
//! share a bin or they don't, with no floating-point tie ambiguity.

use std::fmt;

use crate::{DesError, DesResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
    pub const MAX: Tick = Tick(u64::MAX);

    /// The tick `n` steps after `self`, clamped at [`Tick::MAX`].
    #[inline]
    pub fn saturating_offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }
}

/// Saturating, like [`Tick::saturating_offset`].
impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.saturating_offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Construction parameters for a simulator.
///
/// Capacities are fixed for the lifetime of the simulator: pools never grow.
/// Typically built in code or loaded from JSON by the application crate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Maximum number of events alive at once (pending plus held by a caller).
    pub event_capacity: u32,

    /// Maximum number of distinct pending timestamps.
    pub bin_capacity: u32,

    /// Simulated time advanced by each `simulate()` call.  Must be positive.
    pub time_step: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            bin_capacity:   256,
            time_step:      1,
        }
    }
}

impl SimConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> DesResult<()> {
        // u32::MAX is the pools' "no slot" sentinel.
        let max = u32::MAX - 1;
        if self.event_capacity == 0 || self.event_capacity > max {
            return Err(DesError::invalid("event_capacity", format!("out of range [1;{max}]")));
        }
        if self.bin_capacity == 0 || self.bin_capacity > max {
            return Err(DesError::invalid("bin_capacity", format!("out of range [1;{max}]")));
        }
        if self.time_step == 0 {
            return Err(DesError::invalid("time_step", "out of range [1;u64::MAX]"));
        }
        Ok(())
    }
}
