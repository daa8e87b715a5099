//! Engine error type.
//!
//! Every fallible engine operation reports one of three conditions.  None of
//! them mutate state on the way out: a rejected request leaves pools and the
//! bin chain exactly as they were.

use std::collections::TryReserveError;

use thiserror::Error;

/// The error type shared by `des-queue` and `des-sim`.
#[derive(Debug, Error)]
pub enum DesError {
    /// A parameter was out of range: zero capacity, zero time step, an
    /// unregistered event kind, or a timestamp earlier than the current time.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name:   &'static str,
        reason: String,
    },

    /// A fixed-capacity pool has no free slot left.
    #[error("out of capacity: all {capacity} {what} slots are in use")]
    OutOfCapacity {
        what:     &'static str,
        capacity: u32,
    },

    /// Reserving the backing storage for a pool failed at construction.
    #[error("cannot allocate {requested} {what} slots: {source}")]
    AllocationFailure {
        what:      &'static str,
        requested: u32,
        #[source]
        source:    TryReserveError,
    },
}

impl DesError {
    /// Shorthand for building an [`DesError::InvalidArgument`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DesError::InvalidArgument { name, reason: reason.into() }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DesError::InvalidArgument { .. })
    }

    pub fn is_out_of_capacity(&self) -> bool {
        matches!(self, DesError::OutOfCapacity { .. })
    }
}

/// Shorthand result type for all `des-*` crates.
pub type DesResult<T> = Result<T, DesError>;
