//! Event kinds and the event record itself.

use std::fmt;

use crate::Tick;

// ── EventKind ─────────────────────────────────────────────────────────────────

/// The type tag of an event.
///
/// The set of valid kinds is closed per queue: a queue built for `k` kinds
/// accepts `EventKind(0)..EventKind(k)` and rejects everything else.
/// [`EventKind::CUSTOM`] is always registered; applications mint further
/// kinds by registering handlers with the simulator builder.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventKind(pub u16);

impl EventKind {
    /// The one built-in kind, handled by the simulator's generic handler.
    pub const CUSTOM: EventKind = EventKind(0);

    /// Number of built-in kinds.
    pub const BUILTIN_COUNT: u16 = 1;

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::CUSTOM
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EventKind::CUSTOM => f.write_str("CUSTOM"),
            EventKind(n) => write!(f, "KIND{n}"),
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// A request to fire at `time`.
///
/// `payload` is whatever the application wants delivered to the handler; the
/// engine never inspects it.  List membership is tracked by the pool slot that
/// houses the event, not by the event itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event<P> {
    pub time:    Tick,
    pub kind:    EventKind,
    pub payload: P,
}

impl<P> Event<P> {
    pub fn new(time: Tick, kind: EventKind, payload: P) -> Self {
        Self { time, kind, payload }
    }
}

impl<P: fmt::Debug> fmt::Display for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} payload={:?} @ {}", self.kind, self.payload, self.time)
    }
}
