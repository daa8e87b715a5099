//! Event handlers and the scheduling capability they receive.

use des_core::{DesError, DesResult, Event, EventId, EventKind, Tick};
use des_queue::EventQueue;
use log::warn;

// ── Schedule ──────────────────────────────────────────────────────────────────

/// The one thing a handler may do to its simulator: ask for more events.
///
/// Implemented by [`Scheduler`] (handed to handlers during a step) and by
/// [`Simulator`][crate::Simulator] itself.  Tests can supply their own
/// implementation to exercise handlers without a simulator.
pub trait Schedule<P> {
    /// The simulator's current time.  Requests earlier than this are rejected.
    fn now(&self) -> Tick;

    /// Request an event at `time`.
    ///
    /// Fails with `InvalidArgument` if `time < now()` or `kind` is not
    /// registered, and with `OutOfCapacity` if either pool is exhausted.
    fn schedule(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId>;
}

/// The scheduling capability passed to handlers while a step is running.
///
/// It borrows the simulator's queue for the duration of one handler call.
/// Events scheduled through it before the step's time limit are processed
/// later in the same step.
pub struct Scheduler<'a, P> {
    queue: &'a mut EventQueue<P>,
    now:   Tick,
}

impl<'a, P> Scheduler<'a, P> {
    pub(crate) fn new(queue: &'a mut EventQueue<P>, now: Tick) -> Self {
        Self { queue, now }
    }
}

impl<P> Schedule<P> for Scheduler<'_, P> {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId> {
        schedule_at(self.queue, self.now, time, kind, payload)
    }
}

/// Causality check plus enqueue, shared by the simulator and the scheduler.
pub(crate) fn schedule_at<P>(
    queue:   &mut EventQueue<P>,
    now:     Tick,
    time:    Tick,
    kind:    EventKind,
    payload: P,
) -> DesResult<EventId> {
    if time < now {
        warn!("rejected {kind} @ {time}: causality violation (now {now})");
        return Err(DesError::invalid(
            "time",
            format!("scheduling time {time} has to be >= {now}"),
        ));
    }
    queue.enqueue(time, kind, payload).inspect_err(|e| {
        warn!("rejected {kind} @ {time}: {e}");
    })
}

// ── EventHandler ──────────────────────────────────────────────────────────────

/// Per-kind event processing.
///
/// The simulator keeps one handler per registered [`EventKind`] and calls it
/// synchronously for every due event of that kind.  The handler never owns
/// the event: it is recycled as soon as `handle` returns.  Any repetition has
/// to be requested explicitly through `sched`.
///
/// Closures with the matching signature are handlers:
///
/// ```rust,ignore
/// let count = |ev: &Event<u32>, _: &mut dyn Schedule<u32>| println!("{ev}");
/// ```
pub trait EventHandler<P> {
    fn handle(&mut self, event: &Event<P>, sched: &mut dyn Schedule<P>);
}

impl<P, F> EventHandler<P> for F
where
    F: FnMut(&Event<P>, &mut dyn Schedule<P>),
{
    fn handle(&mut self, event: &Event<P>, sched: &mut dyn Schedule<P>) {
        self(event, sched)
    }
}

/// A handler that ignores every event.
pub struct NoopHandler;

impl<P> EventHandler<P> for NoopHandler {
    fn handle(&mut self, _event: &Event<P>, _sched: &mut dyn Schedule<P>) {}
}

/// Re-fires every event `period` ticks after it fired, same kind and payload.
///
/// With an `until` horizon, events whose next occurrence would land at or
/// after the horizon are not repeated.  A rejected reschedule (pool full) is
/// logged and the repetition stops for that event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    period: u64,
    until:  Option<Tick>,
}

impl Repeat {
    /// Repeat forever every `period` ticks.  `period` must be positive, or
    /// the event would be re-fired within the step that processes it, forever.
    pub fn every(period: u64) -> DesResult<Self> {
        if period == 0 {
            return Err(DesError::invalid("period", "out of range [1;u64::MAX]"));
        }
        Ok(Self { period, until: None })
    }

    /// Stop repeating at `horizon` (exclusive).
    pub fn until(mut self, horizon: Tick) -> Self {
        self.until = Some(horizon);
        self
    }

    pub fn period(&self) -> u64 {
        self.period
    }
}

impl<P: Clone> EventHandler<P> for Repeat {
    fn handle(&mut self, event: &Event<P>, sched: &mut dyn Schedule<P>) {
        let next = event.time.saturating_offset(self.period);
        if self.until.is_some_and(|horizon| next >= horizon) {
            return;
        }
        if let Err(e) = sched.schedule(next, event.kind, event.payload.clone()) {
            warn!("{} @ {} not rescheduled: {e}", event.kind, event.time);
        }
    }
}
