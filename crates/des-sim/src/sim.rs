//! The `Simulator` struct and its step loop.

use des_core::{DesResult, EventId, EventKind, SimConfig, Tick};
use des_queue::{EventQueue, QueueStats};
use log::debug;

use crate::handler::{Scheduler, schedule_at};
use crate::{EventHandler, NoopObserver, Schedule, SimObserver};

/// Totals reported by [`Simulator::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Number of `simulate` calls made.
    pub steps:      u64,
    /// Events processed across all steps.
    pub events:     u64,
    /// Simulator time after the last step.
    pub final_time: Tick,
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// Fixed-step discrete-event simulator.
///
/// Each [`simulate`][Self::simulate] call processes every event with a
/// timestamp strictly below `now + time_step`, in timestamp order and FIFO
/// among equal timestamps, then advances `now` by one step.
///
/// # Reentrancy
///
/// Handlers run synchronously inside the step and may schedule new events
/// through the [`Schedule`] capability they are given.  The step's time limit
/// is fixed when the step starts but the queue head is re-read after every
/// event, so a new event landing before the limit is processed in the same
/// step; one at or after the limit waits for a later step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulator<P> {
    pub(crate) config:   SimConfig,
    pub(crate) queue:    EventQueue<P>,
    /// Indexed by `EventKind`; entry 0 is the generic `CUSTOM` handler.
    pub(crate) handlers: Vec<Box<dyn EventHandler<P>>>,
    pub(crate) now:      Tick,
}

impl<P> Simulator<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Request an event at `time`.
    ///
    /// Fails with `InvalidArgument` if `time` is earlier than [`now`][Self::now]
    /// or `kind` is unregistered, and with `OutOfCapacity` when a pool is full.
    /// A failed request changes nothing.
    pub fn schedule(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId> {
        schedule_at(&mut self.queue, self.now, time, kind, payload)
    }

    /// Process one time step.  Returns the number of events handled.
    pub fn simulate(&mut self) -> u64 {
        self.simulate_with(&mut NoopObserver)
    }

    /// [`simulate`][Self::simulate] with observer callbacks.
    pub fn simulate_with<O: SimObserver<P>>(&mut self, observer: &mut O) -> u64 {
        let now = self.now;
        let limit = now.saturating_offset(self.config.time_step);
        observer.on_step_start(now);

        let mut processed = 0u64;
        while let Some(item) = self.queue.dequeue(limit) {
            observer.on_event(now, &item);

            // Kinds are validated on enqueue, so the lookup cannot miss.
            let handler = &mut self.handlers[item.kind.index()];
            let mut sched = Scheduler::new(&mut self.queue, now);
            handler.handle(&item, &mut sched);

            self.queue.recycle(item);
            processed += 1;
        }

        observer.on_step_end(now, processed, &self.queue);
        debug!("{now}: processed {processed} events, {} pending", self.queue.len());

        self.now = limit;
        processed
    }

    /// Flush every pending event without handling it and without advancing
    /// time.  Returns the number of events removed.
    pub fn drain(&mut self) -> u64 {
        self.drain_with(&mut NoopObserver)
    }

    /// [`drain`][Self::drain] with observer callbacks.
    pub fn drain_with<O: SimObserver<P>>(&mut self, observer: &mut O) -> u64 {
        let mut drained = 0u64;
        while let Some(item) = self.queue.dequeue_next() {
            self.queue.recycle(item);
            drained += 1;
        }
        debug!("drained {drained} events at {}", self.now);
        observer.on_drain(drained);
        drained
    }

    /// Step until the queue is empty after a step or `max_steps` steps ran.
    ///
    /// At least one step runs when `max_steps > 0`, even on an empty queue.
    pub fn run<O: SimObserver<P>>(&mut self, max_steps: u64, observer: &mut O) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            summary.events += self.simulate_with(observer);
            summary.steps += 1;
            if self.is_empty() {
                break;
            }
        }
        summary.final_time = self.now;
        debug!(
            "run finished: {} steps, {} events, now {}",
            summary.steps, summary.events, summary.final_time
        );
        observer.on_run_end(&summary);
        summary
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    #[inline]
    pub fn time_step(&self) -> u64 {
        self.config.time_step
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of the pending events.
    pub fn queue(&self) -> &EventQueue<P> {
        &self.queue
    }

    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Number of registered event kinds (the generic kind included).
    pub fn kind_count(&self) -> u16 {
        self.queue.kind_count()
    }
}

impl<P> Schedule<P> for Simulator<P> {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, time: Tick, kind: EventKind, payload: P) -> DesResult<EventId> {
        Simulator::schedule(self, time, kind, payload)
    }
}
