//! Simulation observer trait for progress reporting and data collection.

use des_core::{Event, Tick};
use des_queue::EventQueue;

use crate::RunSummary;

/// Callbacks invoked by the [`Simulator`][crate::Simulator] at key points of
/// a step, a drain, and a run.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers see state read-only; they cannot
/// schedule.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl<P> SimObserver<P> for ProgressPrinter {
///     fn on_step_end(&mut self, now: Tick, processed: u64, _queue: &EventQueue<P>) {
///         println!("{now}: processed {processed} events");
///     }
/// }
/// ```
pub trait SimObserver<P> {
    /// Called at the start of every `simulate` call, before any dequeue.
    fn on_step_start(&mut self, _now: Tick) {}

    /// Called for each due event just before its handler runs.
    ///
    /// `now` is the step's start time, not the event's timestamp.
    fn on_event(&mut self, _now: Tick, _event: &Event<P>) {}

    /// Called once the step has processed every due event.
    ///
    /// `now` is still the step's start time; the clock advances right after.
    fn on_step_end(&mut self, _now: Tick, _processed: u64, _queue: &EventQueue<P>) {}

    /// Called after a drain with the number of events flushed.
    fn on_drain(&mut self, _drained: u64) {}

    /// Called once at the end of [`Simulator::run`][crate::Simulator::run].
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl<P> SimObserver<P> for NoopObserver {}
