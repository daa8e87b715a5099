//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use des_core::Tick;
use des_queue::EventQueue;
use des_sim::{RunSummary, SimObserver};
use log::warn;

use crate::row::{RunSummaryRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one row per step and the run totals to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    steps:      u64,
    pending:    u32,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, steps: 0, pending: 0, last_error: None }
    }

    /// Number of step rows offered to the writer so far.
    pub fn steps_seen(&self) -> u64 {
        self.steps
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<P, W: OutputWriter> SimObserver<P> for SimOutputObserver<W> {
    fn on_step_end(&mut self, now: Tick, processed: u64, queue: &EventQueue<P>) {
        let stats = queue.stats();
        let row = StepSummaryRow::new(self.steps, now, processed, &stats);
        self.steps += 1;
        self.pending = stats.events_pending;
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        let row = RunSummaryRow::new(summary, self.pending);
        let result = self.writer.write_run_summary(&row);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
