//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, RunSummaryRow, StepSummaryRow};

/// Trait implemented by output backends.
///
/// Errors are returned to the caller; [`SimOutputObserver`][crate::SimOutputObserver]
/// stores them for retrieval with `take_error`.
pub trait OutputWriter {
    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write the run totals.
    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
