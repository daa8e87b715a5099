//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `step_summaries.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::debug;

use crate::writer::OutputWriter;
use crate::{OutputResult, RunSummaryRow, StepSummaryRow};

pub const STEP_SUMMARY_HEADERS: [&str; 7] = [
    "step",
    "time",
    "processed",
    "pending_events",
    "pending_bins",
    "free_events",
    "free_bins",
];

pub const RUN_SUMMARY_HEADERS: [&str; 4] = ["steps", "events", "final_time", "leftover"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    steps:    Writer<File>,
    runs:     Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut steps = Writer::from_path(dir.join("step_summaries.csv"))?;
        steps.write_record(STEP_SUMMARY_HEADERS)?;

        let mut runs = Writer::from_path(dir.join("run_summary.csv"))?;
        runs.write_record(RUN_SUMMARY_HEADERS)?;

        debug!("csv output opened in {}", dir.display());
        Ok(Self { steps, runs, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.steps.write_record(&[
            row.step.to_string(),
            row.time.to_string(),
            row.processed.to_string(),
            row.pending_events.to_string(),
            row.pending_bins.to_string(),
            row.free_events.to_string(),
            row.free_bins.to_string(),
        ])?;
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.runs.write_record(&[
            row.steps.to_string(),
            row.events.to_string(),
            row.final_time.to_string(),
            row.leftover.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.runs.flush()?;
        Ok(())
    }
}
