//! Plain data row types written by output backends.

use des_core::Tick;
use des_queue::QueueStats;
use des_sim::RunSummary;

/// Queue occupancy at the end of one `simulate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    /// Zero-based index of the step within the run.
    pub step:           u64,
    /// Start time of the step.
    pub time:           u64,
    pub processed:      u64,
    pub pending_events: u32,
    pub pending_bins:   u32,
    pub free_events:    u32,
    pub free_bins:      u32,
}

impl StepSummaryRow {
    pub fn new(step: u64, time: Tick, processed: u64, stats: &QueueStats) -> Self {
        Self {
            step,
            time: time.0,
            processed,
            pending_events: stats.events_pending,
            pending_bins:   stats.bins_in_chain,
            free_events:    stats.events_free,
            free_bins:      stats.bins_free,
        }
    }
}

/// Totals for a whole run, plus whatever a later drain flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummaryRow {
    pub steps:      u64,
    pub events:     u64,
    pub final_time: u64,
    /// Events still pending when the run ended.
    pub leftover:   u32,
}

impl RunSummaryRow {
    pub fn new(summary: &RunSummary, leftover: u32) -> Self {
        Self {
            steps:      summary.steps,
            events:     summary.events,
            final_time: summary.final_time.0,
            leftover,
        }
    }
}
