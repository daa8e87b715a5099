//! periodic — the reference driver for the rust_des simulator.
//!
//! Seeds ten self-perpetuating events at timestamps `index >> 1`, each firing
//! again ten ticks later, plus a handful of one-shot "noise" events at random
//! times.  Steps until the queue is empty (or the step bound is hit), drains,
//! and prints the totals.
//!
//! Usage: `periodic [config.json]`.  The optional file holds a `SimConfig`;
//! missing fields take their defaults.  Set `DES_LOG=debug` for per-step logs.

mod logger;

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use des_core::{Event, EventKind, SimConfig, Tick};
use des_output::writer::OutputWriter;
use des_output::{CsvWriter, SimOutputObserver};
use des_queue::EventQueue;
use des_sim::{Repeat, RunSummary, Schedule, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const PERIODIC_EVENTS: u64 = 10;
const PERIOD:          u64 = 10;
/// Periodic events stop re-firing at this time so the run terminates.
const HORIZON:         Tick = Tick(1_000);
const NOISE_EVENTS:    u64 = 16;
const SEED:            u64 = 42;
const MAX_STEPS:       u64 = 1 << 20;
const OUTPUT_DIR:      &str = "output/periodic";

// ── Observer wrapper to print step lines ─────────────────────────────────────

struct ProgressObserver<W: OutputWriter> {
    inner: SimOutputObserver<W>,
    busy:  u64,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, busy: 0 }
    }
}

impl<P, W: OutputWriter> SimObserver<P> for ProgressObserver<W> {
    fn on_step_end(&mut self, now: Tick, processed: u64, queue: &EventQueue<P>) {
        if processed > 0 {
            self.busy += 1;
            info!("{now}: processed {processed} event{}", plural(processed));
        }
        SimObserver::<P>::on_step_end(&mut self.inner, now, processed, queue);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        SimObserver::<P>::on_run_end(&mut self.inner, summary);
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn load_config(path: Option<&str>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config: SimConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logger::init(logger::level_from_env()).map_err(|e| anyhow::anyhow!("{e}"))?;

    let arg = std::env::args().nth(1);
    let config = load_config(arg.as_deref())?;
    println!("=== periodic — rust_des reference driver ===");
    println!(
        "Capacity: {} events, {} bins  |  Step: {}  |  Seed: {SEED}",
        config.event_capacity, config.bin_capacity, config.time_step
    );
    println!();

    // 1. Simulator: generic kind repeats, the noise kind just counts.
    let noise_seen = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&noise_seen);
    let mut builder = SimBuilder::new(config, Repeat::every(PERIOD)?.until(HORIZON));
    let noise = builder.register(move |_: &Event<u64>, _: &mut dyn Schedule<u64>| {
        counter.set(counter.get() + 1);
    })?;
    let mut sim = builder.build()?;

    // 2. Seed.
    for index in 0..PERIODIC_EVENTS {
        sim.schedule(Tick(index >> 1), EventKind::CUSTOM, index)?;
    }
    let mut rng = SmallRng::seed_from_u64(SEED);
    for index in 0..NOISE_EVENTS {
        let at = Tick(rng.gen_range(0..HORIZON.0));
        sim.schedule(at, noise, index)?;
    }
    println!(
        "Scheduled {} events across {} bins",
        sim.queue().len(),
        sim.queue().bin_count()
    );

    // 3. Output.
    fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ProgressObserver::new(SimOutputObserver::new(writer));

    // 4. Run, then flush whatever is left.
    let t0 = Instant::now();
    let summary = sim.run(MAX_STEPS, &mut obs);
    let drained = sim.drain();
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!(
        "Simulated {} step{} in {:.3} s.",
        summary.steps,
        plural(summary.steps),
        elapsed.as_secs_f64()
    );
    println!(
        "Processed {} event{} ({} noise) in {} busy step{}; final time {}.",
        summary.events,
        plural(summary.events),
        noise_seen.get(),
        obs.busy,
        plural(obs.busy),
        summary.final_time
    );
    println!(
        "{drained} event{} ha{} been drained.",
        plural(drained),
        if drained == 1 { "s" } else { "ve" }
    );
    println!("End of Simulation.");
    println!("  {OUTPUT_DIR}/step_summaries.csv : {} rows", obs.inner.steps_seen());

    Ok(())
}
