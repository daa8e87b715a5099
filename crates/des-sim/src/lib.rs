//! `des-sim` — fixed-step discrete-event simulator.
//!
//! # Step loop
//!
//! ```text
//! simulate():
//!   limit = now + time_step                 (fixed for the whole step)
//!   while let Some(ev) = queue.dequeue(limit):   (head re-read every time)
//!       handlers[ev.kind].handle(&ev, &mut scheduler)
//!       queue.recycle(ev)
//!   now = limit
//! ```
//!
//! Handlers get a [`Schedule`] capability instead of a reference to the
//! simulator.  Whatever they schedule before `limit` is handled in the same
//! step; the rest waits.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use des_core::{EventKind, SimConfig, Tick};
//! use des_sim::{NoopObserver, Repeat, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), Repeat::every(10)?).build()?;
//! sim.schedule(Tick(0), EventKind::CUSTOM, ())?;
//! let summary = sim.run(1_000, &mut NoopObserver);
//! sim.drain();
//! ```

pub mod builder;
pub mod handler;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use handler::{EventHandler, NoopHandler, Repeat, Schedule, Scheduler};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RunSummary, Simulator};
