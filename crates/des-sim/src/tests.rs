//! Integration tests for des-sim.

use std::cell::RefCell;
use std::rc::Rc;

use des_core::{DesResult, Event, EventId, EventKind, SimConfig, Tick};
use des_queue::EventQueue;

use crate::{
    EventHandler, NoopHandler, NoopObserver, Repeat, RunSummary, Schedule, SimBuilder,
    SimObserver, Simulator,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CUSTOM: EventKind = EventKind::CUSTOM;

fn config(event_capacity: u32, bin_capacity: u32, time_step: u64) -> SimConfig {
    SimConfig { event_capacity, bin_capacity, time_step }
}

type Log<T> = Rc<RefCell<Vec<T>>>;

/// Handler that records `(event time, payload)` for every event it sees.
fn recorder<P: Clone + 'static>(log: &Log<(Tick, P)>) -> impl EventHandler<P> + 'static {
    let log = Rc::clone(log);
    move |ev: &Event<P>, _: &mut dyn Schedule<P>| {
        log.borrow_mut().push((ev.time, ev.payload.clone()));
    }
}

fn noop_sim<P>(config: SimConfig) -> Simulator<P> {
    SimBuilder::new(config, NoopHandler).build().unwrap()
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim: Simulator<()> = noop_sim(SimConfig::default());
        assert_eq!(sim.now(), Tick::ZERO);
        assert_eq!(sim.time_step(), 1);
        assert_eq!(sim.kind_count(), 1);
        assert!(sim.is_empty());
        assert_eq!(sim.queue().event_capacity(), 1024);
        assert_eq!(sim.queue().bin_capacity(), 256);
    }

    #[test]
    fn zero_parameters_rejected() {
        for bad in [config(0, 4, 1), config(4, 0, 1), config(4, 4, 0)] {
            let err = SimBuilder::<()>::new(bad, NoopHandler).build().err().unwrap();
            assert!(err.is_invalid_argument(), "got {err}");
        }
    }

    #[test]
    fn registration_mints_sequential_kinds() {
        let mut builder = SimBuilder::<()>::new(SimConfig::default(), NoopHandler);
        assert_eq!(builder.next_kind().unwrap(), EventKind(1));
        assert_eq!(builder.register(NoopHandler).unwrap(), EventKind(1));
        assert_eq!(builder.register(NoopHandler).unwrap(), EventKind(2));
        let sim = builder.kind(NoopHandler).build().unwrap();
        assert_eq!(sim.kind_count(), 4);
    }

    #[test]
    fn kind_numbering_never_wraps() {
        let mut builder = SimBuilder::<()>::new(SimConfig::default(), NoopHandler);
        for _ in 1..u16::MAX {
            builder.register(NoopHandler).unwrap();
        }
        assert_eq!(builder.next_kind().unwrap(), EventKind(u16::MAX));
        assert_eq!(builder.register(NoopHandler).unwrap(), EventKind(u16::MAX));

        // 65,536 handlers: one more than u16 can number.
        assert!(builder.next_kind().unwrap_err().is_invalid_argument());
        assert!(builder.register(NoopHandler).unwrap_err().is_invalid_argument());
        let err = builder.kind(NoopHandler).build().err().unwrap();
        assert!(err.is_invalid_argument());
    }
}

// ── schedule ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule_tests {
    use super::*;

    #[test]
    fn causality_enforced() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 1));
        sim.simulate();
        sim.simulate();
        assert_eq!(sim.now(), Tick(2));

        let err = sim.schedule(Tick(1), CUSTOM, ()).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(sim.is_empty(), "rejected request must not mutate the queue");

        assert!(sim.schedule(Tick(2), CUSTOM, ()).is_ok());
        assert!(sim.schedule(Tick(50), CUSTOM, ()).is_ok());
    }

    #[test]
    fn unregistered_kind_rejected() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 1));
        assert!(sim.schedule(Tick(0), EventKind(1), ()).unwrap_err().is_invalid_argument());
        assert_eq!(sim.stats().events_free, 4);
    }

    #[test]
    fn capacity_exhaustion_reported() {
        let mut sim: Simulator<u8> = noop_sim(config(2, 2, 1));
        sim.schedule(Tick(0), CUSTOM, 0).unwrap();
        sim.schedule(Tick(0), CUSTOM, 1).unwrap();
        assert!(sim.schedule(Tick(0), CUSTOM, 2).unwrap_err().is_out_of_capacity());
        sim.simulate();
        assert!(sim.schedule(Tick(1), CUSTOM, 2).is_ok());
    }

    #[test]
    fn simulator_is_a_schedule_capability() {
        fn seed(sched: &mut dyn Schedule<u8>) -> DesResult<EventId> {
            let at = sched.now() + 3;
            sched.schedule(at, EventKind::CUSTOM, 1)
        }
        let mut sim: Simulator<u8> = noop_sim(config(2, 2, 1));
        seed(&mut sim).unwrap();
        assert_eq!(sim.queue().next_time(), Some(Tick(3)));
    }
}

// ── simulate ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod simulate_tests {
    use super::*;

    #[test]
    fn scenario_a_single_bin_drained_in_one_step() {
        let log: Log<(Tick, Option<u8>)> = Rc::default();
        let mut sim = SimBuilder::new(config(4, 4, 1), recorder(&log)).build().unwrap();
        for _ in 0..4 {
            sim.schedule(Tick(0), CUSTOM, None).unwrap();
        }
        assert_eq!(sim.queue().bin_count(), 1);
        assert_eq!(sim.queue().len(), 4);

        assert_eq!(sim.simulate(), 4);
        assert!(sim.is_empty());
        assert_eq!(sim.now(), Tick(1));
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn time_advances_without_events() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 3));
        assert_eq!(sim.simulate(), 0);
        assert_eq!(sim.simulate(), 0);
        assert_eq!(sim.now(), Tick(6));
    }

    #[test]
    fn step_window_is_half_open() {
        let log: Log<(Tick, u64)> = Rc::default();
        let mut sim = SimBuilder::new(config(16, 16, 5), recorder(&log)).build().unwrap();
        for t in [0u64, 4, 5, 9, 10] {
            sim.schedule(Tick(t), CUSTOM, t).unwrap();
        }
        assert_eq!(sim.simulate(), 2); // [0, 5)
        assert_eq!(sim.simulate(), 2); // [5, 10)
        assert_eq!(sim.simulate(), 1); // [10, 15)
        let payloads: Vec<u64> = log.borrow().iter().map(|&(_, p)| p).collect();
        assert_eq!(payloads, vec![0, 4, 5, 9, 10]);
    }

    #[test]
    fn timestamp_order_then_fifo() {
        let log: Log<(Tick, &'static str)> = Rc::default();
        let mut sim = SimBuilder::new(config(8, 8, 10), recorder(&log)).build().unwrap();
        sim.schedule(Tick(3), CUSTOM, "c1").unwrap();
        sim.schedule(Tick(1), CUSTOM, "a").unwrap();
        sim.schedule(Tick(3), CUSTOM, "c2").unwrap();
        sim.schedule(Tick(2), CUSTOM, "b").unwrap();
        sim.schedule(Tick(3), CUSTOM, "c3").unwrap();

        assert_eq!(sim.simulate(), 5);
        let order: Vec<&str> = log.borrow().iter().map(|&(_, p)| p).collect();
        assert_eq!(order, vec!["a", "b", "c1", "c2", "c3"]);
    }

    #[test]
    fn payload_passes_through_untouched() {
        let log: Log<(Tick, Vec<u8>)> = Rc::default();
        let mut sim = SimBuilder::new(config(2, 2, 1), recorder(&log)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, vec![1, 2, 3]).unwrap();
        sim.simulate();
        assert_eq!(log.borrow()[0], (Tick(0), vec![1, 2, 3]));
    }

    #[test]
    fn kinds_dispatch_to_their_handlers() {
        let generic: Log<(Tick, char)> = Rc::default();
        let special: Log<(Tick, char)> = Rc::default();
        let mut builder = SimBuilder::new(config(8, 8, 1), recorder(&generic));
        let kind = builder.register(recorder(&special)).unwrap();
        let mut sim = builder.build().unwrap();

        sim.schedule(Tick(0), CUSTOM, 'g').unwrap();
        sim.schedule(Tick(0), kind, 's').unwrap();
        sim.schedule(Tick(0), CUSTOM, 'h').unwrap();
        assert_eq!(sim.simulate(), 3);

        assert_eq!(*generic.borrow(), vec![(Tick(0), 'g'), (Tick(0), 'h')]);
        assert_eq!(*special.borrow(), vec![(Tick(0), 's')]);
    }
}

// ── Reentrancy ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reentrancy_tests {
    use super::*;

    /// Handler that schedules one follow-up `offset` ticks after each event,
    /// as long as the payload (a hop budget) is positive.
    fn hop(offset: u64) -> impl EventHandler<u32> + 'static {
        move |ev: &Event<u32>, sched: &mut dyn Schedule<u32>| {
            if ev.payload > 0 {
                sched.schedule(ev.time + offset, ev.kind, ev.payload - 1).unwrap();
            }
        }
    }

    #[test]
    fn reschedule_inside_window_runs_in_same_step() {
        let mut sim = SimBuilder::new(config(4, 4, 10), hop(3)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, 2).unwrap();
        // 0 → 3 → 6, all below the limit of 10.
        assert_eq!(sim.simulate(), 3);
        assert!(sim.is_empty());
    }

    #[test]
    fn reschedule_at_current_time_runs_in_same_step() {
        let mut sim = SimBuilder::new(config(4, 4, 1), hop(0)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, 5).unwrap();
        assert_eq!(sim.simulate(), 6);
        assert_eq!(sim.now(), Tick(1));
    }

    #[test]
    fn reschedule_at_limit_is_deferred() {
        let mut sim = SimBuilder::new(config(4, 4, 10), hop(10)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, 1).unwrap();
        assert_eq!(sim.simulate(), 1);
        assert_eq!(sim.queue().next_time(), Some(Tick(10)));
        assert_eq!(sim.simulate(), 1);
        assert!(sim.is_empty());
    }

    #[test]
    fn window_straddling_reschedule_splits_across_steps() {
        let mut sim = SimBuilder::new(config(4, 4, 10), hop(4)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, 4).unwrap();
        // 0, 4, 8 | 12, 16
        assert_eq!(sim.simulate(), 3);
        assert_eq!(sim.simulate(), 2);
        assert!(sim.is_empty());
    }

    #[test]
    fn handler_sees_backpressure_while_its_event_is_held() {
        let results: Log<bool> = Rc::default();
        let sink = Rc::clone(&results);
        let handler = move |ev: &Event<()>, sched: &mut dyn Schedule<()>| {
            let ok = sched.schedule(ev.time + 1, ev.kind, ()).is_ok();
            sink.borrow_mut().push(ok);
        };
        let mut sim = SimBuilder::new(config(1, 2, 1), handler).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, ()).unwrap();
        assert_eq!(sim.simulate(), 1);
        // The only slot was held by the event being handled.
        assert_eq!(*results.borrow(), vec![false]);
        assert!(sim.is_empty());
        assert!(sim.stats().is_conserved());
    }

    #[test]
    fn handler_cannot_schedule_into_the_past() {
        let results: Log<bool> = Rc::default();
        let sink = Rc::clone(&results);
        let handler = move |_: &Event<()>, sched: &mut dyn Schedule<()>| {
            let past = Tick(sched.now().0.saturating_sub(1));
            sink.borrow_mut().push(sched.schedule(past, CUSTOM, ()).is_ok());
        };
        let mut sim = SimBuilder::new(config(4, 4, 1), handler).build().unwrap();
        sim.simulate();
        sim.schedule(Tick(1), CUSTOM, ()).unwrap();
        sim.simulate();
        assert_eq!(*results.borrow(), vec![false]);
    }
}

// ── drain ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod drain_tests {
    use super::*;

    #[test]
    fn drain_is_idempotent_and_timeless() {
        let log: Log<(Tick, u8)> = Rc::default();
        let mut sim = SimBuilder::new(config(8, 8, 1), recorder(&log)).build().unwrap();
        sim.schedule(Tick(0), CUSTOM, 0).unwrap();
        sim.schedule(Tick(5), CUSTOM, 1).unwrap();
        sim.schedule(Tick::MAX, CUSTOM, 2).unwrap();

        assert_eq!(sim.drain(), 3);
        assert!(sim.is_empty());
        assert_eq!(sim.now(), Tick::ZERO);
        assert!(log.borrow().is_empty(), "drain must not run handlers");
        assert_eq!(sim.drain(), 0);

        let stats = sim.stats();
        assert_eq!(stats.events_free, 8);
        assert_eq!(stats.bins_free, 8);
    }

    #[test]
    fn drain_on_empty_simulator() {
        let mut sim: Simulator<()> = noop_sim(config(1, 1, 1));
        assert_eq!(sim.drain(), 0);
        assert!(sim.is_empty());
    }
}

// ── run / observers ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts:   u64,
        events:   u64,
        ends:     Vec<u64>,
        drained:  Option<u64>,
        summary:  Option<RunSummary>,
        violated: bool,
    }

    impl<P> SimObserver<P> for Counter {
        fn on_step_start(&mut self, _now: Tick) {
            self.starts += 1;
        }
        fn on_event(&mut self, _now: Tick, _ev: &Event<P>) {
            self.events += 1;
        }
        fn on_step_end(&mut self, _now: Tick, processed: u64, queue: &EventQueue<P>) {
            let stats = queue.stats();
            self.violated |= !stats.is_conserved() || stats.events_held != 0;
            self.ends.push(processed);
        }
        fn on_drain(&mut self, drained: u64) {
            self.drained = Some(drained);
        }
        fn on_run_end(&mut self, summary: &RunSummary) {
            self.summary = Some(*summary);
        }
    }

    /// The reference driver: ten self-perpetuating events at `index >> 1`,
    /// period 10, bounded by a horizon so the run ends.
    #[test]
    fn reference_driver_pattern() {
        let repeat = Repeat::every(10).unwrap().until(Tick(100));
        let mut sim = SimBuilder::new(SimConfig::default(), repeat).build().unwrap();
        for index in 0u64..10 {
            sim.schedule(Tick(index >> 1), CUSTOM, index).unwrap();
        }

        let mut obs = Counter::default();
        let summary = sim.run(1024 * 1024, &mut obs);

        // Timestamps 0..=4, two events each, ten occurrences below 100.
        assert_eq!(summary.events, 100);
        assert_eq!(summary.steps, 95);
        assert_eq!(summary.final_time, Tick(95));
        assert!(sim.is_empty());

        assert_eq!(obs.starts, 95);
        assert_eq!(obs.events, 100);
        assert_eq!(obs.ends.iter().sum::<u64>(), 100);
        assert_eq!(obs.summary, Some(summary));
        assert!(!obs.violated);

        assert_eq!(sim.drain_with(&mut obs), 0);
        assert_eq!(obs.drained, Some(0));
    }

    #[test]
    fn run_stops_at_step_bound() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 1));
        sim.schedule(Tick(1_000), CUSTOM, ()).unwrap();
        let summary = sim.run(3, &mut NoopObserver);
        assert_eq!(summary, RunSummary { steps: 3, events: 0, final_time: Tick(3) });
        assert!(!sim.is_empty());
        assert_eq!(sim.drain(), 1);
    }

    #[test]
    fn run_on_empty_queue_takes_one_step() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 2));
        let summary = sim.run(10, &mut NoopObserver);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.final_time, Tick(2));
    }

    #[test]
    fn zero_step_bound_runs_nothing() {
        let mut sim: Simulator<()> = noop_sim(config(4, 4, 1));
        sim.schedule(Tick(0), CUSTOM, ()).unwrap();
        let summary = sim.run(0, &mut NoopObserver);
        assert_eq!(summary.steps, 0);
        assert_eq!(sim.now(), Tick::ZERO);
        assert!(!sim.is_empty());
    }
}

// ── Handlers in isolation ─────────────────────────────────────────────────────

#[cfg(test)]
mod handler_tests {
    use super::*;

    /// A `Schedule` fake that records requests.
    struct FakeScheduler {
        now:      Tick,
        requests: Vec<(Tick, EventKind, u8)>,
        reject:   bool,
    }

    impl Schedule<u8> for FakeScheduler {
        fn now(&self) -> Tick {
            self.now
        }
        fn schedule(&mut self, time: Tick, kind: EventKind, payload: u8) -> DesResult<EventId> {
            if self.reject {
                return Err(des_core::DesError::OutOfCapacity { what: "event", capacity: 0 });
            }
            self.requests.push((time, kind, payload));
            Ok(EventId(self.requests.len() as u32 - 1))
        }
    }

    fn fake() -> FakeScheduler {
        FakeScheduler { now: Tick(0), requests: vec![], reject: false }
    }

    #[test]
    fn repeat_requires_positive_period() {
        assert!(Repeat::every(0).unwrap_err().is_invalid_argument());
        assert_eq!(Repeat::every(10).unwrap().period(), 10);
    }

    #[test]
    fn repeat_reschedules_same_kind_and_payload() {
        let mut fake = fake();
        let mut repeat = Repeat::every(10).unwrap();
        repeat.handle(&Event::new(Tick(3), EventKind(2), 7u8), &mut fake);
        assert_eq!(fake.requests, vec![(Tick(13), EventKind(2), 7)]);
    }

    #[test]
    fn repeat_stops_at_horizon() {
        let mut fake = fake();
        let mut repeat = Repeat::every(10).unwrap().until(Tick(20));
        repeat.handle(&Event::new(Tick(9), CUSTOM, 0u8), &mut fake);
        repeat.handle(&Event::new(Tick(10), CUSTOM, 0u8), &mut fake);
        assert_eq!(fake.requests, vec![(Tick(19), CUSTOM, 0)]);
    }

    #[test]
    fn repeat_survives_rejection() {
        let mut fake = FakeScheduler { reject: true, ..fake() };
        let mut repeat = Repeat::every(1).unwrap();
        repeat.handle(&Event::new(Tick(0), CUSTOM, 0u8), &mut fake);
        assert!(fake.requests.is_empty());
    }

    #[test]
    fn noop_handler_schedules_nothing() {
        let mut fake = fake();
        NoopHandler.handle(&Event::new(Tick(0), CUSTOM, 1u8), &mut fake);
        assert!(fake.requests.is_empty());
    }
}
