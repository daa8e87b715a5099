//! Fluent builder for constructing a [`Simulator`].

use des_core::{DesError, DesResult, EventKind, SimConfig, Tick};
use des_queue::EventQueue;
use log::debug;

use crate::{EventHandler, Simulator};

/// Fluent builder for [`Simulator<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — capacities and time step
/// - a generic handler for [`EventKind::CUSTOM`]
///
/// # Extra kinds
///
/// Each [`kind`][Self::kind] / [`register`][Self::register] call adds one
/// event kind served by its own handler.  Kinds are numbered in registration
/// order starting at 1; unregistered kinds are rejected by `schedule`.
///
/// # Example
///
/// ```rust,ignore
/// let mut builder = SimBuilder::new(SimConfig::default(), NoopHandler);
/// let tick = builder.register(Repeat::every(10)?)?;
/// let mut sim = builder.build()?;
/// sim.schedule(Tick(0), tick, payload)?;
/// ```
pub struct SimBuilder<P> {
    config:   SimConfig,
    handlers: Vec<Box<dyn EventHandler<P>>>,
}

impl<P> SimBuilder<P> {
    /// Create a builder with the configuration and the generic handler.
    pub fn new<H>(config: SimConfig, handler: H) -> Self
    where
        H: EventHandler<P> + 'static,
    {
        Self { config, handlers: vec![Box::new(handler)] }
    }

    /// Register a handler for a new event kind (fluent form).
    ///
    /// Registering more kinds than `u16` can number is reported by
    /// [`build`][Self::build].
    pub fn kind<H>(mut self, handler: H) -> Self
    where
        H: EventHandler<P> + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Register a handler for a new event kind and return that kind.
    ///
    /// Fails with `InvalidArgument` once every `u16` kind is taken; the
    /// handler is not registered then.
    pub fn register<H>(&mut self, handler: H) -> DesResult<EventKind>
    where
        H: EventHandler<P> + 'static,
    {
        let kind = self.next_kind()?;
        self.handlers.push(Box::new(handler));
        Ok(kind)
    }

    /// The kind the next registration will receive.
    pub fn next_kind(&self) -> DesResult<EventKind> {
        kind_count(self.handlers.len()).map(EventKind)
    }

    /// Validate the configuration, reserve both pools, and return a
    /// simulator at time zero.
    pub fn build(self) -> DesResult<Simulator<P>> {
        self.config.validate()?;
        let kinds = kind_count(self.handlers.len())?;

        let queue = EventQueue::with_kinds(
            self.config.event_capacity,
            self.config.bin_capacity,
            kinds,
        )?;
        debug!(
            "simulator ready: {} events, {} bins, step {}, {kinds} kinds",
            self.config.event_capacity, self.config.bin_capacity, self.config.time_step
        );

        Ok(Simulator {
            config:   self.config,
            queue,
            handlers: self.handlers,
            now:      Tick::ZERO,
        })
    }
}

fn kind_count(handlers: usize) -> DesResult<u16> {
    u16::try_from(handlers)
        .map_err(|_| DesError::invalid("kinds", "more than u16::MAX event kinds"))
}
