//! `des-queue` — fixed-capacity pools and the time-ordered event queue.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`pool`]       | `Pool<T>` — slot arena with a LIFO free-index stack        |
//! | [`event_pool`] | `EventPool<P>` — event arena, validates event kinds        |
//! | [`list`]       | `EventList` — intrusive FIFO threaded through slot links   |
//! | [`bin`]        | `EventBin` — same-timestamp bucket                         |
//! | [`bin_pool`]   | `BinPool` — bin arena                                      |
//! | [`queue`]      | `EventQueue<P>`, `Dequeued<P>`, chain iteration            |
//! | [`stats`]      | `QueueStats` — conservation snapshot                       |
//!
//! # Ownership model
//!
//! Nothing here hands out references into the arenas across calls.  Links
//! are `u32` slot indices with a `u32::MAX` "none" sentinel, so a dangling or
//! aliased link is impossible by construction; misuse of the slot lifecycle
//! (double release, releasing a linked slot) panics.
//!
//! Dequeued events are moved out of their slot into a [`Dequeued`] value that
//! must be passed back to [`EventQueue::recycle`].  Until then the slot counts
//! as held and is unavailable for new events.

pub mod bin;
pub mod bin_pool;
pub mod event_pool;
pub mod list;
pub mod pool;
pub mod queue;
pub mod stats;


pub use bin::EventBin;
pub use bin_pool::BinPool;
pub use event_pool::EventPool;
pub use list::{EventList, ListIter};
pub use pool::Pool;
pub use queue::{BinRef, Bins, Dequeued, EventQueue};
pub use stats::QueueStats;
