//! `des-core` — foundational types for the `rust_des` event simulation engine.
//!
//! This crate is a dependency of every other `des-*` crate.  It intentionally
//! has no `des-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EventId`, `BinId` — arena slot handles               |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`event`]       | `EventKind`, `Event<P>`                               |
//! | [`error`]       | `DesError`, `DesResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `Tick`, `EventKind` and  |
//!           | `SimConfig` so applications can load run configuration.    |

pub mod error;
pub mod event;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DesError, DesResult};
pub use event::{Event, EventKind};
pub use ids::{BinId, EventId};
pub use time::{SimConfig, Tick};
