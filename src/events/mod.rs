//! Runtime events: types and broadcast bus.
//!
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! **Publishers**: `Orchestrator` (acquire/snapshot/shutdown), `Generations`
//! (start/cancel), `dispatch` (launch/unknown job), worker runners (exit),
//! `SubscriberSet` workers (overflow/panic).
//!
//! **Consumers**: the orchestrator's subscriber listener and any receiver
//! obtained via [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
