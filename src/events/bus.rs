//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. The refresh loop, the dispatch
//! fan-out and every worker runner publish into it; the orchestrator's listener
//! forwards events to the [`SubscriberSet`](crate::SubscriberSet), and callers
//! may take their own receivers with [`Bus::subscribe`].
//!
//! ```text
//! Scheduler ───┐
//! Fan-out   ───┼──► Bus ───► listener ───► SubscriberSet ───► LogWriter / ...
//! Workers   ───┘        └──► Bus::subscribe() (tests, embedding code)
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receivers the event is dropped.
//! - One ring buffer of `capacity` events is shared by all receivers.
//! - A receiver that falls behind gets `RecvError::Lagged(n)` and skips `n` events.
//! - Events published by one task are observed in publish order.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
