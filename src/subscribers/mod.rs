//! # Event subscribers.
//!
//! ```text
//! Bus ──► orchestrator listener ──► SubscriberSet
//!                                      ├──► LogWriter      (tracing output)
//!                                      └──► user subscribers
//! ```
//!
//! Subscribers observe; nothing in the refresh loop depends on what they see.

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
