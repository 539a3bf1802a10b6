//! Event subscribers: trait, fan-out set, and the optional log printer.
//!
//! ## Contents
//! - [`Subscribe`] the extension point for custom event handlers
//! - [`SubscriberSet`] per-subscriber queues + workers with panic
//!   isolation
//! - `LogWriter` (feature `logging`) stdout printer for demos and tests

mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
mod log;

pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
