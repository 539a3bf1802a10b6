//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the coordinator, the
//! presenter, completion hooks and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Coordinator` (queue operations), `Presenter`
//!   (activation protocol), completion hooks, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: the coordinator's subscriber listener (fans out to
//!   `SubscriberSet`) and anything holding a receiver from
//!   [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
