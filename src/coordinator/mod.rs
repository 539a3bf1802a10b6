//! The serialization engine: wait queue, gate, slot, channel, loop.
//!
//! ## Contents
//! - [`WaitQueue`] thread-safe FIFO of pending entities
//! - [`Coordinator`] producer API plus the Idle/Dispatching/Active loop
//! - [`Presenter`] presentation-thread command processor
//!
//! The gate, slot and channel are internal: their guarantees surface
//! through the coordinator contract (at most one active entity, strict
//! FIFO activation, race-safe cancellation).

mod channel;
mod core;
mod gate;
mod presenter;
mod queue;
mod slot;

pub use core::Coordinator;
pub use presenter::Presenter;
pub use queue::WaitQueue;
