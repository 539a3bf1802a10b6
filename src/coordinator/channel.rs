//! # Presentation channel: one-way hand-off to the presentation thread.
//!
//! [`PresentationChannel`] wraps an unbounded `tokio::sync::mpsc` sender
//! of [`Command`]s. Commands are delivered in FIFO order to the single
//! consumer (the [`Presenter`](crate::Presenter)) and each is processed
//! synchronously before the next is taken.
//!
//! The channel is unbounded so that neither producers nor the coordinator
//! ever block on presentation-thread latency: communication is strictly
//! one-directional and asynchronous.

use tokio::sync::mpsc;

use crate::presentables::PresentableRef;

/// Commands processed by the presentation side.
pub(crate) enum Command {
    /// Pop and activate the next entity; ignored while one is already
    /// installed (stale wake-up).
    Activate,
    /// Gracefully force-complete the active entity, if any.
    Complete,
    /// Force-cancel: unconditionally (`None`) or only if the slot holds
    /// exactly the given entity (`Some`).
    Cancel(Option<PresentableRef>),
}

/// Sending half of the presentation hand-off.
#[derive(Clone)]
pub(crate) struct PresentationChannel {
    tx: mpsc::UnboundedSender<Command>,
}

impl PresentationChannel {
    /// Creates the channel pair.
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Posts a command; returns `false` if the presenter is gone.
    ///
    /// Producer-facing callers ignore the result (a closed channel means
    /// shutdown); the coordinator loop uses it to reach its terminal
    /// state.
    pub(crate) fn post(&self, cmd: Command) -> bool {
        self.tx.send(cmd).is_ok()
    }
}
