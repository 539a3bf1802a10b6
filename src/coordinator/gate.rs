//! # Activation gate: the coordinator's sole suspension point.
//!
//! [`ActivationGate`] plays the role a mutex/condition-variable pair plays
//! in a thread-based design: the coordinator parks on it while idle or
//! while an entity is active, and is woken by `show` (queue became
//! non-empty) or by a completion hook.
//!
//! ## Wake discipline
//! - [`signal_all`](ActivationGate::signal_all) is a **broadcast**: it
//!   bumps an epoch counter and wakes every current waiter via
//!   [`tokio::sync::Notify::notify_waiters`].
//! - [`wait`](ActivationGate::wait) registers with the `Notify` *before*
//!   reading the epoch (the pin/`enable` pattern), so a signal racing with
//!   a waiter about to park is never lost.
//! - Waiters compare epochs rather than counting signals: multiple signals
//!   between wakes coalesce, and a spuriously-woken waiter loops and
//!   re-checks — classic condition-variable discipline.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Notify;

/// Broadcast wake-up point shared by producers, completion hooks and the
/// coordinator loop.
#[derive(Default)]
pub(crate) struct ActivationGate {
    epoch: AtomicU64,
    notify: Notify,
}

impl ActivationGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Signals all waiters that the world changed (broadcast, not
    /// single-wake).
    pub(crate) fn signal_all(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.notify.notify_waiters();
    }

    /// Suspends until the epoch moves past `seen`, then stores the new
    /// epoch into `seen`.
    ///
    /// Returns immediately if a signal already happened since the caller
    /// last waited. Cancel-safe: dropping the future mid-wait loses
    /// nothing, the epoch comparison catches up on the next call.
    pub(crate) async fn wait(&self, seen: &mut u64) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register as a waiter before checking the guard; a broadcast
            // between the check and the await will still wake us.
            notified.as_mut().enable();

            let current = self.epoch.load(Ordering::Acquire);
            if current != *seen {
                *seen = current;
                return;
            }
            notified.await;
        }
    }
}
