//! # Runtime events emitted by the coordinator and the presenter.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Queue events**: entities entering and leaving the wait queue
//! - **Presentation events**: activation, completion, cancellation
//! - **Lifecycle events**: coordinator shutdown, host invalidation
//! - **Subscriber events**: fan-out overflow and panic reports
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! the entity name, reasons, and the pending-queue depth.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use modalq::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Enqueued)
//!     .with_entity("confirm-exit")
//!     .with_pending(3);
//!
//! assert_eq!(ev.kind, EventKind::Enqueued);
//! assert_eq!(ev.entity.as_deref(), Some("confirm-exit"));
//! assert_eq!(ev.pending, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Queue events ===
    /// Entity entered the wait queue.
    ///
    /// Sets:
    /// - `entity`: entity name
    /// - `pending`: queue length after the insert
    Enqueued,

    /// `show` was called for an entity already queued; the request collapsed.
    ///
    /// Sets:
    /// - `entity`: entity name
    DuplicateCollapsed,

    /// Entity was removed from the wait queue before activation.
    ///
    /// Sets:
    /// - `entity`: entity name
    Removed,

    /// The wait queue was cleared by `remove_all`.
    QueueCleared,

    // === Presentation events ===
    /// Entity became the single active one; its `activate` is about to run.
    ///
    /// Sets:
    /// - `entity`: entity name
    /// - `pending`: entities still waiting behind it
    Activated,

    /// Entity was popped for activation but its host context was invalid;
    /// it was synthetically cancelled instead of presented.
    ///
    /// Sets:
    /// - `entity`: entity name
    ActivationSkipped,

    /// Entity rejected the coordinator's completion hook and was
    /// force-cancelled so the queue could continue.
    ///
    /// Sets:
    /// - `entity`: entity name
    /// - `reason`: hook error message
    HookFailed,

    /// Active entity completed on its own (user dismissal).
    ///
    /// Sets:
    /// - `entity`: entity name
    Completed,

    /// Active entity was force-completed gracefully via `dismiss_active`.
    ///
    /// Sets:
    /// - `entity`: entity name
    Dismissed,

    /// Active entity was force-cancelled.
    ///
    /// Sets:
    /// - `entity`: entity name
    Cancelled,

    // === Lifecycle events ===
    /// A host context was invalidated; matching queued entities are swept.
    HostInvalidated,

    /// Coordinator loop reached its terminal state and exited.
    ///
    /// Queued-but-unactivated entities are abandoned at this point.
    CoordinatorStopped,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `entity`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `entity`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the entity (or subscriber), if applicable.
    pub entity: Option<Arc<str>>,
    /// Human-readable reason (hook errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Wait-queue depth observed when the event was produced.
    pub pending: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            entity: None,
            reason: None,
            pending: None,
        }
    }

    /// Attaches an entity (or subscriber) name.
    #[inline]
    pub fn with_entity(mut self, entity: impl Into<Arc<str>>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the observed wait-queue depth.
    #[inline]
    pub fn with_pending(mut self, pending: usize) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_entity(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_entity(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
