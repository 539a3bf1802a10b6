//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [enqueued] entity="confirm-exit" pending=1
//! [activated] entity="confirm-exit" pending=0
//! [dismissed] entity="confirm-exit"
//! [queue-cleared]
//! [coordinator-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Enqueued => {
                println!("[enqueued] entity={:?} pending={:?}", e.entity, e.pending);
            }
            EventKind::DuplicateCollapsed => {
                println!("[duplicate-collapsed] entity={:?}", e.entity);
            }
            EventKind::Removed => {
                println!("[removed] entity={:?}", e.entity);
            }
            EventKind::QueueCleared => {
                println!("[queue-cleared]");
            }
            EventKind::Activated => {
                println!("[activated] entity={:?} pending={:?}", e.entity, e.pending);
            }
            EventKind::ActivationSkipped => {
                println!("[activation-skipped] entity={:?}", e.entity);
            }
            EventKind::HookFailed => {
                println!("[hook-failed] entity={:?} err={:?}", e.entity, e.reason);
            }
            EventKind::Completed => {
                println!("[completed] entity={:?}", e.entity);
            }
            EventKind::Dismissed => {
                println!("[dismissed] entity={:?}", e.entity);
            }
            EventKind::Cancelled => {
                println!("[cancelled] entity={:?}", e.entity);
            }
            EventKind::HostInvalidated => {
                println!("[host-invalidated]");
            }
            EventKind::CoordinatorStopped => {
                println!("[coordinator-stopped]");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.entity, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.entity.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
