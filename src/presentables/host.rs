//! # Host context handles.
//!
//! A [`HostContext`] stands in for whatever owns an entity's lifetime — an
//! activity, a window, a view controller. Entities that belong to a host
//! return its handle from [`Presentable::host`](crate::Presentable::host);
//! when the host goes away, the owner calls
//! [`Coordinator::on_host_invalidated`](crate::Coordinator::on_host_invalidated)
//! and every queued entity bound to that host is removed before it can
//! activate.
//!
//! Validity is an explicit flag, flipped once by [`invalidate`]
//! (`HostContext::invalidate`) and never reset. Equality between handles is
//! allocation identity, the same rule entities use.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared handle to a host context.
pub type HostRef = Arc<HostContext>;

/// Lifetime marker for the thing that owns presentable entities.
#[derive(Debug, Default)]
pub struct HostContext {
    invalidated: AtomicBool,
}

impl HostContext {
    /// Creates a valid host handle.
    #[must_use]
    pub fn arc() -> HostRef {
        Arc::new(Self::default())
    }

    /// Marks the host as gone. One-way: there is no way back to valid.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    /// Returns `true` while the host has not been invalidated.
    pub fn is_valid(&self) -> bool {
        !self.invalidated.load(Ordering::Acquire)
    }
}

/// Returns `true` iff both handles name the same host.
#[inline]
pub fn same_host(a: &HostRef, b: &HostRef) -> bool {
    Arc::ptr_eq(a, b)
}
