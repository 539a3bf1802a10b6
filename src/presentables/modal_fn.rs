//! # Function-backed presentable (`ModalFn`)
//!
//! [`ModalFn`] wraps a closure `F: Fn()` that runs when the entity is
//! activated, and embeds a [`Completion`] registry so completion
//! notification composes out of the box. It is the quickest way to put
//! something real into the queue without writing a full
//! [`Presentable`] implementation, and it is what this crate's own tests
//! present.
//!
//! ## Completion paths
//! - [`ModalFn::complete`] — the entity finished on its own (the user
//!   dismissed it). Call this from your UI's dismiss callback.
//! - [`Presentable::force_complete`] — the coordinator terminated it.
//!   [`ModalFn::forced_graceful`] reports which flavor was used, which is
//!   handy for assertions and diagnostics.
//!
//! ## Example
//! ```rust
//! use modalq::{ModalFn, Presentable, PresentableRef};
//!
//! let modal = ModalFn::arc("rate-us", || {
//!     // hand the dialog to the toolkit here
//! });
//!
//! let entity: PresentableRef = modal.clone();
//! assert_eq!(entity.name(), "rate-us");
//!
//! // later, from the dismiss callback:
//! modal.complete();
//! ```

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::HookError;
use crate::presentables::completion::Completion;
use crate::presentables::host::HostRef;
use crate::presentables::presentable::{CompletionHook, Presentable};

/// Function-backed presentable entity.
///
/// Wraps a closure invoked on activation; identity is the `Arc`
/// allocation, so clone the same `Arc` when you need to target this entity
/// in `remove` or `Cancel`.
pub struct ModalFn<F> {
    name: Cow<'static, str>,
    on_activate: F,
    completion: Completion,
    host: Option<HostRef>,
    /// `Some(graceful)` once the coordinator force-completed this entity.
    forced: Mutex<Option<bool>>,
}

impl<F> ModalFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    /// Creates a new function-backed entity.
    ///
    /// Prefer [`ModalFn::arc`] when you immediately need a shared handle.
    pub fn new(name: impl Into<Cow<'static, str>>, on_activate: F) -> Self {
        Self {
            name: name.into(),
            on_activate,
            completion: Completion::new(),
            host: None,
            forced: Mutex::new(None),
        }
    }

    /// Creates the entity and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, on_activate: F) -> Arc<Self> {
        Arc::new(Self::new(name, on_activate))
    }

    /// Binds the entity to a host context for lifecycle sweeping.
    #[must_use]
    pub fn with_host(mut self, host: HostRef) -> Self {
        self.host = Some(host);
        self
    }

    /// Signals that the entity finished on its own (user dismissal).
    ///
    /// Fires the completion registry; safe to call from any thread and
    /// idempotent.
    pub fn complete(&self) {
        self.completion.fire();
    }

    /// Returns `Some(graceful)` if the coordinator force-completed this
    /// entity, `None` otherwise.
    pub fn forced_graceful(&self) -> Option<bool> {
        *lock(&self.forced)
    }

    /// Returns `true` once this entity has completed, by any path.
    pub fn has_completed(&self) -> bool {
        self.completion.has_fired()
    }
}

impl<F> Presentable for ModalFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&self) {
        (self.on_activate)();
    }

    fn force_complete(&self, graceful: bool) {
        {
            let mut forced = lock(&self.forced);
            if forced.is_none() {
                *forced = Some(graceful);
            }
        }
        self.completion.fire();
    }

    fn on_completion(&self, hook: CompletionHook) -> Result<(), HookError> {
        self.completion.subscribe(hook);
        Ok(())
    }

    fn host(&self) -> Option<HostRef> {
        self.host.clone()
    }
}

impl<F> std::fmt::Debug for ModalFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalFn")
            .field("name", &self.name)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

/// Critical sections here never panic, so a poisoned lock is recoverable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_activate_runs_closure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&hits);
        let modal = ModalFn::new("m", move || {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        modal.activate();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_force_complete_records_first_flavor() {
        let modal = ModalFn::new("m", || {});
        assert_eq!(modal.forced_graceful(), None);

        modal.force_complete(true);
        modal.force_complete(false);
        assert_eq!(modal.forced_graceful(), Some(true));
        assert!(modal.has_completed());
    }

    #[test]
    fn test_user_completion_fires_hooks() {
        let modal = ModalFn::new("m", || {});
        let hits = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&hits);
        modal
            .on_completion(Box::new(move || {
                probe.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        modal.complete();
        modal.complete();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(modal.forced_graceful(), None);
    }
}
