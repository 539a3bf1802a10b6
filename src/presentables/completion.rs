//! # One-shot, multi-listener completion registry.
//!
//! [`Completion`] is the building block entities embed to satisfy
//! [`Presentable::on_completion`](crate::Presentable::on_completion). It
//! replaces the reflective listener interception of the system this crate
//! descends from with an explicit registration API: any number of hooks
//! may subscribe, and all of them observe completion exactly once.
//!
//! ## Rules
//! - [`fire`](Completion::fire) invokes every subscribed hook at most once;
//!   a second `fire` is a no-op.
//! - Hooks are invoked outside the internal lock, so a hook may freely call
//!   back into the entity or the coordinator.
//! - Subscribing after the registry fired invokes the hook immediately —
//!   late observers still see completion exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::presentables::presentable::CompletionHook;

/// One-shot completion signal with multi-listener registration.
#[derive(Default)]
pub struct Completion {
    fired: AtomicBool,
    hooks: Mutex<Vec<CompletionHook>>,
}

impl Completion {
    /// Creates an empty, un-fired registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook to run when the entity completes.
    ///
    /// If completion already happened the hook runs immediately, on the
    /// caller's thread.
    pub fn subscribe(&self, hook: CompletionHook) {
        {
            let mut hooks = lock(&self.hooks);
            if !self.fired.load(Ordering::Acquire) {
                hooks.push(hook);
                return;
            }
        }
        hook();
    }

    /// Fires the completion signal.
    ///
    /// The first call drains and invokes every subscribed hook; subsequent
    /// calls return without side effects.
    pub fn fire(&self) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }
        let drained: Vec<CompletionHook> = {
            let mut hooks = lock(&self.hooks);
            hooks.drain(..).collect()
        };
        for hook in drained {
            hook();
        }
    }

    /// Returns `true` once [`fire`](Completion::fire) has been called.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("fired", &self.has_fired())
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
    use std::sync::Arc;

    fn counter_hook(n: &Arc<AtomicUsize>) -> CompletionHook {
        let n = Arc::clone(n);
        Box::new(move || {
            n.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_all_hooks_fire_once() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        completion.subscribe(counter_hook(&count));
        completion.subscribe(counter_hook(&count));
        completion.subscribe(counter_hook(&count));

        completion.fire();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(completion.has_fired());
    }

    #[test]
    fn test_second_fire_is_noop() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        completion.subscribe(counter_hook(&count));
        completion.fire();
        completion.fire();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_late_subscribe_runs_immediately() {
        let completion = Completion::new();
        completion.fire();

        let count = Arc::new(AtomicUsize::new(0));
        completion.subscribe(counter_hook(&count));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unfired_registry_holds_hooks() {
        let completion = Completion::new();
        let count = Arc::new(AtomicUsize::new(0));

        completion.subscribe(counter_hook(&count));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!completion.has_fired());
    }
}
