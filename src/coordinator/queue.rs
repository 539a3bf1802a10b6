//! # Wait queue of pending entities.
//!
//! [`WaitQueue`] is the only structure producer threads mutate. It is an
//! order-preserving, identity-deduplicated sequence: insertion order is
//! activation order, and an entity appears at most once.
//!
//! ## Rules
//! - All operations are total and internally synchronized; concurrent
//!   `enqueue_if_absent` from many producers may interleave with
//!   `remove_first`/`remove`/`clear` from the coordination side.
//! - Duplicate presentation requests for the same entity collapse to one
//!   (`enqueue_if_absent` returns `None`).
//! - Critical sections are short and never call into entity code.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::presentables::{same_entity, PresentableRef};

/// Thread-safe FIFO of entities waiting to be activated.
#[derive(Default)]
pub struct WaitQueue {
    inner: Mutex<VecDeque<PresentableRef>>,
}

impl WaitQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entity` unless it is already queued.
    ///
    /// Returns the queue length after the insert, or `None` if the entity
    /// was already present (the request collapses).
    pub fn enqueue_if_absent(&self, entity: PresentableRef) -> Option<usize> {
        let mut inner = lock(&self.inner);
        if inner.iter().any(|e| same_entity(e, &entity)) {
            return None;
        }
        inner.push_back(entity);
        Some(inner.len())
    }

    /// Removes and returns the front entity, if any.
    pub fn remove_first(&self) -> Option<PresentableRef> {
        lock(&self.inner).pop_front()
    }

    /// Removes `entity` wherever it sits in the queue.
    ///
    /// Returns `true` if it was present.
    pub fn remove(&self, entity: &PresentableRef) -> bool {
        let mut inner = lock(&self.inner);
        match inner.iter().position(|e| same_entity(e, entity)) {
            Some(idx) => {
                inner.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every queued entity; returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut inner = lock(&self.inner);
        let dropped = inner.len();
        inner.clear();
        dropped
    }

    /// Returns `true` if `entity` is currently queued.
    pub fn contains(&self, entity: &PresentableRef) -> bool {
        lock(&self.inner).iter().any(|e| same_entity(e, entity))
    }

    /// Returns `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }

    /// Returns the number of waiting entities.
    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    /// Returns a point-in-time copy of the queue contents, front first.
    ///
    /// Used by the host-invalidation sweep; the queue may change the
    /// moment the lock is released.
    pub fn snapshot(&self) -> Vec<PresentableRef> {
        lock(&self.inner).iter().cloned().collect()
    }
}

/// Critical sections here never panic, so a poisoned lock is recoverable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentables::ModalFn;

    fn entity(name: &'static str) -> PresentableRef {
        ModalFn::arc(name, || {})
    }

    #[test]
    fn test_preserves_insertion_order() {
        let queue = WaitQueue::new();
        let (a, b, c) = (entity("a"), entity("b"), entity("c"));

        assert_eq!(queue.enqueue_if_absent(a.clone()), Some(1));
        assert_eq!(queue.enqueue_if_absent(b.clone()), Some(2));
        assert_eq!(queue.enqueue_if_absent(c.clone()), Some(3));

        let first = queue.remove_first().unwrap();
        assert!(same_entity(&first, &a));
        let second = queue.remove_first().unwrap();
        assert!(same_entity(&second, &b));
        let third = queue.remove_first().unwrap();
        assert!(same_entity(&third, &c));
        assert!(queue.remove_first().is_none());
    }

    #[test]
    fn test_duplicates_collapse() {
        let queue = WaitQueue::new();
        let a = entity("a");

        assert_eq!(queue.enqueue_if_absent(a.clone()), Some(1));
        assert_eq!(queue.enqueue_if_absent(a.clone()), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let queue = WaitQueue::new();
        let (a, b) = (entity("a"), entity("b"));
        queue.enqueue_if_absent(a.clone());
        queue.enqueue_if_absent(b.clone());

        assert!(queue.remove(&b));
        assert!(!queue.remove(&b));
        assert!(queue.contains(&a));
        assert!(!queue.contains(&b));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let queue = WaitQueue::new();
        queue.enqueue_if_absent(entity("a"));
        queue.enqueue_if_absent(entity("b"));

        assert_eq!(queue.clear(), 2);
        assert_eq!(queue.clear(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_order() {
        let queue = WaitQueue::new();
        let (a, b) = (entity("a"), entity("b"));
        queue.enqueue_if_absent(a.clone());
        queue.enqueue_if_absent(b.clone());

        let snap = queue.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(same_entity(&snap[0], &a));
        assert!(same_entity(&snap[1], &b));
        assert_eq!(queue.len(), 2);
    }
}
