//! # Active slot: the at-most-one-active invariant, made concrete.
//!
//! [`ActiveSlot`] holds at most one entity reference plus an `is_active`
//! flag. It is mutated only from the presentation side (command handlers
//! and completion hooks); everything else may read the flag for
//! diagnostics and for the `show` signal guard, never for coordinator
//! control decisions.
//!
//! ## Invariant
//! `is_active() == true` iff an activation is in progress
//! ([`begin_activation`](ActiveSlot::begin_activation) through
//! [`install`](ActiveSlot::install)) or the slot holds an entity that has
//! not yet completed or been force-cleared. The flag is raised *before*
//! the queue is popped so that a producer observing a momentarily-empty
//! queue cannot mistake mid-activation for idle.
//!
//! ## Rules
//! - The flag drops *before* the entity is told to force-complete, and
//!   entity callbacks run outside the internal lock. A completion hook may
//!   therefore re-enter [`release`](ActiveSlot::release) without
//!   deadlocking.
//! - [`clear_if`](ActiveSlot::clear_if) and [`release`](ActiveSlot::release)
//!   compare identity: a stale cancel or completion aimed at an entity that
//!   was already replaced is a no-op and cannot corrupt a newer active
//!   entity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::presentables::{same_entity, PresentableRef};

/// Holder of the single currently-active entity.
#[derive(Default)]
pub(crate) struct ActiveSlot {
    current: Mutex<Option<PresentableRef>>,
    active: AtomicBool,
}

impl ActiveSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Raises the `is_active` flag ahead of the queue pop, claiming the
    /// activation window before any entity is installed.
    pub(crate) fn begin_activation(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Lowers the flag after an activation pass that installed nothing
    /// (queue drained, every candidate skipped).
    pub(crate) fn abort_activation(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Installs `entity` as the active one. The previous occupant, if any,
    /// must already have been cleared.
    pub(crate) fn install(&self, entity: PresentableRef) {
        *lock(&self.current) = Some(entity);
        self.active.store(true, Ordering::Release);
    }

    /// Unconditionally clears the slot, force-completing the occupant.
    ///
    /// `graceful = true` is the dismissal path, `false` the cancel path.
    /// Returns the entity that was cleared, if any.
    pub(crate) fn clear(&self, graceful: bool) -> Option<PresentableRef> {
        let taken = lock(&self.current).take();
        self.active.store(false, Ordering::Release);
        if let Some(entity) = &taken {
            entity.force_complete(graceful);
        }
        taken
    }

    /// Clears the slot only if it currently holds exactly `target`.
    ///
    /// Returns the entity that was cleared, if any.
    pub(crate) fn clear_if(
        &self,
        target: &PresentableRef,
        graceful: bool,
    ) -> Option<PresentableRef> {
        let taken = {
            let mut current = lock(&self.current);
            match &*current {
                Some(occupant) if same_entity(occupant, target) => current.take(),
                _ => None,
            }
        };
        if let Some(entity) = &taken {
            self.active.store(false, Ordering::Release);
            entity.force_complete(graceful);
        }
        taken
    }

    /// Detaches `target` without force-completing it.
    ///
    /// This is the completion-hook path: the entity already finished on
    /// its own, the slot just needs to forget it. Returns `true` if the
    /// slot held `target`.
    pub(crate) fn release(&self, target: &PresentableRef) -> bool {
        let released = {
            let mut current = lock(&self.current);
            match &*current {
                Some(occupant) if same_entity(occupant, target) => {
                    *current = None;
                    true
                }
                _ => false,
            }
        };
        if released {
            self.active.store(false, Ordering::Release);
        }
        released
    }

    /// Returns `true` while an activated entity occupies the slot.
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Returns `true` if an entity is installed (activated and neither
    /// completed nor cleared). Unlike [`is_active`](ActiveSlot::is_active)
    /// this ignores a claim with no occupant.
    pub(crate) fn is_occupied(&self) -> bool {
        lock(&self.current).is_some()
    }
}

/// Critical sections here never panic, so a poisoned lock is recoverable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
