//! Error types used by the modalq runtime.
//!
//! This module defines two error enums:
//!
//! - [`CoordinatorError`] — lifecycle misuse of the coordinator itself.
//! - [`HookError`] — an entity rejecting the coordinator's completion hook.
//!
//! Producer-facing queue operations (`show`, `dismiss_active`,
//! `cancel_active`, `remove`, `remove_all`) are error-free by contract:
//! every failure in the pipeline is handled locally and reported through
//! the event bus instead of the call site.

use thiserror::Error;

/// # Errors produced by coordinator lifecycle calls.
///
/// Both variants indicate API misuse rather than runtime failure: the
/// coordinator loop may be started once, and the presenter may be taken
/// once.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorError {
    /// `start` was called on a coordinator whose loop is already running.
    #[error("coordinator already started")]
    AlreadyStarted,

    /// `take_presenter` was called a second time.
    #[error("presenter already taken")]
    PresenterTaken,
}

impl CoordinatorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use modalq::CoordinatorError;
    ///
    /// assert_eq!(CoordinatorError::AlreadyStarted.as_label(), "coordinator_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinatorError::AlreadyStarted => "coordinator_already_started",
            CoordinatorError::PresenterTaken => "presenter_taken",
        }
    }
}

/// # Errors produced when installing a completion hook on an entity.
///
/// An entity that cannot compose completion notification is unusable by the
/// coordinator: the presenter treats a hook failure as an immediate forced
/// cancel of that entity, publishes [`EventKind::HookFailed`], and moves on
/// to the next queued entity. One bad entity never stalls the pipeline.
///
/// [`EventKind::HookFailed`]: crate::events::EventKind::HookFailed
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HookError {
    /// The entity does not support completion notification at all.
    #[error("completion notification not supported by this entity")]
    Unsupported,

    /// The entity refused this particular hook.
    #[error("completion hook rejected: {reason}")]
    Rejected {
        /// Why the hook was refused.
        reason: String,
    },
}

impl HookError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HookError::Unsupported => "hook_unsupported",
            HookError::Rejected { .. } => "hook_rejected",
        }
    }
}
