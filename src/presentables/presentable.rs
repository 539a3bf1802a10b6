//! # Presentable abstraction.
//!
//! A [`Presentable`] is an opaque unit scheduled for exclusive, ordered
//! activation — a modal dialog generalized. The coordinator never renders
//! anything itself; it only needs four capabilities from an entity:
//! activate, force-complete, composable completion notification, and an
//! optional host handle for lifecycle matching.
//!
//! The common handle type is [`PresentableRef`], an `Arc<dyn Presentable>`
//! suitable for sharing across producer threads, the coordinator and the
//! presentation thread. **Identity is allocation identity**: two handles
//! name the same entity iff they point at the same allocation, which is
//! what makes targeted cancellation race-safe against replacement.

use std::sync::Arc;

use crate::error::HookError;
use crate::presentables::host::HostRef;

/// One-shot notification installed by the coordinator on the entity it is
/// about to activate.
///
/// `FnOnce` by construction: the type system guarantees a hook cannot run
/// twice even if the entity's completion plumbing misbehaves.
pub type CompletionHook = Box<dyn FnOnce() + Send + 'static>;

/// # Exclusive, ordered presentable unit.
///
/// Implementations must uphold:
/// - [`activate`](Presentable::activate) is only ever called on the
///   presentation thread, and at most once per pass through the queue.
/// - [`force_complete`](Presentable::force_complete) causes the completion
///   notification to fire, and is harmless on an entity that already
///   completed.
/// - [`on_completion`](Presentable::on_completion) composes: it must not
///   replace notification behavior the entity already had attached.
///   Embedding a [`Completion`](crate::presentables::Completion) registry
///   satisfies this.
///
/// # Example
/// ```
/// use modalq::{Completion, CompletionHook, HookError, Presentable};
///
/// struct Banner {
///     completion: Completion,
/// }
///
/// impl Presentable for Banner {
///     fn name(&self) -> &str { "banner" }
///
///     fn activate(&self) { /* present the banner */ }
///
///     fn force_complete(&self, _graceful: bool) {
///         self.completion.fire();
///     }
///
///     fn on_completion(&self, hook: CompletionHook) -> Result<(), HookError> {
///         self.completion.subscribe(hook);
///         Ok(())
///     }
/// }
/// ```
pub trait Presentable: Send + Sync + 'static {
    /// Returns a stable, human-readable entity name (for events and logs).
    fn name(&self) -> &str;

    /// Begins presenting. Called only on the presentation thread.
    fn activate(&self);

    /// Terminates presentation.
    ///
    /// `graceful = true` mimics normal dismissal, `false` mimics cancel.
    /// Must fire the entity's completion notification.
    fn force_complete(&self, graceful: bool);

    /// Installs a one-shot hook invoked exactly once when the entity
    /// finishes, composing with any notification behavior already attached.
    ///
    /// Returning an error marks the entity as un-instrumentable: the
    /// presenter force-cancels it and continues with the next one.
    fn on_completion(&self, hook: CompletionHook) -> Result<(), HookError>;

    /// Opaque host handle used for equality-based lifecycle matching.
    ///
    /// Entities with no host (`None`) are never swept by host
    /// invalidation.
    fn host(&self) -> Option<HostRef> {
        None
    }
}

/// Shared handle to a presentable entity.
pub type PresentableRef = Arc<dyn Presentable>;

/// Returns `true` iff both handles name the same entity.
///
/// Compares data pointers only, so a handle and its unsized coercion from
/// the concrete type agree.
#[inline]
pub fn same_entity(a: &PresentableRef, b: &PresentableRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
