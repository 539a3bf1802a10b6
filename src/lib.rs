//! # modalq
//!
//! **modalq** serializes presentation of modal UI entities: among many
//! independently-triggered "presentables" (dialogs, prompts, sheets), at
//! most one is active at any time, and pending ones activate strictly in
//! arrival order. The crate is toolkit-agnostic: it schedules, your code
//! renders.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//!  │  producer #1 │  │  producer #2 │  │  producer #N │   (any thread)
//!  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!         │ show(entity)    │                 │
//!         ▼                 ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Coordinator                                                  │
//! │  - WaitQueue (FIFO, identity-deduplicated)                    │
//! │  - ActivationGate (broadcast wake-up, lost-signal safe)       │
//! │  - Bus (broadcast diagnostics events)                         │
//! │  - loop: Idle ─► Dispatching ─► Active ─► Dispatching ...     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ Activate / Complete / Cancel
//!                                ▼  (unbounded, ordered, one-way)
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Presenter (runs on the presentation / UI thread)             │
//! │  - ActiveSlot: the single active entity                       │
//! │  - pops the next entity, installs a one-shot completion hook, │
//! │    calls entity.activate()                                    │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ entity completes (user dismissed)
//!                                ▼
//!              hook: release slot ── signal gate ──► next entity
//! ```
//!
//! ### Guarantees
//! - **At most one active**: a second entity never activates until the
//!   current one completes or is cancelled.
//! - **Strict FIFO**: activation order is enqueue order; duplicates
//!   collapse.
//! - **Race-safe cancellation**: a cancel aimed at an entity that already
//!   completed or was replaced is a silent no-op.
//! - **Non-blocking producers**: every producer-facing operation returns
//!   immediately and never fails.
//!
//! ### Known limits (by design)
//! - An entity that never completes blocks the queue indefinitely — no
//!   timeouts are imposed; force it out with
//!   [`dismiss_active`](Coordinator::dismiss_active) /
//!   [`cancel_active`](Coordinator::cancel_active).
//! - Stopping the coordinator abandons queued-but-unactivated entities;
//!   there is no drain-on-shutdown guarantee.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Entities**      | Define what gets presented and how it completes.             | [`Presentable`], [`ModalFn`], [`Completion`] |
//! | **Coordination**  | FIFO queue, single-active slot, activation loop.             | [`Coordinator`], [`Presenter`], [`WaitQueue`] |
//! | **Lifecycle**     | Host-scoped bulk eviction of queued entities.                | [`HostContext`], [`Coordinator::on_host_invalidated`] |
//! | **Observability** | Subscribe to queue/presentation events.                      | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed errors for lifecycle misuse and hook installation.     | [`CoordinatorError`], [`HookError`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use modalq::{Config, Coordinator, ModalFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let coord = Coordinator::new(Config::default(), Vec::new());
//!
//!     let token = CancellationToken::new();
//!     coord.start(token.clone()).expect("started once");
//!
//!     // In a real app this runs on the UI event loop; the presenter is
//!     // the only place entities are activated and dismissed.
//!     let presenter = coord.take_presenter().expect("taken once");
//!     tokio::spawn(presenter.run(token.clone()));
//!
//!     let hello = ModalFn::arc("hello", || {
//!         // hand the dialog to the toolkit here
//!     });
//!     coord.show(hello.clone());
//!
//!     // The dialog's dismiss callback reports completion, which lets the
//!     // next queued entity (if any) activate:
//!     hello.complete();
//!
//!     token.cancel();
//! }
//! ```

mod config;
mod coordinator;
mod error;
mod events;
mod presentables;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use coordinator::{Coordinator, Presenter, WaitQueue};
pub use error::{CoordinatorError, HookError};
pub use events::{Bus, Event, EventKind};
pub use presentables::{
    same_entity, same_host, Completion, CompletionHook, HostContext, HostRef, ModalFn,
    Presentable, PresentableRef,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
