//! Presentable entities and their collaborator capabilities.
//!
//! ## Contents
//! - [`Presentable`], [`PresentableRef`] the entity contract and its
//!   shared handle (identity = allocation identity)
//! - [`Completion`], [`CompletionHook`] one-shot multi-listener completion
//!   registry
//! - [`HostContext`], [`HostRef`] explicit host-lifetime marker
//! - [`ModalFn`] function-backed entity for quick integration and tests

mod completion;
mod host;
mod modal_fn;
mod presentable;

pub use completion::Completion;
pub use host::{same_host, HostContext, HostRef};
pub use modal_fn::ModalFn;
pub use presentable::{same_entity, CompletionHook, Presentable, PresentableRef};
