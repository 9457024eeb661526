//! Control plane events and interception outcomes.
//!
//! ## Contents
//! - [`Event`], [`Actor`]: raw lifecycle event as reported by the capability
//!   client; serialized back verbatim to subscribers.
//! - [`Action`]: terminal value of every interception (`Drop` or `Emit`).
//!
//! ## Quick reference
//! - **Producers**: [`Runtime::events`](crate::Runtime::events) (events),
//!   interceptors (actions).
//! - **Consumers**: [`Engine::handle`](crate::Engine::handle), which applies the
//!   action; the HTTP streaming endpoint, which serializes emitted events.

mod action;
mod event;

pub use action::Action;
pub use event::{Actor, Event};
pub(crate) use event::short_id;
