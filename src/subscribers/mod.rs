//! # Event subscribers.
//!
//! A subscriber is one long-lived HTTP connection streaming emitted events.
//! This module provides the [`SubscriberRegistry`] the engine fans out to and
//! the [`Subscription`] handle the streaming endpoint holds.
//!
//! ## Event flow
//! ```text
//!   Engine::emit(event)
//!        │ snapshot under lock
//!        ├──► [channel S1] ──► Subscription S1 ──► JSON chunk ──► client 1
//!        ├──► [channel S2] ──► Subscription S2 ──► JSON chunk ──► client 2
//!        └──► [channel SN] ──► Subscription SN ──► JSON chunk ──► client N
//! ```
//!
//! ## Delivery
//! - At most once per live connection; nothing is replayed after reconnect.
//! - Per-subscriber FIFO; no ordering across subscribers.
//! - A stalled subscriber slows the `emit` call that is sending to it, never
//!   the raw event listener.

mod registry;

pub use registry::{SubscriberId, SubscriberRegistry, Subscription};
