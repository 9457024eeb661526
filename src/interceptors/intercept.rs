//! # Interceptor trait and function-backed implementation.
//!
//! [`Intercept`] is what the engine calls for events whose kind has a
//! registered handler. [`InterceptFn`] wraps a closure producing a fresh
//! future per event, for handlers that need no state of their own.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bootvisor::output::Stream;
//! use bootvisor::{Action, Event, InterceptFn, InterceptRef, Runtime};
//!
//! // Suppress events of workloads carrying an "ephemeral" attribute.
//! let handler: InterceptRef = InterceptFn::arc(
//!     "hide-ephemeral",
//!     |_log: Stream, _runtime: Arc<dyn Runtime>, event: Arc<Event>| async move {
//!         if event.attributes().contains_key("ephemeral") {
//!             Action::Drop
//!         } else {
//!             Action::Emit(event)
//!         }
//!     },
//! );
//! assert_eq!(handler.name(), "hide-ephemeral");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{Action, Event};
use crate::output::Stream;
use crate::runtime::Runtime;

/// Shared handle to an interceptor.
pub type InterceptRef = Arc<dyn Intercept>;

/// Handler deciding the fate of one event.
#[async_trait]
pub trait Intercept: Send + Sync + 'static {
    /// Inspects `event`, performs any side effects, and resolves it.
    ///
    /// `log` is the engine's log sink; `runtime` the capability client.
    async fn intercept(&self, log: Stream, runtime: Arc<dyn Runtime>, event: Arc<Event>) -> Action;

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed interceptor.
pub struct InterceptFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> InterceptFn<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the interceptor as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Intercept for InterceptFn<F>
where
    F: Fn(Stream, Arc<dyn Runtime>, Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Action> + Send + 'static,
{
    async fn intercept(&self, log: Stream, runtime: Arc<dyn Runtime>, event: Arc<Event>) -> Action {
        (self.f)(log, runtime, event).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
