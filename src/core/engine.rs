//! # Engine: interception and fan-out of control plane events.
//!
//! The [`Engine`] owns the capability client handle, the log sink, the
//! subscriber registry and the interceptor table. It is built once at startup
//! (see [`EngineBuilder`](super::EngineBuilder)), shared as `Arc<Engine>`, and
//! its interceptor table is read-only from then on.
//!
//! ## Architecture
//! ```text
//! Runtime::events() ──► listen() ──► tokio::spawn(handle(event))   (one task per event)
//!                                         │
//!                          interceptors.get(event.kind())
//!                            ├─ None        ──► Action::Emit(event)
//!                            └─ Some(h)     ──► h.intercept(log, runtime, event) ──► Action
//!                                                                                    │
//!                                                         Action::apply(engine) ◄────┘
//!                                                           ├─ Drop ──► (nothing)
//!                                                           └─ Emit ──► emit(event)
//!                                                                         │ snapshot
//!                                                      ┌──────────────────┼──────────────┐
//!                                                      ▼                  ▼              ▼
//!                                                 [sub 1]            [sub 2]   ...  [sub N]
//!                                                      └──► log "To N -> kind id attributes"
//! ```
//!
//! ## Rules
//! - An event reaches a subscriber at most once, and only after its
//!   interceptor (if any) returned `Emit`.
//! - Handling is fire-and-forget: the listen loop never waits for a handler,
//!   so arrival order at subscribers may differ from receive order.
//! - `emit` waits for every subscriber channel to accept the event; a stalled
//!   subscriber delays that `emit` (and its log line) but nothing else.
//! - Handler tasks are never joined; panics are caught inside the task and
//!   turned into log lines.
//! - A failing or ending raw subscription ends `listen` with an error; there is
//!   no reconnection.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;
use crate::events::{Action, Event};
use crate::interceptors::InterceptRef;
use crate::output::Stream;
use crate::runtime::Runtime;
use crate::subscribers::{SubscriberId, SubscriberRegistry, Subscription};

use super::builder::EngineBuilder;

/// Event interception and fan-out engine.
pub struct Engine {
    runtime: Arc<dyn Runtime>,
    log: Stream,
    subscribers: Arc<SubscriberRegistry>,
    interceptors: HashMap<String, InterceptRef>,
}

impl Engine {
    /// Creates an engine without interceptors: every event is forwarded as is.
    pub fn new(runtime: Arc<dyn Runtime>, log: Stream, subscribers: Arc<SubscriberRegistry>) -> Self {
        Self {
            runtime,
            log,
            subscribers,
            interceptors: HashMap::new(),
        }
    }

    /// Returns a builder; see [`EngineBuilder`].
    pub fn builder(runtime: Arc<dyn Runtime>, log: Stream) -> EngineBuilder {
        EngineBuilder::new(runtime, log)
    }

    /// Registers `handler` for events of kind `kind`, replacing any previous one.
    ///
    /// Takes `&mut self`: interceptors can only be added before the engine is
    /// shared with the listen loop.
    pub fn intercept(&mut self, kind: impl Into<String>, handler: InterceptRef) -> &mut Self {
        let kind = kind.into();
        tracing::debug!(kind = %kind, handler = handler.name(), "interceptor registered");
        self.interceptors.insert(kind, handler);
        self
    }

    /// Returns the interceptor registered for `kind`.
    pub fn interceptor(&self, kind: &str) -> Option<&InterceptRef> {
        self.interceptors.get(kind)
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    pub fn subscribers(&self) -> &Arc<SubscriberRegistry> {
        &self.subscribers
    }

    /// Registers a new subscriber; it receives every event emitted from now on.
    pub fn subscribe(&self) -> Subscription {
        self.subscribers.subscribe()
    }

    /// Removes subscriber `id`. Dropping its [`Subscription`] does the same.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Handles one event: runs its interceptor, if any, and applies the outcome.
    ///
    /// Events without an interceptor are emitted unchanged.
    pub async fn handle(&self, event: Arc<Event>) {
        let action = match self.interceptors.get(event.kind()) {
            Some(handler) => {
                handler
                    .intercept(self.log.clone(), Arc::clone(&self.runtime), event)
                    .await
            }
            None => Action::Emit(event),
        };
        action.apply(self).await;
    }

    /// Delivers `event` to every current subscriber and logs the fan-out.
    ///
    /// Returns the number of subscribers in the snapshot taken before delivery.
    pub async fn emit(&self, event: &Arc<Event>) -> usize {
        let senders = self.subscribers.snapshot();
        for tx in &senders {
            if tx.send(Arc::clone(event)).await.is_err() {
                tracing::debug!(kind = event.kind(), "subscriber left before delivery");
            }
        }

        self.log.clone().println(format_args!(
            "To {} -> {} {} {:?}",
            senders.len(),
            event.kind(),
            event.short_id(),
            event.attributes()
        ));
        senders.len()
    }

    /// Consumes raw events until `token` is cancelled or the subscription ends.
    ///
    /// Each event is handled on its own task. Returns `Ok(())` on cancellation,
    /// [`RuntimeError::Subscription`] if the stream fails and
    /// [`RuntimeError::SubscriptionClosed`] if it ends. The raw subscription is
    /// released on return.
    pub async fn listen(self: Arc<Self>, token: CancellationToken) -> Result<(), RuntimeError> {
        let mut events = self
            .runtime
            .events()
            .await
            .map_err(RuntimeError::Subscription)?;
        tracing::info!(runtime = self.runtime.name(), "listening for events");

        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                next = events.next() => match next {
                    Some(Ok(event)) => self.spawn_handle(Arc::new(event)),
                    Some(Err(e)) => return Err(RuntimeError::Subscription(e)),
                    None => return Err(RuntimeError::SubscriptionClosed),
                },
            }
        }
    }

    /// Handles `event` on a detached task.
    fn spawn_handle(self: &Arc<Self>, event: Arc<Event>) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let kind = event.kind().to_string();
            let target = event.short_id().to_string();

            if let Err(panic) = AssertUnwindSafe(engine.handle(event)).catch_unwind().await {
                let info = panic_message(panic.as_ref());
                tracing::error!(kind = %kind, target = %target, panic = %info, "event handler panicked");
                engine
                    .log
                    .clone()
                    .error(format_args!("Handling {kind} {target} panicked: {info}"));
            }
        });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
