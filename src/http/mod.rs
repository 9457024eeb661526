//! # HTTP facade.
//!
//! Serves the filtered event stream on the configured event paths and passes
//! every other request through to the control plane.
//!
//! ```text
//!  client ──► Listener (unix | tcp) ──► Router
//!                                        ├─ /events, /v1.xx/events ──► stream::events ──► Subscription
//!                                        └─ fallback               ──► Proxy::forward  ──► upstream
//! ```

mod proxy;
mod server;
mod stream;

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use tokio_util::sync::CancellationToken;

use crate::core::Engine;

pub use proxy::Proxy;
pub use server::{Listener, serve};

/// Shared state of the request handlers.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
    proxy: Arc<Proxy>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Creates handler state. Event streams end when `shutdown` is cancelled.
    pub fn new(engine: Arc<Engine>, proxy: Proxy, shutdown: CancellationToken) -> Self {
        Self {
            engine,
            proxy: Arc::new(proxy),
            shutdown,
        }
    }
}

/// Builds the facade router: `event_paths` stream events, the rest is proxied.
///
/// Duplicate paths are served once; paths not starting with `/` are skipped.
pub fn router(state: AppState, event_paths: &[String]) -> Router {
    let paths: BTreeSet<&str> = event_paths.iter().map(String::as_str).collect();

    let mut router = Router::new();
    for path in paths {
        if !path.starts_with('/') {
            tracing::warn!(path, "ignoring event path without leading '/'");
            continue;
        }
        router = router.route(path, any(stream::events));
    }
    router.fallback(proxy::forward).with_state(state)
}
