//! Streaming event endpoint.
//!
//! Each connection holds one [`Subscription`](crate::Subscription). Events are
//! written as one JSON object per chunk, in the native event shape, with no
//! delimiter. When the client goes away hyper drops the body stream, which
//! drops the subscription and removes it from the registry.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use futures::stream;

use super::AppState;

pub(super) async fn events(State(state): State<AppState>) -> Response {
    let subscription = state.engine.subscribe();
    tracing::info!(subscriber = subscription.id(), "event stream opened");

    let chunks = stream::unfold(subscription, |mut sub| async move {
        let event = sub.recv().await?;
        let chunk = serde_json::to_vec(event.as_ref()).map(Bytes::from);
        Some((chunk, sub))
    })
    .take_until(state.shutdown.cancelled_owned());

    ([(header::CONTENT_TYPE, "application/json")], Body::from_stream(chunks)).into_response()
}
