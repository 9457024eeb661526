//! Error types used by the bootvisor engine, its collaborators and the binary.
//!
//! - [`ClientError`]: failures reported by the capability client (inspection,
//!   exec, raw event subscription). Never fatal for the engine: interceptors
//!   log them and resolve the event to [`Action::Drop`](crate::Action::Drop).
//! - [`RuntimeError`]: process-level failures (bad endpoint, bind, serve,
//!   broken event subscription). These end the process.
//! - [`AddrError`]: endpoint strings that cannot be parsed.
//! - [`ProxyError`]: pass-through failures, answered with `502 Bad Gateway`.
//!
//! Every type provides `as_label()` with a short stable snake_case label for logs.

use std::io;

use thiserror::Error;

/// # Errors produced by the capability client.
///
/// Messages are stored as strings so that any backend (Docker, a fake in
/// tests) can report through the same type.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Workload inspection failed (unknown id, daemon unreachable, ...).
    #[error("inspect {id}: {error}")]
    Inspect {
        /// Workload identifier that was inspected.
        id: String,
        /// The underlying error message.
        error: String,
    },

    /// Creating, starting or querying an execution failed.
    #[error("exec in {id}: {error}")]
    Exec {
        /// Workload or execution identifier.
        id: String,
        /// The underlying error message.
        error: String,
    },

    /// The raw event subscription failed.
    #[error("events: {error}")]
    Events {
        /// The underlying error message.
        error: String,
    },

    /// The client could not be constructed for the given endpoint.
    #[error("connect {endpoint}: {error}")]
    Connect {
        /// Endpoint that was dialed.
        endpoint: String,
        /// The underlying error message.
        error: String,
    },
}

impl ClientError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use bootvisor::ClientError;
    ///
    /// let err = ClientError::Events { error: "eof".into() };
    /// assert_eq!(err.as_label(), "client_events");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::Inspect { .. } => "client_inspect",
            ClientError::Exec { .. } => "client_exec",
            ClientError::Events { .. } => "client_events",
            ClientError::Connect { .. } => "client_connect",
        }
    }
}

/// # Errors that terminate the facade.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An endpoint flag could not be parsed.
    #[error("invalid address: {0}")]
    Addr(#[from] AddrError),

    /// The capability client could not be created.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Subscribing to or reading from the raw event stream failed.
    #[error("event subscription failed: {0}")]
    Subscription(ClientError),

    /// The raw event stream ended.
    #[error("event subscription closed")]
    SubscriptionClosed,

    /// The listen endpoint could not be bound.
    #[error("bind {addr}: {source}")]
    Bind {
        /// Endpoint that was bound.
        addr: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("serve: {0}")]
    Serve(io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Addr(_) => "runtime_addr",
            RuntimeError::Client(_) => "runtime_client",
            RuntimeError::Subscription(_) => "runtime_subscription",
            RuntimeError::SubscriptionClosed => "runtime_subscription_closed",
            RuntimeError::Bind { .. } => "runtime_bind",
            RuntimeError::Serve(_) => "runtime_serve",
        }
    }
}

/// # Endpoint parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddrError {
    /// Scheme other than `unix`, `http` or `https`.
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    /// Empty input or empty address after the scheme.
    #[error("empty address")]
    Empty,
}

/// # Reverse proxy failures.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The upstream endpoint could not be dialed.
    #[error("dial {addr}: {source}")]
    Dial {
        /// Upstream endpoint.
        addr: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// HTTP/1.1 handshake or exchange with the upstream failed.
    #[error(transparent)]
    Http(#[from] hyper::Error),

    /// The request target could not be rewritten to origin form.
    #[error("invalid uri: {0}")]
    Uri(#[from] axum::http::uri::InvalidUri),
}

impl ProxyError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProxyError::Dial { .. } => "proxy_dial",
            ProxyError::Http(_) => "proxy_http",
            ProxyError::Uri(_) => "proxy_uri",
        }
    }
}
