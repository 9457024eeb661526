//! # bootvisor
//!
//! **Bootvisor** is an event-filtering facade in front of a container control
//! plane. It subscribes to the control plane's raw event stream, lets
//! registered interceptors hold back or drop events (the reference
//! interceptor runs a workload's boot command before its `start` event is
//! released), and streams the surviving events to any number of HTTP
//! subscribers. Every other request is passed through to the control plane
//! unchanged.
//!
//! ## Architecture
//! ```text
//!        control plane (Docker)                          HTTP clients
//!               │  raw events                     ┌──────────┼──────────┐
//!               ▼                                 ▼          ▼          ▼
//!     ┌───────────────────┐               /events stream  /v1.24/...  other paths
//!     │  Runtime (client) │◄──── inspect/exec ───┐  │                    │
//!     └─────────┬─────────┘                      │  │ Subscription       │ Proxy
//!               ▼                                │  │                    ▼
//! ┌──────────────────────────────────────────────┴──┴──┐        control plane API
//! │ Engine                                             │
//! │  - interceptors: kind ──► Intercept (BootWait ...) │
//! │  - SubscriberRegistry (one channel per connection) │
//! └──────┬─────────────────────────────────────────────┘
//!        │ listen(): one task per event
//!        ▼
//!   handle(event) ──► Action::Drop  ──► (nothing)
//!                └──► Action::Emit  ──► emit() ──► every subscriber
//! ```
//!
//! ## Features
//! | Area             | Description                                                 | Key types / traits                     |
//! |------------------|-------------------------------------------------------------|----------------------------------------|
//! | **Engine**       | Interception, fan-out and the listen loop.                  | [`Engine`], [`EngineBuilder`]          |
//! | **Interceptors** | Per event kind policies deciding an event's fate.           | [`Intercept`], [`InterceptFn`], [`BootWait`] |
//! | **Commands**     | Boot command construction and execution.                    | [`Executable`]                         |
//! | **Runtime**      | Capability client seam (Docker or a test fake).             | [`Runtime`], [`DockerRuntime`]         |
//! | **HTTP**         | Event stream endpoint and pass-through proxy.               | [`http::router`], [`http::Proxy`]      |
//! | **Errors**       | Typed errors with stable log labels.                        | [`ClientError`], [`RuntimeError`]      |
//! | **Configuration**| Centralized settings.                                       | [`Config`]                             |
//!
//! ## Optional features
//! - `docker` (default): [`DockerRuntime`] backed by `bollard`.
//! - `cli` (default): the `bootvisor` binary.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use bootvisor::{Addr, Config, DockerRuntime, Engine, Runtime, output::Stream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let addr = Addr::parse(&cfg.docker)?;
//!     let runtime: Arc<dyn Runtime> = Arc::new(DockerRuntime::connect(&addr, cfg.connect_timeout)?);
//!
//!     // BootWait on every `start` event, reading the `boot` label.
//!     let engine = Engine::builder(runtime, Stream::stdout("")).with_config(&cfg).build();
//!
//!     let mut events = engine.subscribe();
//!     tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             println!("{} {}", event.kind(), event.target());
//!         }
//!     });
//!
//!     engine.listen(CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

mod addr;
mod command;
mod config;
mod core;
mod error;
mod events;
mod interceptors;
mod runtime;
mod subscribers;

pub mod http;
pub mod output;

// ---- Public re-exports ----

pub use addr::Addr;
pub use command::{Executable, NOT_RUN};
pub use config::{Config, DEFAULT_DOCKER, DEFAULT_EVENT_PATHS, DEFAULT_LISTEN};
pub use crate::core::{Engine, EngineBuilder, wait_for_shutdown_signal};
pub use error::{AddrError, ClientError, ProxyError, RuntimeError};
pub use events::{Action, Actor, Event};
pub use interceptors::{BootWait, DEFAULT_LABEL, Intercept, InterceptFn, InterceptRef};
pub use runtime::{EventStream, ExecOptions, Runtime, Workload};
pub use subscribers::{SubscriberId, SubscriberRegistry, Subscription};

#[cfg(feature = "docker")]
pub use runtime::DockerRuntime;
