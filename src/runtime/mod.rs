//! # Capability client: the container runtime the facade sits in front of.
//!
//! [`Runtime`] is the seam between the engine and the control plane. The
//! engine and interceptors only ever talk to `Arc<dyn Runtime>`; the Docker
//! implementation lives in [`docker`] (feature `docker`), tests plug in
//! in-memory fakes.
//!
//! ## Contract
//! - `inspect` returns workload metadata (labels).
//! - `create_exec` / `start_exec` / `exec_exit_code` run a command inside a
//!   workload; `start_exec` streams combined stdout and stderr into the sink and
//!   returns once the command finished.
//! - `events` opens the raw subscription. Dropping the returned stream
//!   deregisters it.

use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream as FuturesStream;

use crate::error::ClientError;
use crate::events::Event;
use crate::output::Stream;

#[cfg(feature = "docker")]
pub mod docker;

#[cfg(feature = "docker")]
pub use docker::DockerRuntime;

/// Live subscription of raw events.
pub type EventStream = Pin<Box<dyn FuturesStream<Item = Result<Event, ClientError>> + Send>>;

/// Workload metadata returned by [`Runtime::inspect`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    /// Full workload identifier.
    pub id: String,
    /// Labels attached to the workload.
    pub labels: HashMap<String, String>,
}

impl Workload {
    /// Creates a workload without labels.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: HashMap::new(),
        }
    }

    /// Adds a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns the value of label `name`, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

/// Parameters of an execution created by [`Runtime::create_exec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Command line (argv).
    pub cmd: Vec<String>,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    /// Allocate a pseudo-terminal.
    pub tty: bool,
}

impl ExecOptions {
    /// Non-interactive execution with stdout and stderr attached, stdin detached.
    pub fn attached(cmd: Vec<String>) -> Self {
        Self {
            cmd,
            attach_stdout: true,
            attach_stderr: true,
            tty: false,
        }
    }
}

/// Capability client used by the engine and interceptors.
#[async_trait]
pub trait Runtime: Send + Sync + 'static {
    /// Inspects workload `id`.
    async fn inspect(&self, id: &str) -> Result<Workload, ClientError>;

    /// Creates an execution inside `workload`; returns its identifier.
    async fn create_exec(&self, workload: &str, opts: ExecOptions) -> Result<String, ClientError>;

    /// Starts execution `exec`, streaming its output into `output` until it finishes.
    async fn start_exec(&self, exec: &str, output: &mut Stream) -> Result<(), ClientError>;

    /// Returns the exit code of a finished execution.
    async fn exec_exit_code(&self, exec: &str) -> Result<i64, ClientError>;

    /// Opens the raw event subscription.
    async fn events(&self) -> Result<EventStream, ClientError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
