//! # Docker Engine API capability client.
//!
//! [`DockerRuntime`] implements [`Runtime`] on top of `bollard`, over a unix
//! socket or plain HTTP.
//!
//! ```text
//! inspect        ──► GET  /containers/{id}/json
//! create_exec    ──► POST /containers/{id}/exec
//! start_exec     ──► POST /exec/{id}/start   (attached, demultiplexed output ──► Stream)
//! exec_exit_code ──► GET  /exec/{id}/json
//! events         ──► GET  /events            (EventMessage ──► Event)
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use bollard::API_DEFAULT_VERSION;
use bollard::Docker;
use bollard::container::InspectContainerOptions;
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::models::EventMessage;
use bollard::system::EventsOptions;
use futures::StreamExt;

use super::{EventStream, ExecOptions, Runtime, Workload};
use crate::addr::Addr;
use crate::error::ClientError;
use crate::events::{Actor, Event};
use crate::output::Stream;

/// Capability client talking to a Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Creates a client for `addr`. No connection is made until the first call.
    pub fn connect(addr: &Addr, timeout: Duration) -> Result<Self, ClientError> {
        let secs = timeout.as_secs().max(1);
        let docker = match addr {
            Addr::Unix { .. } => Docker::connect_with_unix(addr.address(), secs, API_DEFAULT_VERSION),
            Addr::Tcp { host, .. } => {
                Docker::connect_with_http(&format!("http://{host}"), secs, API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| ClientError::Connect {
            endpoint: addr.to_string(),
            error: e.to_string(),
        })?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl Runtime for DockerRuntime {
    async fn inspect(&self, id: &str) -> Result<Workload, ClientError> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| ClientError::Inspect {
                id: id.to_string(),
                error: e.to_string(),
            })?;

        Ok(Workload {
            id: info.id.unwrap_or_else(|| id.to_string()),
            labels: info.config.and_then(|c| c.labels).unwrap_or_default(),
        })
    }

    async fn create_exec(&self, workload: &str, opts: ExecOptions) -> Result<String, ClientError> {
        let created = self
            .docker
            .create_exec(
                workload,
                CreateExecOptions::<String> {
                    attach_stdin: Some(false),
                    attach_stdout: Some(opts.attach_stdout),
                    attach_stderr: Some(opts.attach_stderr),
                    tty: Some(opts.tty),
                    cmd: Some(opts.cmd),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| exec_error(workload, e))?;
        Ok(created.id)
    }

    async fn start_exec(&self, exec: &str, output: &mut Stream) -> Result<(), ClientError> {
        let started = self
            .docker
            .start_exec(
                exec,
                Some(StartExecOptions {
                    detach: false,
                    tty: false,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| exec_error(exec, e))?;

        if let StartExecResults::Attached { output: mut chunks, .. } = started {
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk.map_err(|e| exec_error(exec, e))?;
                output
                    .write_all(&chunk.into_bytes())
                    .map_err(|e| exec_error(exec, e))?;
            }
        }
        Ok(())
    }

    async fn exec_exit_code(&self, exec: &str) -> Result<i64, ClientError> {
        let inspect = self
            .docker
            .inspect_exec(exec)
            .await
            .map_err(|e| exec_error(exec, e))?;

        inspect.exit_code.ok_or_else(|| ClientError::Exec {
            id: exec.to_string(),
            error: "no exit code reported".to_string(),
        })
    }

    async fn events(&self) -> Result<EventStream, ClientError> {
        let stream = self
            .docker
            .events(None::<EventsOptions<String>>)
            .map(|item| {
                item.map(from_message).map_err(|e| ClientError::Events {
                    error: e.to_string(),
                })
            });
        Ok(Box::pin(stream))
    }

    fn name(&self) -> &'static str {
        "docker"
    }
}

fn exec_error(id: &str, e: impl std::fmt::Display) -> ClientError {
    ClientError::Exec {
        id: id.to_string(),
        error: e.to_string(),
    }
}

/// Converts bollard's model into the wire-compatible [`Event`].
fn from_message(msg: EventMessage) -> Event {
    let actor = msg.actor.unwrap_or_default();
    let id = actor.id.unwrap_or_default();
    let attributes: BTreeMap<String, String> =
        actor.attributes.unwrap_or_default().into_iter().collect();
    let typ = msg.typ.map(|t| t.to_string()).unwrap_or_default();
    let action = msg.action.unwrap_or_default();

    // The daemon still fills the pre-1.22 fields for container events.
    let legacy = typ == "container";
    Event {
        status: legacy.then(|| action.clone()),
        id: legacy.then(|| id.clone()),
        from: if legacy { attributes.get("image").cloned() } else { None },
        typ,
        action,
        actor: Actor { id, attributes },
        scope: msg.scope.map(|s| s.to_string()).filter(|s| !s.is_empty()),
        time: msg.time,
        time_nano: msg.time_nano,
    }
}
