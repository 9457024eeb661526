//! Listener binding and serving.

#[cfg(unix)]
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::addr::Addr;
use crate::error::RuntimeError;

/// Bound listen endpoint.
#[derive(Debug)]
pub enum Listener {
    #[cfg(unix)]
    Unix {
        listener: tokio::net::UnixListener,
        path: PathBuf,
    },
    Tcp(TcpListener),
}

impl Listener {
    /// Binds `addr`. A stale unix socket file at the path is removed first.
    pub async fn bind(addr: &Addr) -> Result<Self, RuntimeError> {
        let bind_error = |source| RuntimeError::Bind {
            addr: addr.to_string(),
            source,
        };

        match addr {
            #[cfg(unix)]
            Addr::Unix { path } => {
                match tokio::fs::remove_file(path).await {
                    Ok(()) => tracing::debug!(path = %path.display(), "removed stale socket"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(bind_error(e)),
                }
                let listener = tokio::net::UnixListener::bind(path).map_err(bind_error)?;
                Ok(Listener::Unix {
                    listener,
                    path: path.clone(),
                })
            }
            #[cfg(not(unix))]
            Addr::Unix { .. } => Err(bind_error(std::io::Error::from(std::io::ErrorKind::Unsupported))),
            Addr::Tcp { host, .. } => {
                let listener = TcpListener::bind(host.as_str()).await.map_err(bind_error)?;
                Ok(Listener::Tcp(listener))
            }
        }
    }

    /// Human readable bound address.
    pub fn describe(&self) -> String {
        match self {
            #[cfg(unix)]
            Listener::Unix { path, .. } => format!("unix://{}", path.display()),
            Listener::Tcp(listener) => match listener.local_addr() {
                Ok(local) => format!("http://{local}"),
                Err(_) => "http://?".to_string(),
            },
        }
    }
}

/// Serves `router` on `listener` until `shutdown` is cancelled.
pub async fn serve(listener: Listener, router: Router, shutdown: CancellationToken) -> Result<(), RuntimeError> {
    tracing::info!(addr = %listener.describe(), "serving");

    let result = match listener {
        #[cfg(unix)]
        Listener::Unix { listener, path } => {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await;
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::debug!(path = %path.display(), error = %e, "socket not removed");
            }
            result
        }
        Listener::Tcp(listener) => {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
        }
    };
    result.map_err(RuntimeError::Serve)
}
