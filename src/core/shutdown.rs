//! # OS termination signals.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop.
//! The binary races it against [`Engine::listen`](super::Engine::listen) and
//! cancels the shared token once it fires, which ends the listen loop, the
//! HTTP server and every open event stream.
//!
//! ## Signals
//! - unix: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - elsewhere: `Ctrl-C`

/// Waits for a termination signal and returns its name.
///
/// Each call installs its own listeners. Fails only if they cannot be
/// registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for a termination signal and returns its name.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl-C")
}
