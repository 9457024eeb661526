//! `bootvisor` binary: wires the Docker client, the engine and the HTTP facade.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bootvisor::http::{self, AppState, Listener, Proxy};
use bootvisor::output::{self, Color, Stream, text};
use bootvisor::{
    Addr, Config, DEFAULT_DOCKER, DEFAULT_LABEL, DEFAULT_LISTEN, DockerRuntime, Engine, Runtime,
    RuntimeError, wait_for_shutdown_signal,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Time the server gets to finish open connections after shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(author, version, about = "Event-filtering facade for the Docker daemon", long_about = None)]
struct Cli {
    /// Docker daemon endpoint (unix://, http://, https:// or a socket path)
    #[arg(long, default_value = DEFAULT_DOCKER)]
    docker: String,

    /// Endpoint to serve on
    #[arg(long, default_value = DEFAULT_LISTEN)]
    listen: String,

    /// Container label holding the boot command
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// Event kind held back until the boot command succeeded (repeatable, '' disables)
    #[arg(long, default_value = "start")]
    intercept: Vec<String>,

    /// Events buffered per subscriber
    #[arg(long, default_value_t = 1)]
    capacity: usize,

    /// Path serving the event stream (repeatable, replaces the defaults)
    #[arg(long = "events-path")]
    events_path: Vec<String>,

    /// Docker client timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut cfg = Config::default();
        cfg.docker = self.docker;
        cfg.listen = self.listen;
        cfg.boot_label = self.label;
        cfg.intercept = self.intercept.into_iter().filter(|k| !k.is_empty()).collect();
        cfg.subscriber_capacity = self.capacity;
        if !self.events_path.is_empty() {
            cfg.event_paths = self.events_path;
        }
        cfg.connect_timeout = Duration::from_secs(self.timeout);
        cfg
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = Cli::parse().into_config();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, label = e.as_label(), "bootvisor stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Config) -> Result<(), RuntimeError> {
    let docker = Addr::parse(&cfg.docker)?;
    let listen = Addr::parse(&cfg.listen)?;

    let runtime: Arc<dyn Runtime> = Arc::new(DockerRuntime::connect(&docker, cfg.connect_timeout)?);
    let console = output::stdout();

    let engine = Engine::builder(runtime, Stream::new("", Arc::clone(&console)))
        .with_config(&cfg)
        .build();
    tracing::info!(
        docker = %docker,
        label = %cfg.boot_label,
        intercept = ?cfg.intercept,
        "engine ready"
    );

    let token = CancellationToken::new();
    let proxy = Proxy::new(
        docker,
        Stream::new(text(Color::Proxy, format!("{:<12} | ", "proxy")), Arc::clone(&console)),
    );
    let app = http::router(
        AppState::new(Arc::clone(&engine), proxy, token.clone()),
        &cfg.event_paths,
    );

    let listener = Listener::bind(&listen).await?;
    let server = tokio::spawn(http::serve(listener, app, token.clone()));
    Stream::new("", console).println("Listening...");

    let outcome = tokio::select! {
        res = Arc::clone(&engine).listen(token.clone()) => res,
        () = shutdown_signal() => Ok(()),
    };
    token.cancel();

    let served = match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(res)) => res,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "server task failed");
            Ok(())
        }
        Err(_) => {
            tracing::warn!(grace = ?SHUTDOWN_GRACE, "server did not stop in time");
            Ok(())
        }
    };
    outcome.and(served)
}

/// Completes on SIGINT/SIGTERM/SIGQUIT; never, if handlers cannot be installed.
async fn shutdown_signal() {
    match wait_for_shutdown_signal().await {
        Ok(signal) => tracing::info!(signal, "shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "signal handlers unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let cfg = Cli::try_parse_from(["bootvisor"]).unwrap().into_config();
        let default = Config::default();

        assert_eq!(cfg.docker, default.docker);
        assert_eq!(cfg.listen, default.listen);
        assert_eq!(cfg.boot_label, default.boot_label);
        assert_eq!(cfg.intercept, default.intercept);
        assert_eq!(cfg.subscriber_capacity, default.subscriber_capacity);
        assert_eq!(cfg.event_paths, default.event_paths);
        assert_eq!(cfg.connect_timeout, default.connect_timeout);
    }

    #[test]
    fn test_flags_override() {
        let cfg = Cli::try_parse_from([
            "bootvisor",
            "--docker",
            "http://localhost:2375",
            "--label",
            "ready",
            "--intercept",
            "start",
            "--intercept",
            "restart",
            "--events-path",
            "/events",
            "--capacity",
            "0",
            "--timeout",
            "5",
        ])
        .unwrap()
        .into_config();

        assert_eq!(cfg.docker, "http://localhost:2375");
        assert_eq!(cfg.boot_label, "ready");
        assert_eq!(cfg.intercept, ["start", "restart"]);
        assert_eq!(cfg.event_paths, ["/events"]);
        assert_eq!(cfg.subscriber_capacity_clamped(), 1);
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_intercept_disables_boot_wait() {
        let cfg = Cli::try_parse_from(["bootvisor", "--intercept", ""]).unwrap().into_config();
        assert!(cfg.intercept.is_empty());
    }
}
