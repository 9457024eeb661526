//! # Facade configuration.
//!
//! [`Config`] centralizes the settings the binary wires the engine, the
//! capability client and the HTTP server with.
//!
//! ## Sentinel values
//! - `subscriber_capacity = 0` → treated as 1 (channels need room for one event)
//! - `connect_timeout = 0s` → treated as 1s by the Docker client
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use bootvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.boot_label = "com.example.boot".into();
//! cfg.intercept.push("restart".into());
//! cfg.connect_timeout = Duration::from_secs(30);
//!
//! assert_eq!(cfg.intercept, ["start", "restart"]);
//! ```

use std::time::Duration;

/// Default control plane endpoint.
pub const DEFAULT_DOCKER: &str = "unix:///var/run/docker.sock";

/// Default endpoint the facade listens on.
pub const DEFAULT_LISTEN: &str = "unix:///var/run/boot.sock";

/// Event stream paths served by default (API version prefixes of the proxied daemon).
pub const DEFAULT_EVENT_PATHS: [&str; 4] = ["/events", "/v1.24/events", "/v1.19/events", "/v1.12/events"];

/// Runtime settings of the facade.
///
/// ## Field semantics
/// - `docker`: control plane endpoint (`unix://`, `http://`, `https://` or a path)
/// - `listen`: endpoint the facade serves on
/// - `boot_label`: workload label holding the boot command
/// - `intercept`: event kinds handled by the boot-wait interceptor
/// - `subscriber_capacity`: per-subscriber queue size (min 1)
/// - `event_paths`: HTTP paths served by the event stream endpoint
/// - `connect_timeout`: capability client request timeout
#[derive(Clone, Debug)]
pub struct Config {
    pub docker: String,
    pub listen: String,
    pub boot_label: String,
    pub intercept: Vec<String>,

    /// Events buffered per subscriber before `emit` waits for it.
    ///
    /// Small values keep a stalled subscriber from accumulating a backlog; the
    /// emitting task waits instead.
    pub subscriber_capacity: usize,

    pub event_paths: Vec<String>,
    pub connect_timeout: Duration,
}

impl Config {
    /// Returns the subscriber queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscriber_capacity_clamped(&self) -> usize {
        self.subscriber_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `docker = unix:///var/run/docker.sock`
    /// - `listen = unix:///var/run/boot.sock`
    /// - `boot_label = "boot"`, `intercept = ["start"]`
    /// - `subscriber_capacity = 1` (hand-over delivery)
    /// - `event_paths` = `/events` and its `v1.24`, `v1.19`, `v1.12` aliases
    /// - `connect_timeout = 120s`
    fn default() -> Self {
        Self {
            docker: DEFAULT_DOCKER.to_string(),
            listen: DEFAULT_LISTEN.to_string(),
            boot_label: crate::interceptors::DEFAULT_LABEL.to_string(),
            intercept: vec!["start".to_string()],
            subscriber_capacity: 1,
            event_paths: DEFAULT_EVENT_PATHS.iter().map(|p| p.to_string()).collect(),
            connect_timeout: Duration::from_secs(120),
        }
    }
}
