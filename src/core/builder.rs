use std::sync::Arc;

use crate::config::Config;
use crate::interceptors::{BootWait, InterceptRef};
use crate::output::Stream;
use crate::runtime::Runtime;
use crate::subscribers::SubscriberRegistry;

use super::Engine;

/// Builder for constructing an [`Engine`] with its interceptors.
pub struct EngineBuilder {
    runtime: Arc<dyn Runtime>,
    log: Stream,
    subscriber_capacity: usize,
    interceptors: Vec<(String, InterceptRef)>,
}

impl EngineBuilder {
    /// Creates a builder with no interceptors and a subscriber capacity of 1.
    pub fn new(runtime: Arc<dyn Runtime>, log: Stream) -> Self {
        Self {
            runtime,
            log,
            subscriber_capacity: 1,
            interceptors: Vec::new(),
        }
    }

    /// Applies `cfg`: subscriber capacity, and a [`BootWait`] reading
    /// `cfg.boot_label` for every kind in `cfg.intercept`.
    pub fn with_config(mut self, cfg: &Config) -> Self {
        self.subscriber_capacity = cfg.subscriber_capacity_clamped();

        let boot: InterceptRef = Arc::new(BootWait::new(cfg.boot_label.clone()));
        for kind in &cfg.intercept {
            self.interceptors.push((kind.clone(), Arc::clone(&boot)));
        }
        self
    }

    /// Sets the per-subscriber queue size (clamped to a minimum of 1).
    pub fn with_subscriber_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_capacity = capacity;
        self
    }

    /// Registers `handler` for events of kind `kind`.
    ///
    /// Later registrations for the same kind win.
    pub fn with_interceptor(mut self, kind: impl Into<String>, handler: InterceptRef) -> Self {
        self.interceptors.push((kind.into(), handler));
        self
    }

    /// Builds the engine and freezes its interceptor table.
    pub fn build(self) -> Arc<Engine> {
        let subscribers = SubscriberRegistry::new(self.subscriber_capacity);
        let mut engine = Engine::new(self.runtime, self.log, subscribers);
        for (kind, handler) in self.interceptors {
            engine.intercept(kind, handler);
        }
        Arc::new(engine)
    }
}
