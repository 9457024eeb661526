//! Engine core: interception, fan-out and lifecycle.
//!
//! - [`Engine`]: consumes raw events, runs interceptors, fans out to subscribers;
//! - [`EngineBuilder`]: assembles an engine from a runtime, a log and interceptors;
//! - [`wait_for_shutdown_signal`]: cross-platform termination signal helper.

mod builder;
mod engine;
mod shutdown;

pub use builder::EngineBuilder;
pub use engine::Engine;
pub use shutdown::wait_for_shutdown_signal;
