//! Console output: prefixed line streams and ANSI colors.
//!
//! The engine, the interceptors and the proxy all report through a
//! [`Stream`]. A stream prefixes every line it writes (workload id, component
//! name) and forwards text to a shared [`Writer`], so concurrently running
//! handlers can write to the same console with their own prefixes.

mod colors;
mod stream;

pub use colors::{Color, text};
pub use stream::{Stream, Writer, stdout};
