//! Commands run inside a workload before its start event is released.
//!
//! See [`Executable`] for the construction policy and [`NOT_RUN`] for the
//! sentinel returned when there is nothing to run.

mod executable;

pub use executable::{Executable, NOT_RUN};
