//! # Event interceptors.
//!
//! An interceptor runs custom logic for one event kind and decides the fate
//! of each event of that kind by returning an [`Action`](crate::Action).
//!
//! - [`Intercept`]: the extension trait.
//! - [`InterceptFn`]: closure-backed implementation.
//! - [`BootWait`]: reference policy holding back `start` events until the
//!   workload's boot command succeeded.
//!
//! ## Contract
//! - Always resolve to exactly one action; errors become log lines plus `Drop`.
//! - Never block the executor. A handler that hangs stalls only its own
//!   event: every event is handled on its own task, without a timeout.

mod boot;
mod intercept;

pub use boot::{BootWait, DEFAULT_LABEL};
pub use intercept::{Intercept, InterceptFn, InterceptRef};
