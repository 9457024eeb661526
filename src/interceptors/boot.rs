//! # Boot-wait interceptor.
//!
//! Holds back a workload's start event until its boot command succeeded.
//!
//! ```text
//! start event ──► inspect(target) ── Err ─────────────────► error   ──► Drop
//!                      │
//!                      ▼
//!             Executable::boot(label) ──► run (output ──► "<id> | " prefixed log)
//!                      │
//!                      ├─ Err                 ──► error                     ──► Drop
//!                      ├─ Ok(NOT_RUN)         ──► warning (no boot command) ──► Emit
//!                      ├─ Ok(0)               ──► success                   ──► Emit
//!                      └─ Ok(code)            ──► error with the code       ──► Drop
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::Intercept;
use crate::command::{Executable, NOT_RUN};
use crate::events::{Action, Event};
use crate::output::{Color, Stream, text};
use crate::runtime::Runtime;

/// Label read when none is configured.
pub const DEFAULT_LABEL: &str = "boot";

/// Reference interceptor running the workload's boot command.
#[derive(Debug, Clone)]
pub struct BootWait {
    label: String,
}

impl BootWait {
    /// Creates the interceptor reading the boot command from label `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for BootWait {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

#[async_trait]
impl Intercept for BootWait {
    async fn intercept(&self, log: Stream, runtime: Arc<dyn Runtime>, event: Arc<Event>) -> Action {
        let mut log = log.prefixed(text(Color::Container, format!("{} | ", event.short_id())));

        let workload = match runtime.inspect(event.target()).await {
            Ok(workload) => workload,
            Err(e) => {
                log.error(format_args!("Error {e}"));
                return Action::Drop;
            }
        };

        let exec = Executable::boot(&workload, &self.label);
        if matches!(exec, Executable::Exec { .. }) {
            log.info(format_args!("Using {exec}"));
        }

        let result = exec.run(runtime.as_ref(), &mut log).await;
        log.end_line();

        match result {
            Err(e) => {
                log.error(format_args!("Error {e}"));
                Action::Drop
            }
            Ok(NOT_RUN) => {
                log.warning("No boot command present, assuming container started");
                Action::Emit(event)
            }
            Ok(0) => {
                log.success("Up and running!");
                Action::Emit(event)
            }
            Ok(code) => {
                log.error(format_args!("Non-zero exit code {code}"));
                Action::Drop
            }
        }
    }

    fn name(&self) -> &str {
        "boot-wait"
    }
}
