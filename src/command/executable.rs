//! # Boot command execution.
//!
//! An [`Executable`] is built from a workload's boot label and run once
//! against the started workload:
//!
//! ```text
//! label absent / ""        ──► None
//! "NONE ..."               ──► None
//! "CMD <rest>"             ──► Exec ["/bin/sh", "-c", "<rest>"]
//! "<argv0> <argv1> ..."    ──► Exec ["<argv0>", "<argv1>", ...]
//! ```
//!
//! ## Run semantics
//! - `None` returns [`NOT_RUN`] immediately, without touching the runtime.
//! - `Exec` creates an execution (stdout+stderr attached, no stdin, no tty),
//!   starts it with output streamed into the sink, waits for completion and
//!   returns the exit code.
//! - Any runtime failure is returned as `Err`; no exit code is available then.

use std::fmt;

use crate::error::ClientError;
use crate::output::Stream;
use crate::runtime::{ExecOptions, Runtime, Workload};

/// Exit code reported when no command was run. Real exit codes are never negative.
pub const NOT_RUN: i64 = -1;

/// Marker disabling the boot command.
const NONE_MARKER: &str = "NONE";

/// Marker running the rest of the label through a shell.
const SHELL_MARKER: &str = "CMD";

/// Unit of work run against a started workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// Nothing to run.
    None,
    /// Command line to execute inside `workload`.
    Exec {
        workload: String,
        command: Vec<String>,
    },
}

impl Executable {
    /// Builds the boot command for `workload` from its label `label`.
    ///
    /// # Example
    /// ```
    /// use bootvisor::{Executable, Workload};
    ///
    /// let w = Workload::new("610036617aa1").with_label("boot", "CMD /boot.sh --wait");
    /// assert_eq!(
    ///     Executable::boot(&w, "boot"),
    ///     Executable::Exec {
    ///         workload: "610036617aa1".into(),
    ///         command: vec!["/bin/sh".into(), "-c".into(), "/boot.sh --wait".into()],
    ///     }
    /// );
    /// ```
    pub fn boot(workload: &Workload, label: &str) -> Self {
        let Some(value) = workload.label(label) else {
            return Executable::None;
        };

        let tokens: Vec<&str> = value.split_whitespace().collect();
        let command = match tokens.split_first() {
            None => return Executable::None,
            Some((&NONE_MARKER, _)) => return Executable::None,
            Some((&SHELL_MARKER, rest)) => {
                vec!["/bin/sh".to_string(), "-c".to_string(), rest.join(" ")]
            }
            Some(_) => tokens.iter().map(|t| t.to_string()).collect(),
        };

        Executable::Exec {
            workload: workload.id.clone(),
            command,
        }
    }

    /// Runs the command, streaming its output into `output`.
    ///
    /// Returns the exit code, or [`NOT_RUN`] for [`Executable::None`].
    pub async fn run(&self, runtime: &dyn Runtime, output: &mut Stream) -> Result<i64, ClientError> {
        match self {
            Executable::None => Ok(NOT_RUN),
            Executable::Exec { workload, command } => {
                let exec = runtime
                    .create_exec(workload, ExecOptions::attached(command.clone()))
                    .await?;
                runtime.start_exec(&exec, output).await?;
                runtime.exec_exit_code(&exec).await
            }
        }
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executable::None => f.write_str("None"),
            Executable::Exec { workload, command } => write!(
                f,
                "Exec{{[{}] @ {}}}",
                command.join(" "),
                crate::events::short_id(workload)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = "610036617aa165161127bc0cec60ae7831fdc1ddf1fdef1fb7f246cc83b0c315";

    fn workload(label: &str) -> Workload {
        Workload::new(CONTAINER).with_label("boot", label)
    }

    fn argv(exec: &Executable) -> Vec<&str> {
        match exec {
            Executable::Exec { command, .. } => command.iter().map(String::as_str).collect(),
            Executable::None => panic!("expected Exec, got None"),
        }
    }

    #[test]
    fn test_missing_or_empty_label_is_none() {
        assert_eq!(Executable::boot(&Workload::new(CONTAINER), "boot"), Executable::None);
        assert_eq!(Executable::boot(&workload(""), "boot"), Executable::None);
        assert_eq!(Executable::boot(&workload("   "), "boot"), Executable::None);
    }

    #[test]
    fn test_none_marker() {
        let exec = Executable::boot(&workload("NONE"), "boot");
        assert_eq!(exec, Executable::None);
        assert_eq!(exec.to_string(), "None");
    }

    #[test]
    fn test_cmd_marker_wraps_in_shell() {
        let exec = Executable::boot(&workload("CMD /boot.sh"), "boot");
        assert_eq!(argv(&exec), ["/bin/sh", "-c", "/boot.sh"]);
        assert_eq!(exec.to_string(), "Exec{[/bin/sh -c /boot.sh] @ 610036617aa1}");
    }

    #[test]
    fn test_cmd_marker_joins_remaining_tokens() {
        let exec = Executable::boot(&workload("CMD  test -f   /ready"), "boot");
        assert_eq!(argv(&exec), ["/bin/sh", "-c", "test -f /ready"]);
    }

    #[test]
    fn test_plain_argv() {
        let exec = Executable::boot(&workload("/boot.sh"), "boot");
        assert_eq!(argv(&exec), ["/boot.sh"]);

        let exec = Executable::boot(&workload("/usr/bin/wait-for db:5432"), "boot");
        assert_eq!(argv(&exec), ["/usr/bin/wait-for", "db:5432"]);
    }

    #[test]
    fn test_custom_label_name() {
        let w = Workload::new(CONTAINER).with_label("com.example.boot", "/ready.sh");
        assert_eq!(Executable::boot(&w, "boot"), Executable::None);
        assert_eq!(argv(&Executable::boot(&w, "com.example.boot")), ["/ready.sh"]);
    }
}
