//! ANSI color codes for console output.

/// Semantic colors used across the console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Error,
    Success,
    Warning,
    Info,
    /// Workload prefixes.
    Container,
    /// Reverse proxy prefix.
    Proxy,
}

impl Color {
    /// SGR parameter for this color.
    pub fn code(self) -> &'static str {
        match self {
            Color::Error => "31",
            Color::Success => "32",
            Color::Warning => "35",
            Color::Info => "36",
            Color::Container => "34;1",
            Color::Proxy => "33",
        }
    }
}

/// Wraps `text` in the escape sequence for `color` and a trailing reset.
///
/// # Example
/// ```
/// use bootvisor::output::{Color, text};
///
/// assert_eq!(text(Color::Error, "boom"), "\x1b[31mboom\x1b[0m");
/// ```
pub fn text(color: Color, text: impl AsRef<str>) -> String {
    format!("\x1b[{}m{}\x1b[0m", color.code(), text.as_ref())
}
