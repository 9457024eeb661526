//! # Line-prefixing output stream.
//!
//! [`Stream`] is the log sink handed to the engine, interceptors and the
//! proxy. Text written through it is forwarded to a [`Writer`] with the
//! stream's prefix inserted at the start of every line, including lines that
//! arrive split over several writes (exec output is delivered in arbitrary
//! chunks).
//!
//! ```text
//! write("T")  write("est\nne")  write("xt\n")
//!     │             │                │
//!     ▼             ▼                ▼
//!  "> T"         "est\n> ne"      "xt\n"       ──► "> Test\n> next\n"
//! ```
//!
//! ## Rules
//! - One writer call per write, so concurrent streams sharing a writer never
//!   split a prefix from its text.
//! - Clones share the writer but track line state independently.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::sync::Arc;

use super::colors::{Color, text};

/// Destination for formatted output.
pub type Writer = Arc<dyn Fn(&str) + Send + Sync>;

/// Writer printing to the process' standard output.
pub fn stdout() -> Writer {
    Arc::new(|s: &str| {
        let mut out = io::stdout().lock();
        let _ = out.write_all(s.as_bytes());
        let _ = out.flush();
    })
}

/// Prefixed line stream over a shared [`Writer`].
#[derive(Clone)]
pub struct Stream {
    prefix: String,
    writer: Writer,
    started: bool,
}

impl Stream {
    /// Creates a stream with the given prefix and writer.
    pub fn new(prefix: impl Into<String>, writer: Writer) -> Self {
        Self {
            prefix: prefix.into(),
            writer,
            started: false,
        }
    }

    /// Creates a stream writing to standard output.
    pub fn stdout(prefix: impl Into<String>) -> Self {
        Self::new(prefix, stdout())
    }

    /// Returns the prefix inserted before each line.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Creates a stream on the same writer with a different prefix.
    pub fn prefixed(&self, prefix: impl Into<String>) -> Self {
        Self::new(prefix, Arc::clone(&self.writer))
    }

    /// Writes text without a trailing newline.
    pub fn print(&mut self, msg: impl Display) {
        self.write_text(&msg.to_string());
    }

    /// Writes text followed by a newline.
    pub fn println(&mut self, msg: impl Display) {
        self.write_text(&format!("{msg}\n"));
    }

    /// Writes one colored line.
    pub fn line(&mut self, color: Color, msg: impl Display) {
        self.write_text(&format!("{}\n", text(color, msg.to_string())));
    }

    pub fn info(&mut self, msg: impl Display) {
        self.line(Color::Info, msg);
    }

    pub fn error(&mut self, msg: impl Display) {
        self.line(Color::Error, msg);
    }

    pub fn warning(&mut self, msg: impl Display) {
        self.line(Color::Warning, msg);
    }

    pub fn success(&mut self, msg: impl Display) {
        self.line(Color::Success, msg);
    }

    /// Terminates a partially written line, if any.
    pub fn end_line(&mut self) {
        if self.started {
            self.write_text("\n");
        }
    }

    fn write_text(&mut self, mut s: &str) {
        if s.is_empty() {
            return;
        }

        let mut out = String::with_capacity(s.len() + self.prefix.len());
        while !s.is_empty() {
            if !self.started {
                out.push_str(&self.prefix);
                self.started = true;
            }
            match s.find('\n') {
                Some(pos) => {
                    let (line, rest) = s.split_at(pos + 1);
                    out.push_str(line);
                    self.started = false;
                    s = rest;
                }
                None => {
                    out.push_str(s);
                    break;
                }
            }
        }
        (self.writer)(&out);
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_text(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("prefix", &self.prefix)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn capture(prefix: &str) -> (Stream, Arc<Mutex<String>>) {
        let written = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&written);
        let writer: Writer = Arc::new(move |s: &str| sink.lock().unwrap().push_str(s));
        (Stream::new(prefix, writer), written)
    }

    #[test]
    fn test_partial_line_gets_prefix() {
        let (mut stream, written) = capture("> ");
        stream.write_all(b"Test").unwrap();
        assert_eq!(*written.lock().unwrap(), "> Test");
    }

    #[test]
    fn test_bare_newline() {
        let (mut stream, written) = capture("> ");
        stream.write_all(b"\n").unwrap();
        assert_eq!(*written.lock().unwrap(), "> \n");
    }

    #[test]
    fn test_single_bytes_form_one_line() {
        let (mut stream, written) = capture("> ");
        for chunk in ["T", "e", "s", "t", "\n"] {
            stream.write_all(chunk.as_bytes()).unwrap();
        }
        assert_eq!(*written.lock().unwrap(), "> Test\n");
    }

    #[test]
    fn test_chunk_spanning_lines() {
        let (mut stream, written) = capture("> ");
        stream.write_all(b"T\na").unwrap();
        assert_eq!(*written.lock().unwrap(), "> T\n> a");
    }

    #[test]
    fn test_consecutive_lines() {
        let (mut stream, written) = capture("> ");
        stream.write_all(b"Line 1\n").unwrap();
        stream.write_all(b"Line 2\n").unwrap();
        assert_eq!(*written.lock().unwrap(), "> Line 1\n> Line 2\n");
    }

    #[test]
    fn test_prefixed_shares_writer() {
        let (stream, written) = capture("> ");
        let mut other = stream.prefixed("! ");
        assert_eq!(other.prefix(), "! ");

        other.println("Hello World");
        assert_eq!(*written.lock().unwrap(), "! Hello World\n");
    }

    #[test]
    fn test_print_has_no_newline() {
        let (mut stream, written) = capture("> ");
        stream.print(format_args!("Test {}", 0));
        assert_eq!(*written.lock().unwrap(), "> Test 0");
    }

    #[test]
    fn test_end_line_only_when_mid_line() {
        let (mut stream, written) = capture("> ");
        stream.end_line();
        assert_eq!(*written.lock().unwrap(), "");

        stream.print("partial");
        stream.end_line();
        stream.end_line();
        assert_eq!(*written.lock().unwrap(), "> partial\n");
    }

    #[test]
    fn test_clones_track_lines_independently() {
        let (mut a, written) = capture("> ");
        let mut b = a.clone();
        a.print("a");
        b.print("b");
        assert_eq!(*written.lock().unwrap(), "> a> b");
    }

    #[test]
    fn test_colored_helpers() {
        let (mut stream, written) = capture("> ");
        stream.info("i");
        stream.error("e");
        stream.warning("w");
        stream.success("s");

        let expected = format!(
            "> {}\n> {}\n> {}\n> {}\n",
            text(Color::Info, "i"),
            text(Color::Error, "e"),
            text(Color::Warning, "w"),
            text(Color::Success, "s"),
        );
        assert_eq!(*written.lock().unwrap(), expected);
    }
}
