#![forbid(unsafe_code)]

//! Raw output streams.
//!
//! While console capture is active, every byte that reaches the terminal goes
//! through a [`RawStreams`] implementation: render frames, replayed captured
//! output, and the single-instance warning. Nothing above this layer may
//! write to the process's stdout/stderr directly, otherwise captured output
//! would loop back into the capture queue.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Which of the two standard streams a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl StreamKind {
    /// Short lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Direct, un-intercepted access to the process output streams.
pub trait RawStreams: Send + Sync {
    /// Write bytes to the given stream.
    fn write_bytes(&self, kind: StreamKind, bytes: &[u8]) -> io::Result<()>;

    /// Write a string to the given stream.
    fn write_str(&self, kind: StreamKind, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.write_bytes(kind, text.as_bytes())
    }

    /// Flush both streams.
    fn flush(&self) -> io::Result<()>;
}

const NONE: u8 = 0;
const STDOUT: u8 = 1;
const STDERR: u8 = 2;

/// [`RawStreams`] backed by the real process stdout and stderr.
///
/// Stdout is line buffered by the standard library while stderr is not, so
/// interleaved writes can reorder on screen. Whenever consecutive writes
/// switch streams, the previously used one is flushed first.
#[derive(Debug, Default)]
pub struct StdStreams {
    last: AtomicU8,
}

impl StdStreams {
    /// Create a handle to the process streams.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU8::new(NONE),
        }
    }

    fn switch_to(&self, kind: StreamKind) -> io::Result<()> {
        let tag = match kind {
            StreamKind::Stdout => STDOUT,
            StreamKind::Stderr => STDERR,
        };
        match self.last.swap(tag, Ordering::AcqRel) {
            STDOUT if tag == STDERR => io::stdout().lock().flush(),
            STDERR if tag == STDOUT => io::stderr().lock().flush(),
            _ => Ok(()),
        }
    }
}

impl RawStreams for StdStreams {
    fn write_bytes(&self, kind: StreamKind, bytes: &[u8]) -> io::Result<()> {
        self.switch_to(kind)?;
        match kind {
            StreamKind::Stdout => io::stdout().lock().write_all(bytes),
            StreamKind::Stderr => io::stderr().lock().write_all(bytes),
        }
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()?;
        io::stderr().lock().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_names() {
        assert_eq!(StreamKind::Stdout.as_str(), "stdout");
        assert_eq!(StreamKind::Stderr.as_str(), "stderr");
    }

    #[test]
    fn empty_write_is_noop() {
        let streams = StdStreams::new();
        streams.write_str(StreamKind::Stdout, "").unwrap();
        assert_eq!(streams.last.load(Ordering::Acquire), NONE);
    }
}
