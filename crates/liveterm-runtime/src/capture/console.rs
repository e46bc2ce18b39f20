#![forbid(unsafe_code)]

//! The console hub: the one place application output goes through.
//!
//! Output written via [`Console::stdout`], [`Console::stderr`], or the
//! `console_*!` macros is handed to the hub's current [`ConsoleWriter`].
//! Outside a presenting session that is a [`DirectWriter`]; while capture is
//! active it is an [`InterceptingWriter`] feeding the capture queue. Swapping
//! writers is an explicit, idempotent `capture`/`release` pair.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use liveterm_core::{RawStreams, StdStreams, StreamKind};

use super::entry::CaptureEntry;
use super::queue::CaptureQueue;
use super::resolver::{CallSite, OriginResolver};

/// Destination of console output.
pub trait ConsoleWriter: Send + Sync {
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()>;
}

/// Writes straight to the raw streams.
pub struct DirectWriter {
    streams: Arc<dyn RawStreams>,
}

impl DirectWriter {
    #[must_use]
    pub fn new(streams: Arc<dyn RawStreams>) -> Self {
        Self { streams }
    }
}

impl ConsoleWriter for DirectWriter {
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()> {
        self.streams.write_bytes(stream, bytes)
    }
}

/// Diverts attributable text writes into the capture queue.
///
/// Binary (non-UTF-8) payloads and writes the resolver does not attribute
/// pass through to the raw streams unchanged.
pub struct InterceptingWriter {
    queue: Arc<CaptureQueue>,
    resolver: Arc<dyn OriginResolver>,
    passthrough: DirectWriter,
}

impl InterceptingWriter {
    #[must_use]
    pub fn new(
        queue: Arc<CaptureQueue>,
        resolver: Arc<dyn OriginResolver>,
        streams: Arc<dyn RawStreams>,
    ) -> Self {
        Self {
            queue,
            resolver,
            passthrough: DirectWriter::new(streams),
        }
    }
}

impl ConsoleWriter for InterceptingWriter {
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()> {
        let Ok(text) = std::str::from_utf8(bytes) else {
            return self.passthrough.write(stream, bytes);
        };
        match self.resolver.resolve() {
            Some(origin) => self.queue.push(CaptureEntry::captured(text, stream, origin)),
            None => self.passthrough.write(stream, bytes),
        }
    }
}

/// Process output hub.
pub struct Console {
    streams: Arc<dyn RawStreams>,
    writer: RwLock<Arc<dyn ConsoleWriter>>,
    captured: AtomicBool,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("captured", &self.is_captured())
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<Arc<Console>> =
    LazyLock::new(|| Arc::new(Console::new(Arc::new(StdStreams::new()))));

impl Console {
    /// An isolated hub over the given streams, initially not capturing.
    #[must_use]
    pub fn new(streams: Arc<dyn RawStreams>) -> Self {
        let writer: Arc<dyn ConsoleWriter> = Arc::new(DirectWriter::new(Arc::clone(&streams)));
        Self {
            writer: RwLock::new(writer),
            streams,
            captured: AtomicBool::new(false),
        }
    }

    /// The process-wide hub over the real stdout and stderr.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// The raw streams behind this hub. Writes here are never captured.
    #[must_use]
    pub fn streams(&self) -> &Arc<dyn RawStreams> {
        &self.streams
    }

    /// Start diverting console calls into `queue`.
    ///
    /// Returns `false` without changing anything if already capturing.
    pub fn capture(&self, queue: Arc<CaptureQueue>, resolver: Arc<dyn OriginResolver>) -> bool {
        if self.captured.swap(true, Ordering::AcqRel) {
            return false;
        }
        let writer: Arc<dyn ConsoleWriter> = Arc::new(InterceptingWriter::new(
            queue,
            resolver,
            Arc::clone(&self.streams),
        ));
        *self.writer.write().unwrap_or_else(PoisonError::into_inner) = writer;
        tracing::debug!("console capture installed");
        true
    }

    /// Restore direct output. Returns `false` if not capturing.
    pub fn release(&self) -> bool {
        if !self.captured.swap(false, Ordering::AcqRel) {
            return false;
        }
        let writer: Arc<dyn ConsoleWriter> = Arc::new(DirectWriter::new(Arc::clone(&self.streams)));
        *self.writer.write().unwrap_or_else(PoisonError::into_inner) = writer;
        tracing::debug!("console capture released");
        true
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured.load(Ordering::Acquire)
    }

    /// Write through the current writer.
    pub fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()> {
        // Clone out of the lock: the writer may print, and printing must not
        // block capture/release.
        let writer = Arc::clone(&self.writer.read().unwrap_or_else(PoisonError::into_inner));
        writer.write(stream, bytes)
    }

    /// A `Write` handle for standard output through this hub.
    #[must_use]
    pub fn stdout(self: &Arc<Self>) -> ConsoleStream {
        ConsoleStream {
            console: Arc::clone(self),
            stream: StreamKind::Stdout,
        }
    }

    /// A `Write` handle for standard error through this hub.
    #[must_use]
    pub fn stderr(self: &Arc<Self>) -> ConsoleStream {
        ConsoleStream {
            console: Arc::clone(self),
            stream: StreamKind::Stderr,
        }
    }

    /// Perform a console-style call: format `args` plus a newline and write
    /// it to `stream` as coming from `site`.
    ///
    /// Write errors are logged at debug level and dropped.
    pub fn print_call(&self, site: CallSite, stream: StreamKind, args: fmt::Arguments<'_>) {
        let _scope = site.enter();
        let text = format!("{args}\n");
        if let Err(err) = self.write(stream, text.as_bytes()) {
            tracing::debug!(error = %err, printer = site.printer, "console write failed");
        }
    }
}

/// `io::Write` adapter over a [`Console`] stream.
#[derive(Debug, Clone)]
pub struct ConsoleStream {
    console: Arc<Console>,
    stream: StreamKind,
}

impl Write for ConsoleStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write(self.stream, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.streams.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::decorate::{Decoration, EntryPrinter};
    use crate::capture::resolver::{CallSiteResolver, NoopResolver};
    use liveterm_core::testing::RecordingStreams;

    fn setup() -> (Arc<RecordingStreams>, Arc<Console>, Arc<CaptureQueue>) {
        let streams = Arc::new(RecordingStreams::new());
        let console = Arc::new(Console::new(streams.clone()));
        let queue = Arc::new(CaptureQueue::new(EntryPrinter::new(
            streams.clone(),
            Decoration {
                enabled: false,
                ..Decoration::default()
            },
        )));
        (streams, console, queue)
    }

    #[test]
    fn uncaptured_writes_go_direct() {
        let (streams, console, _) = setup();
        write!(console.stdout(), "plain").unwrap();
        assert_eq!(streams.output(StreamKind::Stdout), "plain");
    }

    #[test]
    fn capture_and_release_are_idempotent() {
        let (_, console, queue) = setup();
        assert!(console.capture(queue.clone(), Arc::new(CallSiteResolver)));
        assert!(!console.capture(queue, Arc::new(CallSiteResolver)));
        assert!(console.is_captured());
        assert!(console.release());
        assert!(!console.release());
        assert!(!console.is_captured());
    }

    #[test]
    fn console_calls_are_queued_while_holding() {
        let (streams, console, queue) = setup();
        queue.hold();
        console.capture(queue.clone(), Arc::new(CallSiteResolver));
        console.print_call(crate::call_site!("log"), StreamKind::Stdout, format_args!("hi {}", 1));
        assert!(streams.writes().is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn unattributed_writes_pass_through() {
        let (streams, console, queue) = setup();
        queue.hold();
        console.capture(queue.clone(), Arc::new(CallSiteResolver));
        write!(console.stderr(), "raw").unwrap();
        assert_eq!(streams.output(StreamKind::Stderr), "raw");
        assert!(queue.is_empty());
    }

    #[test]
    fn binary_writes_pass_through() {
        let (streams, console, queue) = setup();
        queue.hold();
        console.capture(queue.clone(), Arc::new(CallSiteResolver));
        let _scope = crate::call_site!("log").enter();
        console.write(StreamKind::Stdout, &[0xff, 0xfe]).unwrap();
        assert_eq!(streams.writes().len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn noop_resolver_never_queues() {
        let (streams, console, queue) = setup();
        queue.hold();
        console.capture(queue.clone(), Arc::new(NoopResolver));
        console.print_call(crate::call_site!("log"), StreamKind::Stdout, format_args!("x"));
        assert_eq!(streams.output(StreamKind::Stdout), "x\n");
        assert!(queue.is_empty());
    }
}
