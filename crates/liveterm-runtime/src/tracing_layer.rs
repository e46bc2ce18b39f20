#![forbid(unsafe_code)]

//! Tracing layer that routes application events through the capture queue.
//!
//! With the layer installed, `tracing` events are printed above the live
//! region like any other captured console call, decorated with the event's
//! level, target, and source location:
//!
//! ```text
//! console.warn at my_app::jobs ./src/jobs.rs:88
//! retrying upload attempt=2
//! ```
//!
//! Events from liveterm's own crates are ignored, as is anything emitted
//! while the layer is already handling an event on the same thread.
//!
//! # Quick Start
//!
//! ```no_run
//! use liveterm_runtime::{CaptureLayer, Presenter, PresenterOptions};
//! use tracing_subscriber::prelude::*;
//!
//! let presenter = Presenter::new(PresenterOptions::default())?;
//! tracing_subscriber::registry()
//!     .with(CaptureLayer::for_presenter(&presenter))
//!     .init();
//! # Ok::<(), liveterm_runtime::PresenterError>(())
//! ```

use std::cell::Cell;
use std::fmt::{self, Write as FmtWrite};
use std::sync::Arc;

use liveterm_core::StreamKind;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::Presenter;
use crate::capture::{CaptureEntry, CaptureQueue, Origin};

/// Targets never captured: diagnostics from liveterm's own crates, which
/// fire on every document update.
const INTERNAL_TARGETS: [&str; 6] = [
    "liveterm",
    "liveterm_core",
    "liveterm_demo",
    "liveterm_document",
    "liveterm_runtime",
    "liveterm_widgets",
];

thread_local! {
    static IN_LAYER: Cell<bool> = const { Cell::new(false) };
}

// ============================================================================
// Event Visitor
// ============================================================================

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        let rendered = strip_debug_quotes(&rendered);
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }
}

fn strip_debug_quotes(s: &str) -> String {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}

/// Console printer name for a level, as used in headers and level colours.
fn printer_name(level: Level) -> &'static str {
    match level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        Level::TRACE => "trace",
    }
}

fn stream_for(level: Level) -> StreamKind {
    if level <= Level::WARN {
        StreamKind::Stderr
    } else {
        StreamKind::Stdout
    }
}

fn is_internal(target: &str) -> bool {
    INTERNAL_TARGETS.iter().any(|internal| {
        target
            .strip_prefix(internal)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

// ============================================================================
// CaptureLayer
// ============================================================================

/// A `tracing_subscriber::Layer` feeding a [`CaptureQueue`].
pub struct CaptureLayer {
    queue: Arc<CaptureQueue>,
    show_fields: bool,
}

impl CaptureLayer {
    #[must_use]
    pub fn new(queue: Arc<CaptureQueue>) -> Self {
        Self {
            queue,
            show_fields: true,
        }
    }

    /// A layer feeding `presenter`'s queue.
    #[must_use]
    pub fn for_presenter(presenter: &Presenter) -> Self {
        Self::new(Arc::clone(presenter.queue()))
    }

    /// Append structured fields as `key=value` after the message.
    #[must_use]
    pub fn show_fields(mut self, show: bool) -> Self {
        self.show_fields = show;
        self
    }

    fn entry(&self, event: &Event<'_>) -> CaptureEntry {
        let metadata = event.metadata();
        let level = *metadata.level();

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut text = visitor.message.unwrap_or_default();
        if self.show_fields && !visitor.fields.is_empty() {
            for (key, value) in &visitor.fields {
                if !text.is_empty() {
                    text.push(' ');
                }
                let _ = write!(text, "{key}={value}");
            }
        }

        let location = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.to_string(),
            (None, _) => String::new(),
        };
        let origin = Origin::new(printer_name(level), metadata.target(), location);
        CaptureEntry::captured(text, stream_for(level), origin)
    }
}

impl fmt::Debug for CaptureLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureLayer")
            .field("show_fields", &self.show_fields)
            .finish_non_exhaustive()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if is_internal(event.metadata().target()) || IN_LAYER.with(Cell::get) {
            return;
        }
        IN_LAYER.with(|flag| flag.set(true));
        let entry = self.entry(event);
        if let Err(err) = self.queue.push(entry) {
            tracing::debug!(error = %err, "captured event dropped");
        }
        IN_LAYER.with(|flag| flag.set(false));
    }
}
