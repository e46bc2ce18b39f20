#![forbid(unsafe_code)]

use liveterm_core::StreamKind;

/// Where a captured console call came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Console method name: `log`, `info`, `warn`, `error`, `debug`, ...
    pub printer: String,
    /// The calling function or module. May be empty.
    pub caller: String,
    /// `path:line` of the call. Empty when unknown.
    pub location: String,
}

impl Origin {
    #[must_use]
    pub fn new(
        printer: impl Into<String>,
        caller: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            printer: printer.into(),
            caller: caller.into(),
            location: location.into(),
        }
    }
}

/// One output attempt waiting in (or passing through) the capture queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEntry {
    pub text: String,
    pub stream: StreamKind,
    /// Explicit presenter prints. Never decorated.
    pub direct: bool,
    pub origin: Option<Origin>,
}

impl CaptureEntry {
    /// An explicit print to stdout.
    #[must_use]
    pub fn direct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stream: StreamKind::Stdout,
            direct: true,
            origin: None,
        }
    }

    /// An intercepted console call.
    #[must_use]
    pub fn captured(text: impl Into<String>, stream: StreamKind, origin: Origin) -> Self {
        Self {
            text: text.into(),
            stream,
            direct: false,
            origin: Some(origin),
        }
    }
}
