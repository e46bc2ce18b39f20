#![forbid(unsafe_code)]

//! liveterm public facade crate.
//!
//! Re-exports the presenter, documents, and widgets from the internal crates
//! and offers a prelude for day-to-day use.
//!
//! ```no_run
//! use std::sync::Arc;
//! use liveterm::prelude::*;
//!
//! let spinner = Arc::new(Spinner::new());
//! let presenter = Presenter::new(PresenterOptions::default())?;
//! presenter.append_document(
//!     "build",
//!     Document::new(vec![Row::new(vec![spinner.block(), Block::text("building")])]),
//! );
//! presenter.present()?;
//! console_log!("compiled {} crates", 6);
//! spinner.set_status(SpinnerStatus::Complete);
//! presenter.restore().wait();
//! # Ok::<(), liveterm::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use liveterm_core::{AnsiCodes, ControlCodes, DEFAULT_COLUMNS, RawStreams, StdStreams, StreamKind};

// --- Document re-exports ---------------------------------------------------

pub use liveterm_document::{
    Align, BlockDescriptor, BlockPatch, BlockSize, BlockWidth, Color, DocumentRenderer, Padding,
    TextDocument, TextStyle,
};

// --- Runtime re-exports ----------------------------------------------------

pub use liveterm_runtime::{
    BindingSlot, Block, BlockBinding, BlockController, CaptureEntry, CaptureQueue, Console,
    DUPLICATE_WARNING, Document, FrameTick, Origin, Presenter, PresenterBuilder, PresenterError,
    PresenterOptions, PresenterState, RestoreHandle, Row, Scheduler, TerminalArbiter, global,
    next_block_id,
};
pub use liveterm_runtime::{
    console_debug, console_error, console_info, console_log, console_warn,
};

#[cfg(feature = "tracing-capture")]
pub use liveterm_runtime::CaptureLayer;

// --- Widget re-exports -----------------------------------------------------

#[cfg(feature = "widgets")]
pub use liveterm_widgets::{
    BarStyle, Caption, CaptionSide, Clock, ProgressBar, Side, Spinner, SpinnerStatus,
    SpinnerStyle, Stopwatch, SystemClock,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for liveterm apps.
#[derive(Debug)]
pub enum Error {
    /// Presenter lifecycle or configuration failure.
    Presenter(PresenterError),
    /// I/O failure outside the presenter.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presenter(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Presenter(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<PresenterError> for Error {
    fn from(err: PresenterError) -> Self {
        Self::Presenter(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for liveterm APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Block, BlockController, BlockDescriptor, BlockPatch, BlockWidth, Color, Document, Error,
        Padding, Presenter, PresenterOptions, Result, Row, TextStyle,
    };
    pub use crate::{console_error, console_info, console_log, console_warn};

    #[cfg(feature = "widgets")]
    pub use crate::{ProgressBar, Spinner, SpinnerStatus, Stopwatch};

    pub use crate::{core, document, runtime};
    #[cfg(feature = "widgets")]
    pub use crate::widgets;
}

pub use liveterm_core as core;
pub use liveterm_document as document;
pub use liveterm_runtime as runtime;
#[cfg(feature = "widgets")]
pub use liveterm_widgets as widgets;
