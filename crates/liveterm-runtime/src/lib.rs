#![forbid(unsafe_code)]

//! Runtime: the live region.
//!
//! A [`Presenter`] keeps a set of [`Document`]s pinned to the bottom of the
//! terminal and redraws them at a fixed frame rate, rewriting only the lines
//! that changed. Everything the program prints while the region is live is
//! captured, queued, and printed above it between frames, so logs scroll by
//! while progress bars and spinners stay put.
//!
//! # Pieces
//!
//! - [`capture`]: the console hub, origin attribution, and the capture queue.
//! - [`BlockController`]: the protocol animated blocks implement.
//! - [`DocumentRegistry`]: registered documents in screen order.
//! - [`RenderLoop`]: the diffing pass that moves the terminal between frames.
//! - [`Presenter`]: lifecycle, scheduling, arbitration, and restoration.
//! - [`global`]: module-level functions over one process-wide presenter.
//!
//! # Example
//!
//! ```no_run
//! use liveterm_runtime::{Block, Document, Presenter, PresenterOptions, console_log};
//!
//! let presenter = Presenter::new(PresenterOptions::default())?;
//! presenter.append_document("job", Document::single(Block::text("compiling")));
//! presenter.present()?;
//! console_log!("step {} done", 1);
//! presenter.restore().wait();
//! # Ok::<(), liveterm_runtime::PresenterError>(())
//! ```

pub mod capture;
pub mod controller;
pub mod document;
pub mod error;
pub mod global;
pub mod options;
pub mod presenter;
pub mod registry;
pub mod render;
#[cfg(feature = "tracing-capture")]
pub mod tracing_layer;

pub use capture::{CaptureEntry, CaptureQueue, Console, Origin};
pub use controller::{BindingSlot, BlockBinding, BlockController, FrameTick, next_block_id};
pub use document::{Block, Document, Row};
pub use error::{PresenterError, Result};
pub use options::{DISABLE_ENV, PresenterOptions, Scheduler};
pub use presenter::{
    DUPLICATE_WARNING, Presenter, PresenterBuilder, PresenterState, RestoreHandle,
    TerminalArbiter,
};
pub use registry::{DocumentRegistry, RendererFactory, text_document_factory};
pub use render::{PassStats, RenderLoop};
#[cfg(feature = "tracing-capture")]
pub use tracing_layer::CaptureLayer;

#[doc(hidden)]
pub mod __private {
    pub use liveterm_core::StreamKind;
}
