#![forbid(unsafe_code)]

//! Process-wide presenter.
//!
//! These functions forward to one lazily built [`Presenter`] on the real
//! terminal, for programs that want a single live region without threading a
//! handle around. The instance is created on first use with default options
//! and claims the global [`TerminalArbiter`](crate::TerminalArbiter); if
//! another presenter already holds it, every call here is a no-op.
//!
//! ```no_run
//! use liveterm_runtime::{global, Block, Document};
//!
//! global::append_document("status", Document::single(Block::text("syncing")));
//! global::present()?;
//! liveterm_runtime::console_log!("visible above the region");
//! global::restore().wait();
//! # Ok::<(), liveterm_runtime::PresenterError>(())
//! ```

use std::sync::OnceLock;

use crate::document::Document;
use crate::error::Result;
use crate::options::PresenterOptions;
use crate::presenter::{Presenter, PresenterState, RestoreHandle};

static PRESENTER: OnceLock<Presenter> = OnceLock::new();

/// The process-wide presenter, built on first use.
pub fn presenter() -> &'static Presenter {
    PRESENTER.get_or_init(|| Presenter::builder().assemble())
}

/// Replace the options. Only allowed while idle.
pub fn configure(options: PresenterOptions) -> Result<()> {
    presenter().configure(options)
}

pub fn present() -> Result<()> {
    presenter().present()
}

pub fn restore() -> RestoreHandle {
    presenter().restore()
}

#[must_use]
pub fn state() -> PresenterState {
    presenter().state()
}

pub fn append_document(id: impl Into<String>, document: Document) -> bool {
    presenter().append_document(id, document)
}

pub fn prepend_document(id: impl Into<String>, document: Document) -> bool {
    presenter().prepend_document(id, document)
}

pub fn update_document(id: &str, document: Document) -> bool {
    presenter().update_document(id, document)
}

pub fn remove_document(id: &str) -> bool {
    presenter().remove_document(id)
}

pub fn clear_documents() {
    presenter().clear_documents();
}

pub fn print(text: impl Into<String>) -> Result<()> {
    presenter().print(text)
}

pub fn print_document(document: Document) -> Result<()> {
    presenter().print_document(document)
}

pub fn capture_output() -> bool {
    presenter().capture_output()
}

pub fn release_output() -> bool {
    presenter().release_output()
}

pub fn clear_screen() -> Result<()> {
    presenter().clear_screen()
}
