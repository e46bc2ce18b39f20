#![forbid(unsafe_code)]

//! Core: terminal control codes, raw output streams, and terminal lifecycle.
//!
//! Everything in this crate is stateless with respect to rendering. The
//! runtime crate owns the animated region; this crate only knows how to talk
//! to the terminal and how to put it back the way it was found.

pub mod control;
pub mod session;
pub mod streams;
pub mod terminal;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use control::{AnsiCodes, ControlCodes};
pub use streams::{RawStreams, StdStreams, StreamKind};
pub use terminal::DEFAULT_COLUMNS;
