#![forbid(unsafe_code)]

//! Presenter errors.

use std::io;

/// Errors surfaced by presenter lifecycle and configuration calls.
///
/// Writes that fail inside a tick are logged and skipped instead; only
/// calls that write on the caller's thread return them.
#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),

    /// A frame rate below one frame per second was requested.
    #[error("invalid frame rate {0}: must be at least 1 frame per second")]
    InvalidFrameRate(u32),

    /// Options can only be replaced while the presenter is idle.
    #[error("presenter is running; options can only change while idle")]
    Busy,
}

/// Result alias for presenter operations.
pub type Result<T, E = PresenterError> = std::result::Result<T, E>;
