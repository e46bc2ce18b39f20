#![forbid(unsafe_code)]

//! Terminal queries.

use crossterm::tty::IsTty;

/// Column count assumed when the terminal size cannot be determined.
pub const DEFAULT_COLUMNS: u16 = 80;

/// Current width of the controlling terminal, or [`DEFAULT_COLUMNS`].
#[must_use]
pub fn columns() -> u16 {
    match crossterm::terminal::size() {
        Ok((0, _)) | Err(_) => DEFAULT_COLUMNS,
        Ok((cols, _)) => cols,
    }
}

/// Whether standard output is attached to a terminal.
#[must_use]
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_tty()
}
