#![forbid(unsafe_code)]

//! Deterministic doubles for control codes and output streams.
//!
//! Enabled by the `test-helpers` feature. [`MarkerCodes`] replaces escape
//! sequences with readable markers so frame assertions read like the
//! operations they check; [`RecordingStreams`] keeps every write in order.

use std::io;
use std::sync::{Mutex, PoisonError};

use crate::control::ControlCodes;
use crate::streams::{RawStreams, StreamKind};

/// Control codes rendered as human-readable markers.
///
/// | Operation | Marker |
/// |-----------|--------|
/// | `hide_cursor` | `cursorHide` |
/// | `show_cursor` | `cursorShow` |
/// | `erase_line` | `eraseLine` |
/// | `erase_down` | `eraseDown` |
/// | `cursor_move(x, y)` | `cursorMove(x,y)` |
/// | `clear_screen` | `clearTerminal` |
#[derive(Debug, Clone, Copy)]
pub struct MarkerCodes {
    columns: u16,
}

impl MarkerCodes {
    /// Markers for a terminal of the given width.
    #[must_use]
    pub const fn new(columns: u16) -> Self {
        Self { columns }
    }
}

impl Default for MarkerCodes {
    fn default() -> Self {
        Self::new(crate::terminal::DEFAULT_COLUMNS)
    }
}

impl ControlCodes for MarkerCodes {
    fn hide_cursor(&self) -> String {
        "cursorHide".into()
    }

    fn show_cursor(&self) -> String {
        "cursorShow".into()
    }

    fn erase_line(&self) -> String {
        "eraseLine".into()
    }

    fn erase_down(&self) -> String {
        "eraseDown".into()
    }

    fn cursor_move(&self, dx: i32, dy: i32) -> String {
        format!("cursorMove({dx},{dy})")
    }

    fn clear_screen(&self) -> String {
        "clearTerminal".into()
    }

    fn columns(&self) -> u16 {
        self.columns
    }
}

/// Streams that record every write instead of emitting it.
#[derive(Debug, Default)]
pub struct RecordingStreams {
    writes: Mutex<Vec<(StreamKind, String)>>,
}

impl RecordingStreams {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(StreamKind, String)> {
        self.lock().clone()
    }

    /// Writes to one stream, in order.
    #[must_use]
    pub fn writes_to(&self, kind: StreamKind) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Everything written to one stream, concatenated.
    #[must_use]
    pub fn output(&self, kind: StreamKind) -> String {
        self.writes_to(kind).concat()
    }

    /// Return and forget everything recorded so far.
    pub fn take(&self) -> Vec<(StreamKind, String)> {
        std::mem::take(&mut *self.lock())
    }

    /// Return and forget the recorded stdout writes, dropping stderr ones.
    pub fn take_stdout(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .filter(|(k, _)| *k == StreamKind::Stdout)
            .map(|(_, text)| text)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(StreamKind, String)>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RawStreams for RecordingStreams {
    fn write_bytes(&self, kind: StreamKind, bytes: &[u8]) -> io::Result<()> {
        self.lock()
            .push((kind, String::from_utf8_lossy(bytes).into_owned()));
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers() {
        let codes = MarkerCodes::new(40);
        assert_eq!(codes.cursor_move(-999, -1), "cursorMove(-999,-1)");
        assert_eq!(codes.columns(), 40);
    }

    #[test]
    fn recorder_keeps_order_and_stream() {
        let streams = RecordingStreams::new();
        streams.write_str(StreamKind::Stdout, "a").unwrap();
        streams.write_str(StreamKind::Stderr, "b").unwrap();
        streams.write_str(StreamKind::Stdout, "").unwrap();
        assert_eq!(
            streams.writes(),
            vec![
                (StreamKind::Stdout, "a".to_string()),
                (StreamKind::Stderr, "b".to_string())
            ]
        );
        assert_eq!(streams.take_stdout(), vec!["a".to_string()]);
        assert!(streams.writes().is_empty());
    }
}
