#![forbid(unsafe_code)]

//! Printing captured entries, with optional origin headers.
//!
//! A decorated entry is preceded by one header line:
//!
//! ```text
//! console.warn at app::worker ./src/worker.rs:42
//! ```
//!
//! `console.` and `at` are dim. The printer name, the caller, and the final
//! `file:line` path component share one colour: by stream (cyan stdout, red
//! stderr) or, with level colours on, by printer name.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crossterm::style::{Color, Stylize};
use liveterm_core::{RawStreams, StreamKind};

use super::entry::{CaptureEntry, Origin};

/// Header rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub enabled: bool,
    pub relative_paths: bool,
    pub level_colors: bool,
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            enabled: true,
            relative_paths: true,
            level_colors: false,
        }
    }
}

/// Writes entries to the raw streams.
pub struct EntryPrinter {
    streams: Arc<dyn RawStreams>,
    decoration: RwLock<Decoration>,
    cwd: Option<PathBuf>,
}

impl std::fmt::Debug for EntryPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPrinter")
            .field("decoration", &self.decoration())
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

impl EntryPrinter {
    #[must_use]
    pub fn new(streams: Arc<dyn RawStreams>, decoration: Decoration) -> Self {
        Self {
            streams,
            decoration: RwLock::new(decoration),
            cwd: std::env::current_dir().ok(),
        }
    }

    /// Resolve relative header paths against `cwd` instead of the process
    /// working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    #[must_use]
    pub fn decoration(&self) -> Decoration {
        *self.decoration.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_decoration(&self, decoration: Decoration) {
        *self.decoration.write().unwrap_or_else(PoisonError::into_inner) = decoration;
    }

    #[must_use]
    pub fn streams(&self) -> &Arc<dyn RawStreams> {
        &self.streams
    }

    /// Print one entry on its stream.
    ///
    /// One trailing newline of the payload is dropped so that `println`-style
    /// writes do not leave an empty line behind.
    pub fn print(&self, entry: &CaptureEntry) -> io::Result<()> {
        let text = entry.text.strip_suffix('\n').unwrap_or(&entry.text);
        let mut out = String::with_capacity(text.len() + 64);
        if let Some(header) = self.header(entry) {
            out.push_str(&header);
            out.push('\n');
        }
        out.push_str(text);
        out.push('\n');
        self.streams.write_str(entry.stream, &out)
    }

    /// The header line for an entry, if it gets one.
    ///
    /// Direct entries, disabled decoration, and entries whose origin has no
    /// source location all print without a header.
    #[must_use]
    pub fn header(&self, entry: &CaptureEntry) -> Option<String> {
        let decoration = self.decoration();
        if entry.direct || !decoration.enabled {
            return None;
        }
        let origin = entry.origin.as_ref().filter(|o| !o.location.is_empty())?;
        Some(self.render_header(origin, entry.stream, decoration))
    }

    fn render_header(&self, origin: &Origin, stream: StreamKind, decoration: Decoration) -> String {
        let color = if decoration.level_colors {
            level_color(&origin.printer).unwrap_or_else(|| stream_color(stream))
        } else {
            stream_color(stream)
        };

        let (dir, last) = self.split_location(&origin.location, decoration.relative_paths);

        let mut header = format!(
            "{}{} {}",
            "console.".dim(),
            origin.printer.as_str().with(color),
            "at".dim()
        );
        if !origin.caller.is_empty() {
            header.push(' ');
            header.push_str(&origin.caller.as_str().with(color).to_string());
        }
        header.push(' ');
        if !dir.is_empty() {
            header.push_str(&dir.as_str().dim().to_string());
        }
        header.push_str(&last.as_str().with(color).to_string());
        header
    }

    /// Split a `path:line` location into its directory part (with trailing
    /// separator) and its final component.
    fn split_location(&self, location: &str, relative: bool) -> (String, String) {
        let shown = if relative {
            self.relativize(location)
        } else {
            self.absolutize(location)
        };
        match shown.rfind(['/', '\\']) {
            Some(idx) => (shown[..=idx].to_string(), shown[idx + 1..].to_string()),
            None => (String::new(), shown),
        }
    }

    fn relativize(&self, location: &str) -> String {
        let path = Path::new(location);
        let stripped = match &self.cwd {
            Some(cwd) if path.is_absolute() => path
                .strip_prefix(cwd)
                .map(|rest| rest.to_string_lossy().into_owned())
                .ok(),
            _ => None,
        };
        match stripped {
            Some(rest) => format!("./{rest}"),
            None if path.is_absolute() => location.to_string(),
            None => format!("./{}", location.trim_start_matches("./")),
        }
    }

    fn absolutize(&self, location: &str) -> String {
        match &self.cwd {
            Some(cwd) if !Path::new(location).is_absolute() => {
                cwd.join(location).to_string_lossy().into_owned()
            }
            _ => location.to_string(),
        }
    }
}

fn stream_color(stream: StreamKind) -> Color {
    match stream {
        StreamKind::Stdout => Color::Cyan,
        StreamKind::Stderr => Color::Red,
    }
}

fn level_color(printer: &str) -> Option<Color> {
    match printer {
        "error" => Some(Color::Red),
        "warn" => Some(Color::Yellow),
        "info" => Some(Color::Green),
        "debug" => Some(Color::Magenta),
        "log" => Some(Color::Cyan),
        "trace" => Some(Color::Blue),
        _ => None,
    }
}
