#![forbid(unsafe_code)]

//! The diffing render pass.
//!
//! The live region is the block of lines at the bottom of the output that
//! the presenter owns. Between passes the cursor rests at column 0 of the
//! region's first line. A pass:
//!
//! 1. Drains queued log entries. If any were printed, the region is erased
//!    first and every line is treated as changed, since the logs now occupy
//!    the rows the region used to.
//! 2. Rewrites only the lines that differ from the previous pass, stepping
//!    down over the unchanged ones.
//! 3. Erases what is left below the region when it shrank.
//! 4. Moves the cursor back to the region's first line.
//!
//! Each control sequence and each line is a separate write, so a recording
//! stream sees one entry per terminal operation.

use std::io;
use std::sync::Arc;

use liveterm_core::{ControlCodes, RawStreams, StreamKind};

use crate::capture::{CaptureQueue, print_all};

/// Moves the cursor to column 0 whatever the current column is.
const TO_LINE_START: i32 = -999;

/// What one pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Log entries printed above the region.
    pub logs: usize,
    /// Lines rewritten.
    pub lines_written: usize,
    /// Height of the region after the pass.
    pub height: usize,
}

/// Render state carried between passes.
pub struct RenderLoop {
    codes: Arc<dyn ControlCodes>,
    streams: Arc<dyn RawStreams>,
    previous: Vec<String>,
    force_full: bool,
}

impl std::fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("height", &self.previous.len())
            .field("force_full", &self.force_full)
            .finish_non_exhaustive()
    }
}

impl RenderLoop {
    #[must_use]
    pub fn new(codes: Arc<dyn ControlCodes>, streams: Arc<dyn RawStreams>) -> Self {
        Self {
            codes,
            streams,
            previous: Vec::new(),
            force_full: false,
        }
    }

    /// Lines on screen after the last pass.
    #[must_use]
    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    /// Forget the previous frame without touching the terminal.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.force_full = false;
    }

    /// Make the next pass erase the region and redraw every line, e.g.
    /// after a resize reflowed the terminal.
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    fn out(&self, text: &str) -> io::Result<()> {
        self.streams.write_str(StreamKind::Stdout, text)
    }

    /// Print up to `limit` queued entries above the region. Returns how many
    /// were printed.
    pub fn drain_logs(&mut self, queue: &CaptureQueue, limit: Option<usize>) -> io::Result<usize> {
        let erase = self.codes.erase_down();
        let streams = Arc::clone(&self.streams);
        queue.drain_with(limit, |printer, entries| {
            streams.write_str(StreamKind::Stdout, &erase)?;
            print_all(printer, entries)
        })
    }

    /// Bring the terminal from the previous frame to `lines`.
    pub fn pass(&mut self, queue: &CaptureQueue, limit: Option<usize>, lines: Vec<String>) -> io::Result<PassStats> {
        let logs = self.drain_logs(queue, limit)?;
        let mut full = logs > 0;
        if self.force_full {
            self.force_full = false;
            if !full {
                self.out(&self.codes.erase_down())?;
            }
            full = true;
        }
        if full {
            // Whatever was on screen is gone or scrolled away.
            self.previous.clear();
        }

        let lines_written = self.draw(&lines, full)?;
        self.previous = lines;
        self.streams.flush()?;
        Ok(PassStats {
            logs,
            lines_written,
            height: self.previous.len(),
        })
    }

    fn draw(&self, lines: &[String], full: bool) -> io::Result<usize> {
        let count = lines.len();
        let previous = self.previous.len();

        if count == 0 {
            if previous > 0 {
                self.out(&self.codes.erase_down())?;
            }
            return Ok(0);
        }

        let mut written = 0;
        for (index, line) in lines.iter().enumerate() {
            let last = index + 1 == count;
            let changed = full || self.previous.get(index) != Some(line);
            if changed {
                self.out(&self.codes.erase_line())?;
                self.out(line)?;
                if !last {
                    self.out("\n")?;
                }
                written += 1;
            } else if !last {
                self.out(&self.codes.cursor_move(0, 1))?;
            }
        }

        let up = to_rows(count - 1);
        if previous > count {
            // The cursor is on the last live line; erase only below it.
            self.out(&self.codes.cursor_move(TO_LINE_START, 1))?;
            self.out(&self.codes.erase_down())?;
            self.out(&self.codes.cursor_move(TO_LINE_START, -up - 1))?;
        } else {
            self.out(&self.codes.cursor_move(TO_LINE_START, -up))?;
        }
        Ok(written)
    }
}

fn to_rows(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Decoration, EntryPrinter};
    use liveterm_core::testing::{MarkerCodes, RecordingStreams};

    fn setup() -> (Arc<RecordingStreams>, CaptureQueue, RenderLoop) {
        let streams = Arc::new(RecordingStreams::new());
        let queue = CaptureQueue::new(EntryPrinter::new(streams.clone(), Decoration::default()));
        queue.hold();
        let render = RenderLoop::new(Arc::new(MarkerCodes::default()), streams.clone());
        (streams, queue, render)
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn first_frame_writes_every_line() {
        let (streams, queue, mut render) = setup();
        let stats = render.pass(&queue, None, lines(&["a", "b"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["eraseLine", "a", "\n", "eraseLine", "b", "cursorMove(-999,-1)"]
        );
        assert_eq!(stats.lines_written, 2);
        assert_eq!(stats.height, 2);
    }

    #[test]
    fn unchanged_lines_are_skipped() {
        let (streams, queue, mut render) = setup();
        render.pass(&queue, None, lines(&["a", "b", "c"])).unwrap();
        streams.take();
        render.pass(&queue, None, lines(&["a", "B", "c"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["cursorMove(0,1)", "eraseLine", "B", "\n", "cursorMove(-999,-2)"]
        );
        render.pass(&queue, None, lines(&["a", "B", "c"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["cursorMove(0,1)", "cursorMove(0,1)", "cursorMove(-999,-2)"]
        );
    }

    #[test]
    fn shrinking_erases_below_the_last_line() {
        let (streams, queue, mut render) = setup();
        render.pass(&queue, None, lines(&["a", "b"])).unwrap();
        streams.take();
        render.pass(&queue, None, lines(&["a"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["cursorMove(-999,1)", "eraseDown", "cursorMove(-999,-1)"]
        );
    }

    #[test]
    fn emptying_erases_region_once() {
        let (streams, queue, mut render) = setup();
        render.pass(&queue, None, lines(&["a"])).unwrap();
        streams.take();
        render.pass(&queue, None, Vec::new()).unwrap();
        assert_eq!(streams.take_stdout(), ["eraseDown"]);
        render.pass(&queue, None, Vec::new()).unwrap();
        assert!(streams.take_stdout().is_empty());
    }

    #[test]
    fn logs_force_full_redraw() {
        let (streams, queue, mut render) = setup();
        render.pass(&queue, None, lines(&["a"])).unwrap();
        streams.take();
        queue.push_direct("log").unwrap();
        let stats = render.pass(&queue, None, lines(&["a"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["eraseDown", "log\n", "eraseLine", "a", "cursorMove(-999,0)"]
        );
        assert_eq!(stats.logs, 1);
    }

    #[test]
    fn log_limit_leaves_rest_queued() {
        let (_, queue, mut render) = setup();
        for text in ["1", "2", "3"] {
            queue.push_direct(text).unwrap();
        }
        let stats = render.pass(&queue, Some(2), Vec::new()).unwrap();
        assert_eq!(stats.logs, 2);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn invalidate_erases_and_redraws() {
        let (streams, queue, mut render) = setup();
        render.pass(&queue, None, lines(&["a"])).unwrap();
        streams.take();
        render.invalidate();
        render.pass(&queue, None, lines(&["a"])).unwrap();
        assert_eq!(
            streams.take_stdout(),
            ["eraseDown", "eraseLine", "a", "cursorMove(-999,0)"]
        );
    }
}
