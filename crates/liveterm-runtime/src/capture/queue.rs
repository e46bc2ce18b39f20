#![forbid(unsafe_code)]

//! FIFO buffer of output attempts.
//!
//! While the presenter owns the terminal the queue *holds*: everything pushed
//! waits until the render loop drains it between frames. While idle, pushes
//! are printed immediately. Printing always happens under the queue lock, so
//! entries reach the terminal in push order even when a hold is released
//! while other threads keep pushing.

use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use super::decorate::EntryPrinter;
use super::entry::CaptureEntry;

#[derive(Debug, Default)]
struct QueueState {
    entries: VecDeque<CaptureEntry>,
    holding: bool,
}

/// The capture queue. Shared between the console hub and the render loop.
#[derive(Debug)]
pub struct CaptureQueue {
    state: Mutex<QueueState>,
    printer: EntryPrinter,
}

impl CaptureQueue {
    #[must_use]
    pub fn new(printer: EntryPrinter) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            printer,
        }
    }

    #[must_use]
    pub fn printer(&self) -> &EntryPrinter {
        &self.printer
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an entry, or print it right away if the queue is not holding.
    pub fn push(&self, entry: CaptureEntry) -> io::Result<()> {
        let mut state = self.lock();
        if state.holding {
            state.entries.push_back(entry);
            Ok(())
        } else {
            self.printer.print(&entry)
        }
    }

    /// Queue an explicit, undecorated print.
    pub fn push_direct(&self, text: impl Into<String>) -> io::Result<()> {
        self.push(CaptureEntry::direct(text))
    }

    /// Start holding entries.
    pub fn hold(&self) {
        self.lock().holding = true;
    }

    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.lock().holding
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Remove up to `limit` entries (`None` = all) and hand them to `flush`
    /// together with the printer. `flush` runs under the queue lock and only
    /// when at least one entry was taken.
    ///
    /// Returns how many entries were taken.
    pub fn drain_with<F>(&self, limit: Option<usize>, flush: F) -> io::Result<usize>
    where
        F: FnOnce(&EntryPrinter, &[CaptureEntry]) -> io::Result<()>,
    {
        let mut state = self.lock();
        let count = limit.map_or(state.entries.len(), |n| n.min(state.entries.len()));
        if count == 0 {
            return Ok(0);
        }
        let taken: Vec<CaptureEntry> = state.entries.drain(..count).collect();
        flush(&self.printer, &taken)?;
        Ok(count)
    }

    /// Stop holding and flush every remaining entry through `flush`, as one
    /// step: no push can print between the two.
    pub fn release_hold_with<F>(&self, flush: F) -> io::Result<usize>
    where
        F: FnOnce(&EntryPrinter, &[CaptureEntry]) -> io::Result<()>,
    {
        let mut state = self.lock();
        state.holding = false;
        let taken: Vec<CaptureEntry> = state.entries.drain(..).collect();
        if taken.is_empty() {
            return Ok(0);
        }
        flush(&self.printer, &taken)?;
        Ok(taken.len())
    }

    /// Like [`release_hold_with`](Self::release_hold_with), but gives up
    /// instead of blocking when the queue is locked. Returns `None` then.
    ///
    /// Used from panic and signal restore paths, where the lock holder may be
    /// the thread that is going down.
    pub fn try_release_hold_with<F>(&self, flush: F) -> Option<io::Result<usize>>
    where
        F: FnOnce(&EntryPrinter, &[CaptureEntry]) -> io::Result<()>,
    {
        let mut state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        state.holding = false;
        let taken: Vec<CaptureEntry> = state.entries.drain(..).collect();
        if taken.is_empty() {
            return Some(Ok(0));
        }
        Some(flush(&self.printer, &taken).map(|()| taken.len()))
    }
}

/// Print every entry in order.
pub fn print_all(printer: &EntryPrinter, entries: &[CaptureEntry]) -> io::Result<()> {
    entries.iter().try_for_each(|entry| printer.print(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::decorate::Decoration;
    use liveterm_core::StreamKind;
    use liveterm_core::testing::RecordingStreams;
    use std::sync::Arc;

    fn queue() -> (Arc<RecordingStreams>, CaptureQueue) {
        let streams = Arc::new(RecordingStreams::new());
        let queue = CaptureQueue::new(EntryPrinter::new(streams.clone(), Decoration::default()));
        (streams, queue)
    }

    #[test]
    fn idle_push_prints_immediately() {
        let (streams, queue) = queue();
        queue.push_direct("now").unwrap();
        assert_eq!(streams.output(StreamKind::Stdout), "now\n");
        assert!(queue.is_empty());
    }

    #[test]
    fn holding_push_waits() {
        let (streams, queue) = queue();
        queue.hold();
        queue.push_direct("later").unwrap();
        assert!(streams.writes().is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_respects_limit_and_order() {
        let (streams, queue) = queue();
        queue.hold();
        for text in ["a", "b", "c"] {
            queue.push_direct(text).unwrap();
        }
        assert_eq!(queue.drain_with(Some(2), print_all).unwrap(), 2);
        assert_eq!(streams.output(StreamKind::Stdout), "a\nb\n");
        assert_eq!(queue.drain_with(None, print_all).unwrap(), 1);
        assert_eq!(streams.output(StreamKind::Stdout), "a\nb\nc\n");
        assert_eq!(queue.drain_with(None, |_, _| panic!("not called")).unwrap(), 0);
    }

    #[test]
    fn release_hold_flushes_everything() {
        let (streams, queue) = queue();
        queue.hold();
        queue.push_direct("a").unwrap();
        queue.push_direct("b").unwrap();
        assert_eq!(queue.release_hold_with(print_all).unwrap(), 2);
        assert!(!queue.is_holding());
        queue.push_direct("c").unwrap();
        assert_eq!(streams.output(StreamKind::Stdout), "a\nb\nc\n");
    }
}
