#![forbid(unsafe_code)]

//! Elapsed-time and countdown block.

use std::sync::{Arc, Mutex, PoisonError};

use liveterm_document::{BlockDescriptor, BlockPatch, BlockWidth, TextStyle};
use liveterm_runtime::{BindingSlot, Block, BlockBinding, BlockController, FrameTick, next_block_id};

use crate::clock::{Clock, SystemClock};

const SECOND: u64 = 1_000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format a span as `DDd HHh MMm SSs`.
///
/// Zero units are left out; seconds are kept when nothing else is shown.
///
/// ```
/// use liveterm_widgets::format_span;
///
/// assert_eq!(format_span(0), "00s");
/// assert_eq!(format_span(65_000), "01m 05s");
/// assert_eq!(format_span(86_405_000), "01d 05s");
/// ```
#[must_use]
pub fn format_span(millis: u64) -> String {
    let units = [
        (millis / DAY, 'd'),
        (millis % DAY / HOUR, 'h'),
        (millis % HOUR / MINUTE, 'm'),
    ];
    let seconds = millis % MINUTE / SECOND;

    let mut parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value:02}{unit}"))
        .collect();
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds:02}s"));
    }
    parts.join(" ")
}

/// Counts up from a start time, or down to a target time.
pub struct Stopwatch {
    id: String,
    clock: Arc<dyn Clock>,
    /// `None` when the start time was not given explicitly.
    initial_time: Option<u64>,
    created_at: u64,
    target_time: Option<u64>,
    shown: Mutex<Option<String>>,
    binding: BindingSlot,
}

impl std::fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stopwatch")
            .field("id", &self.id)
            .field("initial_time", &self.initial_time)
            .field("target_time", &self.target_time)
            .finish_non_exhaustive()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// A stopwatch on the system clock, started now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let created_at = clock.now_ms();
        Self {
            id: next_block_id("stopwatch"),
            clock,
            initial_time: None,
            created_at,
            target_time: None,
            shown: Mutex::new(None),
            binding: BindingSlot::new(),
        }
    }

    /// Count from this time (ms since the epoch) instead of construction.
    #[must_use]
    pub fn with_initial_time(mut self, millis: u64) -> Self {
        self.initial_time = Some(millis);
        self
    }

    /// Count down to this time (ms since the epoch).
    #[must_use]
    pub fn with_target_time(mut self, millis: u64) -> Self {
        self.target_time = Some(millis);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn block(self: &Arc<Self>) -> Block {
        Block::controlled(Arc::clone(self) as Arc<dyn BlockController>)
    }

    /// The span shown at `now`, in milliseconds.
    ///
    /// A countdown that has run past its target shows the whole span between
    /// the start and the target when a start time was given, and zero
    /// otherwise.
    #[must_use]
    pub fn span_at(&self, now: u64) -> u64 {
        match (self.target_time, self.initial_time) {
            (Some(target), Some(initial)) if now > target => target.saturating_sub(initial),
            (Some(target), _) => target.saturating_sub(now),
            (None, initial) => now.saturating_sub(initial.unwrap_or(self.created_at)),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        format_span(self.span_at(self.clock.now_ms()))
    }
}

impl BlockController for Stopwatch {
    fn descriptor(&self) -> BlockDescriptor {
        BlockDescriptor::new("00s")
            .with_id(self.id.clone())
            .with_style(TextStyle::BOLD)
            .with_width(BlockWidth::Fit)
    }

    fn configure(&self, binding: BlockBinding) {
        self.binding.set(binding);
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn request_update(&self, _tick: &FrameTick) {
        let text = self.text();
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if shown.as_deref() != Some(text.as_str()) {
            self.binding.update(&self.id, &BlockPatch::text(text.clone()));
            *shown = Some(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TARGET: u64 = DAY + HOUR + 8 * MINUTE + 5 * SECOND;

    #[test]
    fn formats_units() {
        assert_eq!(format_span(999), "00s");
        assert_eq!(format_span(SECOND), "01s");
        assert_eq!(format_span(HOUR + 8 * MINUTE + 5 * SECOND), "01h 08m 05s");
        assert_eq!(format_span(DAY + HOUR + 7 * MINUTE), "01d 01h 07m");
        assert_eq!(format_span(TARGET), "01d 01h 08m 05s");
        assert_eq!(format_span(100 * DAY), "100d");
    }

    #[test]
    fn forward_counts_from_construction() {
        let clock = Arc::new(ManualClock::new(10_000));
        let watch = Stopwatch::with_clock(clock.clone());
        assert_eq!(watch.text(), "00s");
        clock.advance(65_000);
        assert_eq!(watch.text(), "01m 05s");
    }

    #[test]
    fn forward_before_start_is_zero() {
        let clock = Arc::new(ManualClock::new(0));
        let watch = Stopwatch::with_clock(clock).with_initial_time(5_000);
        assert_eq!(watch.text(), "00s");
    }

    #[test]
    fn countdown_without_start_stops_at_zero() {
        let clock = Arc::new(ManualClock::new(0));
        let watch = Stopwatch::with_clock(clock.clone()).with_target_time(TARGET);
        assert_eq!(watch.text(), "01d 01h 08m 05s");
        clock.set(TARGET + 45_645_489_745);
        assert_eq!(watch.text(), "00s");
    }

    #[test]
    fn countdown_with_start_shows_span_once_past() {
        let clock = Arc::new(ManualClock::new(0));
        let watch = Stopwatch::with_clock(clock.clone())
            .with_initial_time(1_000)
            .with_target_time(61_000);
        clock.set(31_000);
        assert_eq!(watch.text(), "30s");
        clock.set(61_000);
        assert_eq!(watch.text(), "00s");
        clock.set(70_000);
        assert_eq!(watch.text(), "01m");
    }

    #[test]
    fn descriptor_fits_its_text() {
        let descriptor = Stopwatch::new().descriptor();
        assert_eq!(descriptor.text, "00s");
        assert_eq!(descriptor.width, BlockWidth::Fit);
        assert_eq!(descriptor.style, TextStyle::BOLD);
    }
}
