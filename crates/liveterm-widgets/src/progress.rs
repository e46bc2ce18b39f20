#![forbid(unsafe_code)]

//! Progress bar block.
//!
//! The bar fills its block's width: `|` caps, a filled part drawn in eighth
//! blocks (or `#`), a dashed remainder, and an optional caption on either
//! side.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::style::Color;
use liveterm_document::{BlockDescriptor, BlockPatch, TextStyle};
use liveterm_runtime::{BindingSlot, Block, BlockBinding, BlockController, FrameTick, next_block_id};

/// Eighth-block fill, lightest first.
pub const SOLID: &[char] = &['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
/// ASCII fill.
pub const SHARP: &[char] = &['#'];

const CAP: char = '|';
const EMPTY: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStyle {
    #[default]
    Solid,
    Sharp,
}

impl BarStyle {
    #[must_use]
    pub const fn cells(self) -> &'static [char] {
        match self {
            Self::Solid => SOLID,
            Self::Sharp => SHARP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caption {
    /// `42.00 %`
    #[default]
    Percentage,
    /// `42/100`
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionSide {
    Left,
    #[default]
    Right,
}

/// Bar appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    pub caption: Caption,
    pub caption_side: CaptionSide,
    pub show_caption: bool,
    pub style: BarStyle,
    /// Value that counts as complete. At least 1.
    pub target: f64,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            caption: Caption::Percentage,
            caption_side: CaptionSide::Right,
            show_caption: true,
            style: BarStyle::Solid,
            target: 100.0,
        }
    }
}

fn caption_text(options: &BarOptions, progress: f64) -> String {
    match options.caption {
        Caption::Percentage => format!("{:.2} %", progress / options.target * 100.0),
        Caption::Target => format!("{progress}/{}", options.target),
    }
}

/// Number of fill steps (cells times glyphs per cell) reached at `progress`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn fill_steps(progress: f64, target: f64, usable: usize, glyphs: usize) -> usize {
    let ratio = (progress / target).clamp(0.0, 1.0);
    (ratio * usable as f64 * glyphs as f64).round() as usize
}

/// Lay out the bar text for a block `width` columns wide.
#[must_use]
pub fn render_bar(options: &BarOptions, progress: f64, width: u16) -> String {
    let caption = options.show_caption.then(|| caption_text(options, progress));
    let caption_width = caption.as_ref().map_or(0, |c| c.chars().count() + 1);
    let usable = usize::from(width).saturating_sub(2 + caption_width);

    let cells = options.style.cells();
    let steps = fill_steps(progress, options.target, usable, cells.len());
    let full = steps / cells.len();
    // Single-glyph styles have no partial cell. The partial glyph never pushes
    // the bar past its usable width.
    let partial = cells.len() > 1
        && progress != 0.0
        && progress != options.target
        && full < usable;

    let mut out = String::with_capacity(usize::from(width) * 3);
    if let (Some(caption), CaptionSide::Left) = (&caption, options.caption_side) {
        out.push_str(caption);
        out.push(' ');
    }
    out.push(CAP);
    let filled_cell = cells[cells.len() - 1];
    out.extend(std::iter::repeat_n(filled_cell, full));
    let mut drawn = full;
    if partial {
        out.push(cells[steps % cells.len()]);
        drawn += 1;
    }
    out.extend(std::iter::repeat_n(EMPTY, usable.saturating_sub(drawn)));
    out.push(CAP);
    if let (Some(caption), CaptionSide::Right) = (&caption, options.caption_side) {
        out.push(' ');
        out.push_str(caption);
    }
    out
}

#[derive(Debug, Default)]
struct BarState {
    progress: f64,
    shown: Option<String>,
    width: u16,
}

/// A progress bar controller.
///
/// ```
/// use std::sync::Arc;
/// use liveterm_widgets::{BarStyle, ProgressBar};
///
/// let bar = Arc::new(ProgressBar::new().with_bar_style(BarStyle::Sharp).with_target(20.0));
/// let block = bar.block();
/// # let _ = block;
/// ```
#[derive(Debug)]
pub struct ProgressBar {
    id: String,
    options: BarOptions,
    color: Option<Color>,
    state: Mutex<BarState>,
    binding: BindingSlot,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: next_block_id("progress-bar"),
            options: BarOptions::default(),
            color: None,
            state: Mutex::new(BarState::default()),
            binding: BindingSlot::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BarOptions) -> Self {
        self.options = BarOptions {
            target: options.target.max(1.0),
            ..options
        };
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.options.caption = caption;
        self
    }

    #[must_use]
    pub fn with_caption_side(mut self, side: CaptionSide) -> Self {
        self.options.caption_side = side;
        self
    }

    #[must_use]
    pub fn with_show_caption(mut self, show: bool) -> Self {
        self.options.show_caption = show;
        self
    }

    #[must_use]
    pub fn with_bar_style(mut self, style: BarStyle) -> Self {
        self.options.style = style;
        self
    }

    /// Value that counts as complete. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_target(mut self, target: f64) -> Self {
        self.options.target = target.max(1.0);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<Option<Color>>) -> Self {
        self.color = color.into();
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

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.lock().progress
    }

    /// Move the bar, clamped to `[0, target]`. Redraws immediately if the
    /// text changes.
    ///
    /// # Panics
    ///
    /// Panics if the bar's document has not been built yet.
    pub fn set_progress(&self, progress: f64) {
        let mut state = self.lock();
        state.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, self.options.target)
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(id = %self.id, progress = state.progress, "progress set");
        let width = self.binding.size(&self.id).width;
        self.redraw(&mut state, width);
    }

    fn lock(&self) -> MutexGuard<'_, BarState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn redraw(&self, state: &mut BarState, width: u16) {
        let text = render_bar(&self.options, state.progress, width);
        state.width = width;
        if state.shown.as_deref() != Some(text.as_str()) {
            self.binding.update(&self.id, &BlockPatch::text(text.clone()));
            state.shown = Some(text);
        }
    }
}

impl BlockController for ProgressBar {
    fn descriptor(&self) -> BlockDescriptor {
        BlockDescriptor::new("")
            .with_id(self.id.clone())
            .with_color(self.color)
            .with_style(TextStyle::BOLD)
    }

    fn configure(&self, binding: BlockBinding) {
        self.binding.set(binding);
        // A rebuilt document starts from the descriptor again.
        self.lock().shown = None;
    }

    fn request_update(&self, _tick: &FrameTick) {
        let mut state = self.lock();
        let width = self.binding.size(&self.id).width;
        if state.shown.is_none() || width != state.width {
            self.redraw(&mut state, width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(progress: f64) -> String {
        render_bar(&BarOptions::default(), progress, 80)
    }

    #[test]
    fn empty_bar() {
        assert_eq!(bar(0.0), format!("|{}| 0.00 %", "-".repeat(71)));
    }

    #[test]
    fn half_bar_has_partial_cell() {
        assert_eq!(
            bar(50.0),
            format!("|{}▏{}| 50.00 %", "█".repeat(35), "-".repeat(34))
        );
    }

    #[test]
    fn uneven_progress() {
        assert_eq!(
            bar(88.5),
            format!("|{}▏{}| 88.50 %", "█".repeat(62), "-".repeat(7))
        );
    }

    #[test]
    fn full_bar_has_no_partial_cell() {
        assert_eq!(bar(100.0), format!("|{}| 100.00 %", "█".repeat(69)));
    }

    #[test]
    fn sharp_target_caption_on_the_left() {
        let options = BarOptions {
            caption: Caption::Target,
            caption_side: CaptionSide::Left,
            style: BarStyle::Sharp,
            target: 10.0,
            ..BarOptions::default()
        };
        // usable = 20 - 2 - 5 = 13; 6.5 rounds to 7 cells.
        assert_eq!(render_bar(&options, 5.0, 20), "5/10 |#######------|");
    }

    #[test]
    fn hidden_caption_uses_full_width() {
        let options = BarOptions {
            show_caption: false,
            style: BarStyle::Sharp,
            ..BarOptions::default()
        };
        assert_eq!(render_bar(&options, 100.0, 6), "|####|");
    }

    #[test]
    fn narrow_blocks_do_not_underflow() {
        assert_eq!(bar_width(3), "|| 0.00 %");
    }

    fn bar_width(width: u16) -> String {
        render_bar(&BarOptions::default(), 0.0, width)
    }

    #[test]
    fn partial_cell_never_overflows() {
        let options = BarOptions {
            show_caption: false,
            ..BarOptions::default()
        };
        // 99.99% of 10 cells rounds up to all of them.
        assert_eq!(render_bar(&options, 99.99, 12), format!("|{}|", "█".repeat(10)));
    }

    #[test]
    fn target_is_at_least_one() {
        let bar = ProgressBar::new().with_target(0.0);
        assert!((bar.options.target - 1.0).abs() < f64::EPSILON);
    }
}
