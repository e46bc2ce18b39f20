#![forbid(unsafe_code)]

//! Loading spinner block.
//!
//! Cycles through a glyph set once per second of frames (faster with
//! `speed`), and can be switched to a final status glyph at any time.

use std::sync::{Arc, Mutex, PoisonError};

use crossterm::style::Color;
use liveterm_document::{BlockDescriptor, BlockPatch, BlockWidth, Padding, TextStyle};
use liveterm_runtime::{BindingSlot, Block, BlockBinding, BlockController, FrameTick, next_block_id};

/// Braille square frames.
pub const SQUARE: &[&str] = &["⣷", "⣯", "⣟", "⡿", "⢿", "⣻", "⣽", "⣾"];
/// Star frames.
pub const STAR: &[&str] = &["✶", "✸", "✹", "✺", "✹", "✷"];
/// Circle arc frames.
pub const CIRCLE: &[&str] = &["◜", "◠", "◝", "◞", "◡", "◟"];

const DODGER_BLUE: Color = Color::Rgb { r: 30, g: 144, b: 255 };
const LIME_GREEN: Color = Color::Rgb { r: 50, g: 205, b: 50 };
const FIRE_BRICK: Color = Color::Rgb { r: 178, g: 34, b: 34 };
const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStyle {
    Star,
    #[default]
    Square,
    Circle,
}

impl SpinnerStyle {
    #[must_use]
    pub const fn frames(self) -> &'static [&'static str] {
        match self {
            Self::Star => STAR,
            Self::Square => SQUARE,
            Self::Circle => CIRCLE,
        }
    }
}

/// Which side of its neighbours the spinner sits on. The spacing column goes
/// on the opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStatus {
    #[default]
    Loading,
    Complete,
    Error,
    Warning,
}

#[derive(Debug)]
struct SpinnerState {
    status: SpinnerStatus,
    /// Glyph currently shown while loading; `None` forces the next tick to
    /// draw.
    shown: Option<&'static str>,
}

/// An animated loading indicator.
///
/// ```
/// use std::sync::Arc;
/// use liveterm_widgets::{Spinner, SpinnerStyle};
///
/// let spinner = Arc::new(Spinner::new().with_style(SpinnerStyle::Circle).with_speed(2));
/// let block = spinner.block();
/// # let _ = block;
/// ```
#[derive(Debug)]
pub struct Spinner {
    id: String,
    style: SpinnerStyle,
    speed: u32,
    side: Side,
    state: Mutex<SpinnerState>,
    binding: BindingSlot,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    #[must_use]
    pub fn new() -> Self {
        let style = SpinnerStyle::default();
        Self {
            id: next_block_id("spinner"),
            style,
            speed: 1,
            side: Side::default(),
            state: Mutex::new(SpinnerState {
                status: SpinnerStatus::Loading,
                shown: style.frames().first().copied(),
            }),
            binding: BindingSlot::new(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: SpinnerStyle) -> Self {
        self.style = style;
        self.state_mut().shown = style.frames().first().copied();
        self
    }

    /// Animation cycles per second. Zero is treated as one.
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed.max(1);
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// This spinner as a document block.
    #[must_use]
    pub fn block(self: &Arc<Self>) -> Block {
        Block::controlled(Arc::clone(self) as Arc<dyn BlockController>)
    }

    #[must_use]
    pub fn status(&self) -> SpinnerStatus {
        self.lock().status
    }

    /// Switch status. Final statuses are drawn immediately; going back to
    /// `Loading` resumes the animation on the next tick.
    ///
    /// # Panics
    ///
    /// Panics if the spinner's document has not been built yet.
    pub fn set_status(&self, status: SpinnerStatus) {
        let mut state = self.lock();
        state.status = status;
        state.shown = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(id = %self.id, ?status, "spinner status changed");
        let patch = match status {
            SpinnerStatus::Loading => return,
            SpinnerStatus::Complete => BlockPatch::text("✔").with_color(LIME_GREEN),
            SpinnerStatus::Error => BlockPatch::text("✖").with_color(FIRE_BRICK),
            SpinnerStatus::Warning => BlockPatch::text("⚠").with_color(GOLD),
        };
        self.binding.update(&self.id, &patch);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SpinnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut SpinnerState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn padding(&self) -> Padding {
        match self.side {
            Side::Left => Padding::new(0, 1, 0, 0),
            Side::Right => Padding::new(0, 0, 0, 1),
        }
    }
}

/// Index of the glyph shown at `frame`.
///
/// `round(((frame * speed) % fps) / fps * len)`, clamped to the last glyph.
#[must_use]
pub fn frame_index(frame: u64, speed: u32, frames_per_second: u32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let fps = u64::from(frames_per_second.max(1));
    let position = frame.wrapping_mul(u64::from(speed.max(1))) % fps;
    #[allow(clippy::cast_precision_loss)]
    let scaled = (position as f64 / fps as f64 * len as f64).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = scaled as usize;
    index.min(len - 1)
}

impl BlockController for Spinner {
    fn descriptor(&self) -> BlockDescriptor {
        BlockDescriptor::new(self.style.frames().first().copied().unwrap_or_default())
            .with_id(self.id.clone())
            .with_padding(self.padding())
            .with_style(TextStyle::BOLD)
            .with_width(BlockWidth::Fit)
    }

    fn configure(&self, binding: BlockBinding) {
        self.binding.set(binding);
    }

    fn request_update(&self, tick: &FrameTick) {
        let mut state = self.lock();
        if state.status != SpinnerStatus::Loading {
            return;
        }
        let frames = self.style.frames();
        let glyph = frames[frame_index(tick.frame, self.speed, tick.frames_per_second, frames.len())];
        if state.shown != Some(glyph) {
            state.shown = Some(glyph);
            self.binding
                .update(&self.id, &BlockPatch::text(glyph).with_color(DODGER_BLUE));
        }
    }
}
