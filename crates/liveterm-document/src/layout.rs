#![forbid(unsafe_code)]

//! Layout descriptions: documents, rows, blocks, and block patches.

use crossterm::style::Color;

bitflags::bitflags! {
    /// Text attribute flags applied to a block's text (never to its padding).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyle: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM       = 0b0000_0010;
        /// Italic text.
        const ITALIC    = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
    }
}

/// How a block claims horizontal space within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockWidth {
    /// Share whatever the fixed and fitted blocks leave over.
    #[default]
    Auto,
    /// As wide as the widest text line plus horizontal padding.
    Fit,
    /// Exactly this many columns (clamped to what is left in the row).
    Fixed(u16),
}

/// Horizontal alignment of text inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Blank cells around a block's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Padding in CSS order: top, right, bottom, left.
    #[must_use]
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same padding on every side.
    #[must_use]
    pub const fn uniform(n: u16) -> Self {
        Self::new(n, n, n, n)
    }

    /// Left and right padding only.
    #[must_use]
    pub const fn horizontal(n: u16) -> Self {
        Self::new(0, n, 0, n)
    }

    /// Total horizontal padding.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.left.saturating_add(self.right)
    }
}

/// Appearance of one block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockDescriptor {
    /// Stable id used by [`BlockPatch`] updates. Assigned on describe if unset.
    pub id: Option<String>,
    pub text: String,
    pub color: Option<Color>,
    pub style: TextStyle,
    pub width: BlockWidth,
    pub padding: Padding,
    pub align: Align,
}

impl BlockDescriptor {
    /// An auto-width, unstyled block showing `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<Option<Color>>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: BlockWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Merge a patch into this descriptor. Unset patch fields are left alone.
    pub fn apply(&mut self, patch: &BlockPatch) {
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(padding) = patch.padding {
            self.padding = padding;
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
    }
}

/// Partial block update. Every `None` field means "keep the current value".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockPatch {
    pub text: Option<String>,
    /// `Some(None)` removes the colour.
    pub color: Option<Option<Color>>,
    pub style: Option<TextStyle>,
    pub width: Option<BlockWidth>,
    pub padding: Option<Padding>,
    pub align: Option<Align>,
}

impl BlockPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch replacing only the text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<Option<Color>>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: BlockWidth) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Whether applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One horizontal band of blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowLayout {
    pub blocks: Vec<BlockDescriptor>,
    /// Surround the row with a single-line box (costs two columns).
    pub border: bool,
    pub border_color: Option<Color>,
}

impl RowLayout {
    #[must_use]
    pub fn new(blocks: Vec<BlockDescriptor>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: impl Into<Option<Color>>) -> Self {
        self.border_color = color.into();
        self
    }
}

/// A whole document: rows top to bottom, at an optional explicit width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentLayout {
    pub rows: Vec<RowLayout>,
    /// Target width in columns. `None` lets the renderer use its default.
    pub width: Option<u16>,
}

impl DocumentLayout {
    #[must_use]
    pub fn new(rows: Vec<RowLayout>) -> Self {
        Self { rows, width: None }
    }

    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Visit every block descriptor in row then block order.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockDescriptor> {
        self.rows.iter().flat_map(|row| row.blocks.iter())
    }
}

/// Rendered size of a block in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockSize {
    pub width: u16,
    pub height: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_set_fields() {
        let mut block = BlockDescriptor::new("a")
            .with_color(Color::Red)
            .with_style(TextStyle::BOLD);
        block.apply(&BlockPatch::text("b"));
        assert_eq!(block.text, "b");
        assert_eq!(block.color, Some(Color::Red));
        assert_eq!(block.style, TextStyle::BOLD);
    }

    #[test]
    fn patch_can_clear_color() {
        let mut block = BlockDescriptor::new("a").with_color(Color::Red);
        block.apply(&BlockPatch::new().with_color(None));
        assert_eq!(block.color, None);
    }

    #[test]
    fn empty_patch() {
        assert!(BlockPatch::new().is_empty());
        assert!(!BlockPatch::text("").is_empty());
    }

    #[test]
    fn padding_width_saturates() {
        assert_eq!(Padding::new(0, u16::MAX, 0, 5).width(), u16::MAX);
        assert_eq!(Padding::horizontal(2).width(), 4);
    }

    #[test]
    fn blocks_iterates_rows_in_order() {
        let layout = DocumentLayout::new(vec![
            RowLayout::new(vec![BlockDescriptor::new("a"), BlockDescriptor::new("b")]),
            RowLayout::new(vec![BlockDescriptor::new("c")]),
        ]);
        let texts: Vec<_> = layout.blocks().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }
}
