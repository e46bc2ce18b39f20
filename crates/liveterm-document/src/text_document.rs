#![forbid(unsafe_code)]

//! Default [`DocumentRenderer`]: plain rows of blocks with optional borders.
//!
//! # Layout rules
//!
//! Per row, widths are resolved left to right:
//!
//! 1. `Fixed(n)` blocks take `n` columns.
//! 2. `Fit` blocks take their widest text line plus horizontal padding.
//! 3. `Auto` blocks share what is left evenly; the leftmost auto block gets
//!    the remainder.
//!
//! Fixed and fitted widths are clamped to the space still available, so a
//! row never overflows the document. Each block word-wraps its text inside
//! its padding and aligns every line. The row is as tall as its tallest block;
//! shorter blocks are filled with blank lines. Every output line is exactly
//! the document width in cells. A bordered row spends one column on each side
//! and one line above and below.
//!
//! Only the text itself carries colour and attributes; padding and fill are
//! plain spaces.

use std::collections::HashMap;

use crossterm::style::{Attribute, ContentStyle};

use crate::layout::{
    Align, BlockDescriptor, BlockPatch, BlockSize, BlockWidth, DocumentLayout, RowLayout,
    TextStyle,
};
use crate::renderer::DocumentRenderer;
use crate::wrap::{display_width, truncate_to_width, wrap};

/// Width used when a layout does not specify one.
pub const DEFAULT_WIDTH: u16 = 80;

/// Text renderer for [`DocumentLayout`]s.
#[derive(Debug, Default)]
pub struct TextDocument {
    layout: DocumentLayout,
    width: u16,
    sizes: HashMap<String, BlockSize>,
    result: String,
    next_id: usize,
}

impl TextDocument {
    /// An empty document. [`result`](DocumentRenderer::result) is `""` until
    /// the first [`describe`](DocumentRenderer::describe).
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            ..Self::default()
        }
    }

    /// Width the document is currently laid out at.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The current layout, including assigned ids and applied patches.
    #[must_use]
    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    fn assign_ids(&mut self) {
        for row in &mut self.layout.rows {
            for block in &mut row.blocks {
                if block.id.is_none() {
                    block.id = Some(format!("block-{}", self.next_id));
                    self.next_id += 1;
                }
            }
        }
    }

    fn relayout(&mut self) {
        self.sizes.clear();
        let width = usize::from(self.width);
        let mut lines = Vec::new();
        for row in &self.layout.rows {
            render_row(row, width, &mut lines, &mut self.sizes);
        }
        self.result = lines.join("\n");
        tracing::trace!(
            width = self.width,
            lines = lines.len(),
            "document laid out"
        );
    }
}

impl DocumentRenderer for TextDocument {
    fn describe(&mut self, layout: DocumentLayout) {
        self.width = layout.width.unwrap_or(DEFAULT_WIDTH);
        self.layout = layout;
        self.layout.width = Some(self.width);
        self.assign_ids();
        self.relayout();
    }

    fn update(&mut self, id: &str, patch: &BlockPatch) -> bool {
        let Some(block) = self
            .layout
            .rows
            .iter_mut()
            .flat_map(|row| row.blocks.iter_mut())
            .find(|block| block.id.as_deref() == Some(id))
        else {
            tracing::debug!(id, "update for unknown block ignored");
            return false;
        };
        block.apply(patch);
        self.relayout();
        true
    }

    fn block_size(&self, id: &str) -> Option<BlockSize> {
        self.sizes.get(id).copied()
    }

    fn result(&self) -> &str {
        &self.result
    }

    fn resize(&mut self, width: u16) {
        if width == self.width {
            return;
        }
        self.width = width;
        self.layout.width = Some(width);
        self.relayout();
    }
}

// ============================================================================
// Row layout
// ============================================================================

fn render_row(
    row: &RowLayout,
    width: usize,
    out: &mut Vec<String>,
    sizes: &mut HashMap<String, BlockSize>,
) {
    let bordered = row.border && width >= 2;
    let inner = if bordered { width - 2 } else { width };

    let widths = resolve_widths(&row.blocks, inner);
    let rendered: Vec<Vec<String>> = row
        .blocks
        .iter()
        .zip(&widths)
        .map(|(block, &w)| render_block(block, w))
        .collect();

    for ((block, &w), lines) in row.blocks.iter().zip(&widths).zip(&rendered) {
        if let Some(id) = &block.id {
            sizes.insert(
                id.clone(),
                BlockSize {
                    width: clamp_u16(w),
                    height: clamp_u16(lines.len()),
                },
            );
        }
    }

    let height = rendered.iter().map(Vec::len).max().unwrap_or(0);
    let used: usize = widths.iter().sum();
    let border_style = ContentStyle {
        foreground_color: row.border_color,
        ..ContentStyle::default()
    };

    if bordered {
        out.push(styled(
            &format!("┌{}┐", "─".repeat(inner)),
            border_style,
        ));
    }
    for line_index in 0..height {
        let mut line = String::new();
        for (lines, &w) in rendered.iter().zip(&widths) {
            match lines.get(line_index) {
                Some(text) => line.push_str(text),
                None => line.push_str(&" ".repeat(w)),
            }
        }
        line.push_str(&" ".repeat(inner - used));
        if bordered {
            let edge = styled("│", border_style);
            line = format!("{edge}{line}{edge}");
        }
        out.push(line);
    }
    if bordered {
        out.push(styled(
            &format!("└{}┘", "─".repeat(inner)),
            border_style,
        ));
    }
}

/// Resolve every block's column count so their sum never exceeds `available`.
fn resolve_widths(blocks: &[BlockDescriptor], available: usize) -> Vec<usize> {
    let mut remaining = available;
    let mut widths = Vec::with_capacity(blocks.len());
    for block in blocks {
        let wanted = match block.width {
            BlockWidth::Auto => {
                widths.push(None);
                continue;
            }
            BlockWidth::Fixed(n) => usize::from(n),
            BlockWidth::Fit => fit_width(block),
        };
        let w = wanted.min(remaining);
        remaining -= w;
        widths.push(Some(w));
    }

    let autos = widths.iter().filter(|w| w.is_none()).count();
    if autos == 0 {
        return widths.into_iter().flatten().collect();
    }
    let share = remaining / autos;
    let mut extra = remaining % autos;
    widths
        .into_iter()
        .map(|w| {
            w.unwrap_or_else(|| {
                let w = share + extra;
                extra = 0;
                w
            })
        })
        .collect()
}

fn fit_width(block: &BlockDescriptor) -> usize {
    let text = block
        .text
        .split('\n')
        .map(display_width)
        .max()
        .unwrap_or(0);
    text + usize::from(block.padding.width())
}

// ============================================================================
// Block rendering
// ============================================================================

/// Render a block into lines exactly `width` cells wide.
fn render_block(block: &BlockDescriptor, width: usize) -> Vec<String> {
    let left = usize::from(block.padding.left).min(width);
    let right = usize::from(block.padding.right).min(width - left);
    let content = width - left - right;
    let style = content_style(block);
    let blank = " ".repeat(width);

    let mut lines = Vec::new();
    lines.extend((0..block.padding.top).map(|_| blank.clone()));
    for text in wrap(&block.text, content) {
        let text = truncate_to_width(&text, content);
        let slack = content - display_width(&text);
        let before = match block.align {
            Align::Left => 0,
            Align::Center => slack / 2,
            Align::Right => slack,
        };
        lines.push(format!(
            "{}{}{}",
            " ".repeat(left + before),
            styled(&text, style),
            " ".repeat(slack - before + right)
        ));
    }
    lines.extend((0..block.padding.bottom).map(|_| blank.clone()));
    lines
}

fn content_style(block: &BlockDescriptor) -> ContentStyle {
    let mut style = ContentStyle {
        foreground_color: block.color,
        ..ContentStyle::default()
    };
    for (flag, attribute) in [
        (TextStyle::BOLD, Attribute::Bold),
        (TextStyle::DIM, Attribute::Dim),
        (TextStyle::ITALIC, Attribute::Italic),
        (TextStyle::UNDERLINE, Attribute::Underlined),
    ] {
        if block.style.contains(flag) {
            style.attributes.set(attribute);
        }
    }
    style
}

fn styled(text: &str, style: ContentStyle) -> String {
    if text.is_empty() || style == ContentStyle::default() {
        return text.to_string();
    }
    style.apply(text).to_string()
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Padding;
    use crossterm::style::Color;

    fn doc(rows: Vec<RowLayout>, width: u16) -> TextDocument {
        let mut doc = TextDocument::new();
        doc.describe(DocumentLayout::new(rows).with_width(width));
        doc
    }

    fn lines(doc: &TextDocument) -> Vec<&str> {
        doc.result().split('\n').collect()
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert_eq!(TextDocument::new().result(), "");
        assert_eq!(doc(Vec::new(), 10).result(), "");
    }

    #[test]
    fn pads_to_document_width() {
        let d = doc(vec![RowLayout::new(vec![BlockDescriptor::new("Hello world!")])], 13);
        assert_eq!(d.result(), "Hello world! ");
    }

    #[test]
    fn default_width_is_eighty() {
        let mut d = TextDocument::new();
        d.describe(DocumentLayout::new(vec![RowLayout::new(vec![BlockDescriptor::new("x")])]));
        assert_eq!(d.width(), 80);
        assert_eq!(display_width(d.result()), 80);
    }

    #[test]
    fn wraps_and_pads_each_line() {
        let d = doc(
            vec![RowLayout::new(vec![BlockDescriptor::new("This is a test message")])],
            10,
        );
        assert_eq!(lines(&d), vec!["This is a ", "test      ", "message   "]);
    }

    #[test]
    fn auto_blocks_share_width_leftmost_takes_remainder() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("a").with_id("a"),
                BlockDescriptor::new("b").with_id("b"),
            ])],
            7,
        );
        assert_eq!(d.block_size("a").unwrap().width, 4);
        assert_eq!(d.block_size("b").unwrap().width, 3);
        assert_eq!(d.result(), "a   b  ");
    }

    #[test]
    fn fit_and_fixed_blocks() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("ab")
                    .with_id("fit")
                    .with_width(BlockWidth::Fit)
                    .with_padding(Padding::new(0, 1, 0, 0)),
                BlockDescriptor::new("c").with_id("fixed").with_width(BlockWidth::Fixed(4)),
                BlockDescriptor::new("d").with_id("auto"),
            ])],
            10,
        );
        assert_eq!(d.block_size("fit").unwrap().width, 3);
        assert_eq!(d.block_size("fixed").unwrap().width, 4);
        assert_eq!(d.block_size("auto").unwrap().width, 3);
        assert_eq!(d.result(), "ab c   d  ");
    }

    #[test]
    fn fixed_widths_are_clamped() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("x").with_id("x").with_width(BlockWidth::Fixed(50)),
                BlockDescriptor::new("y").with_id("y").with_width(BlockWidth::Fixed(5)),
            ])],
            8,
        );
        assert_eq!(d.block_size("x").unwrap().width, 8);
        assert_eq!(d.block_size("y").unwrap().width, 0);
        assert_eq!(display_width(d.result()), 8);
    }

    #[test]
    fn row_height_is_tallest_block() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("one two").with_id("tall").with_width(BlockWidth::Fixed(3)),
                BlockDescriptor::new("x").with_id("short"),
            ])],
            5,
        );
        assert_eq!(lines(&d), vec!["onex ", "two  "]);
        assert_eq!(d.block_size("tall").unwrap().height, 2);
        assert_eq!(d.block_size("short").unwrap().height, 1);
    }

    #[test]
    fn vertical_padding_and_alignment() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("ab")
                    .with_align(Align::Right)
                    .with_padding(Padding::new(1, 0, 1, 0)),
            ])],
            5,
        );
        assert_eq!(lines(&d), vec!["     ", "   ab", "     "]);

        let centered = doc(
            vec![RowLayout::new(vec![BlockDescriptor::new("ab").with_align(Align::Center)])],
            6,
        );
        assert_eq!(centered.result(), "  ab  ");
    }

    #[test]
    fn border_takes_two_columns() {
        let d = doc(
            vec![RowLayout::new(vec![BlockDescriptor::new("hi")]).with_border(true)],
            6,
        );
        assert_eq!(lines(&d), vec!["┌────┐", "│hi  │", "└────┘"]);
    }

    #[test]
    fn styled_text_leaves_padding_plain() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("hi")
                    .with_color(Color::Red)
                    .with_style(TextStyle::BOLD),
            ])],
            4,
        );
        assert!(d.result().contains("hi"));
        assert!(d.result().contains('\x1b'));
        assert!(d.result().ends_with("  "));
        assert!(!d.result().starts_with(' '));
    }

    #[test]
    fn ids_assigned_in_order() {
        let d = doc(
            vec![RowLayout::new(vec![
                BlockDescriptor::new("a"),
                BlockDescriptor::new("b").with_id("named"),
                BlockDescriptor::new("c"),
            ])],
            9,
        );
        let ids: Vec<_> = d.layout().blocks().map(|b| b.id.clone().unwrap()).collect();
        assert_eq!(ids, ["block-0", "named", "block-1"]);
    }

    #[test]
    fn update_patches_and_relayouts() {
        let mut d = doc(
            vec![RowLayout::new(vec![BlockDescriptor::new("old").with_id("x")])],
            5,
        );
        assert!(d.update("x", &BlockPatch::text("new!")));
        assert_eq!(d.result(), "new! ");
        assert!(!d.update("missing", &BlockPatch::text("?")));
        assert_eq!(d.block_size("missing"), None);
    }

    #[test]
    fn resize_keeps_patched_state() {
        let mut d = doc(
            vec![RowLayout::new(vec![BlockDescriptor::new("a").with_id("x")])],
            5,
        );
        d.update("x", &BlockPatch::text("b"));
        d.resize(3);
        assert_eq!(d.result(), "b  ");
        assert_eq!(d.block_size("x").unwrap().width, 3);
    }
}
