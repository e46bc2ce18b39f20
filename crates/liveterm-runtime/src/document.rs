#![forbid(unsafe_code)]

//! Documents as registered with the presenter: rows of static or
//! controller-driven blocks.

use std::sync::Arc;

use crossterm::style::Color;
use liveterm_document::{BlockDescriptor, DocumentLayout, RowLayout};

use crate::controller::BlockController;

/// One block: fixed appearance, or driven by a controller.
#[derive(Clone)]
pub enum Block {
    Static(BlockDescriptor),
    Controlled(Arc<dyn BlockController>),
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(descriptor) => f.debug_tuple("Static").field(descriptor).finish(),
            Self::Controlled(_) => f.write_str("Controlled(..)"),
        }
    }
}

impl Block {
    /// A static auto-width text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Static(BlockDescriptor::new(text))
    }

    /// A controller-driven block.
    #[must_use]
    pub fn controlled(controller: Arc<dyn BlockController>) -> Self {
        Self::Controlled(controller)
    }

    /// The descriptor placed in the layout.
    #[must_use]
    pub fn descriptor(&self) -> BlockDescriptor {
        match self {
            Self::Static(descriptor) => descriptor.clone(),
            Self::Controlled(controller) => controller.descriptor(),
        }
    }
}

/// A horizontal band of blocks.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub blocks: Vec<Block>,
    pub border: bool,
    pub border_color: Option<Color>,
}

impl Row {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
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

/// A live document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub rows: Vec<Row>,
}

impl Document {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// A document with a single one-block row.
    #[must_use]
    pub fn single(block: Block) -> Self {
        Self::new(vec![Row::new(vec![block])])
    }

    /// Split into a renderer layout and the controllers in row, then block
    /// order.
    #[must_use]
    pub fn into_parts(self) -> (DocumentLayout, Vec<Arc<dyn BlockController>>) {
        let mut controllers = Vec::new();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let blocks = row
                    .blocks
                    .into_iter()
                    .map(|block| {
                        let descriptor = block.descriptor();
                        if let Block::Controlled(controller) = block {
                            controllers.push(controller);
                        }
                        descriptor
                    })
                    .collect();
                RowLayout {
                    blocks,
                    border: row.border,
                    border_color: row.border_color,
                }
            })
            .collect();
        (DocumentLayout::new(rows), controllers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{BlockBinding, FrameTick};

    struct Fixed(&'static str);

    impl BlockController for Fixed {
        fn descriptor(&self) -> BlockDescriptor {
            BlockDescriptor::new(self.0).with_id(self.0)
        }
        fn configure(&self, _: BlockBinding) {}
        fn request_update(&self, _: &FrameTick) {}
    }

    #[test]
    fn into_parts_extracts_controllers_in_order() {
        let doc = Document::new(vec![
            Row::new(vec![
                Block::controlled(Arc::new(Fixed("a"))),
                Block::text("static"),
            ])
            .with_border(true),
            Row::new(vec![Block::controlled(Arc::new(Fixed("b")))]),
        ]);
        let (layout, controllers) = doc.into_parts();
        assert_eq!(layout.rows.len(), 2);
        assert!(layout.rows[0].border);
        assert_eq!(layout.rows[0].blocks[1].text, "static");
        let ids: Vec<_> = controllers
            .iter()
            .map(|c| c.descriptor().id.unwrap())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
