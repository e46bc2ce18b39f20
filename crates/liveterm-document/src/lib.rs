#![forbid(unsafe_code)]

//! Documents: rows of blocks laid out into width-exact terminal text.
//!
//! A document is described once with a [`DocumentLayout`] and then mutated
//! block by block through [`BlockPatch`]es. The renderer keeps the fully laid
//! out text available through [`DocumentRenderer::result`], one terminal line
//! per `\n`-separated line, each exactly as wide as the document.
//!
//! # Example
//! ```
//! use liveterm_document::{BlockDescriptor, DocumentLayout, DocumentRenderer, RowLayout, TextDocument};
//!
//! let mut doc = TextDocument::new();
//! doc.describe(
//!     DocumentLayout::new(vec![RowLayout::new(vec![BlockDescriptor::new("Hello world!")])])
//!         .with_width(13),
//! );
//! assert_eq!(doc.result(), "Hello world! ");
//! ```

pub mod layout;
pub mod renderer;
pub mod text_document;
pub mod wrap;

pub use layout::{
    Align, BlockDescriptor, BlockPatch, BlockSize, BlockWidth, DocumentLayout, Padding, RowLayout,
    TextStyle,
};
pub use renderer::DocumentRenderer;
pub use text_document::TextDocument;

/// Colour type used by descriptors (re-exported from crossterm).
pub use crossterm::style::Color;
