#![forbid(unsafe_code)]

//! The renderer contract the runtime drives.

use crate::layout::{BlockPatch, BlockSize, DocumentLayout};

/// Turns a [`DocumentLayout`] into laid-out terminal text and keeps it
/// current as blocks are patched.
///
/// Implementations must keep [`result`](Self::result) consistent after every
/// mutating call: `\n`-separated lines, each already wrapped and padded to
/// the document width.
pub trait DocumentRenderer: Send {
    /// Replace the whole document.
    fn describe(&mut self, layout: DocumentLayout);

    /// Merge a patch into the block with the given id.
    ///
    /// Returns `false` (and changes nothing) when no such block exists.
    fn update(&mut self, id: &str, patch: &BlockPatch) -> bool;

    /// Current rendered size of a block, if it exists.
    fn block_size(&self, id: &str) -> Option<BlockSize>;

    /// The rendered document.
    fn result(&self) -> &str;

    /// Re-lay out the current (patched) document at a new width.
    fn resize(&mut self, width: u16);
}
