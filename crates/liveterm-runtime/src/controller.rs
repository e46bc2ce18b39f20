#![forbid(unsafe_code)]

//! Block controller protocol.
//!
//! A [`BlockController`] drives one animated block. It never touches the
//! terminal: it describes its initial appearance, receives a [`BlockBinding`]
//! once its document is built, and on every tick decides whether its block
//! needs a [`BlockPatch`].
//!
//! # Contract
//!
//! - `configure` is called when the owning document is (re)built, before the
//!   first `request_update`.
//! - `request_update` is called once per tick, in document, row, then block
//!   order. Patches must only be pushed when the visible state changes:
//!   every update re-lays out the document and forces the changed lines to
//!   be rewritten.
//! - Using a binding before `configure` is a programming error and panics
//!   (see [`BindingSlot::get`]).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use liveterm_document::{BlockDescriptor, BlockPatch, BlockSize, DocumentRenderer};

/// A document renderer shared between the registry and its controllers.
pub type SharedRenderer = Arc<Mutex<Box<dyn DocumentRenderer>>>;

/// Per-tick timing handed to controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonic frame counter, starting at 0 for each presenting session.
    pub frame: u64,
    pub frames_per_second: u32,
    pub frame_duration: Duration,
}

/// The late-bound `update`/`size` pair wired to one document's renderer.
#[derive(Clone)]
pub struct BlockBinding {
    renderer: SharedRenderer,
}

impl std::fmt::Debug for BlockBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockBinding").finish_non_exhaustive()
    }
}

impl BlockBinding {
    #[must_use]
    pub fn new(renderer: SharedRenderer) -> Self {
        Self { renderer }
    }

    /// Merge-patch a block. Returns `false` if the block is not in the document.
    pub fn update(&self, id: &str, patch: &BlockPatch) -> bool {
        self.renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(id, patch)
    }

    /// The block's current rendered size, zero if unknown.
    #[must_use]
    pub fn size(&self, id: &str) -> BlockSize {
        self.renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .block_size(id)
            .unwrap_or_default()
    }
}

/// An animated unit inside a document.
pub trait BlockController: Send + Sync {
    /// Initial appearance, inserted into the layout when the document is built.
    fn descriptor(&self) -> BlockDescriptor;

    /// Receive the binding to the owning document.
    fn configure(&self, binding: BlockBinding);

    /// Advance by one frame, pushing a patch only if the block must change.
    fn request_update(&self, tick: &FrameTick);
}

/// Holder for a controller's binding, filled by `configure`.
#[derive(Debug, Default)]
pub struct BindingSlot {
    binding: Mutex<Option<BlockBinding>>,
}

impl BindingSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace, on document rebuild) the binding.
    pub fn set(&self, binding: BlockBinding) {
        *self.binding.lock().unwrap_or_else(PoisonError::into_inner) = Some(binding);
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current binding.
    ///
    /// # Panics
    ///
    /// Panics if the controller has not been configured yet.
    #[must_use]
    pub fn get(&self) -> BlockBinding {
        match &*self.binding.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(binding) => binding.clone(),
            None => panic!("block controller used before it was configured"),
        }
    }

    /// Shorthand for `self.get().update(..)`.
    ///
    /// # Panics
    ///
    /// Panics if the controller has not been configured yet.
    pub fn update(&self, id: &str, patch: &BlockPatch) -> bool {
        self.get().update(id, patch)
    }

    /// Shorthand for `self.get().size(..)`.
    ///
    /// # Panics
    ///
    /// Panics if the controller has not been configured yet.
    #[must_use]
    pub fn size(&self, id: &str) -> BlockSize {
        self.get().size(id)
    }
}

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(0);

/// A process-unique block id: `<prefix>-<n>`.
#[must_use]
pub fn next_block_id(prefix: &str) -> String {
    format!("{prefix}-{}", NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
}
