#![forbid(unsafe_code)]

//! Ordered collection of live documents.
//!
//! Each registered [`Document`] becomes an entry owning one renderer and the
//! controllers extracted from its rows. Registration order is screen order,
//! top to bottom, and survives unrelated additions and removals.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use liveterm_core::ControlCodes;
use liveterm_document::{DocumentRenderer, TextDocument};

use crate::controller::{BlockBinding, BlockController, SharedRenderer};
use crate::document::Document;

/// Creates a fresh renderer for each document build.
pub type RendererFactory = Arc<dyn Fn() -> Box<dyn DocumentRenderer> + Send + Sync>;

/// The default factory: [`TextDocument`]s.
#[must_use]
pub fn text_document_factory() -> RendererFactory {
    Arc::new(|| Box::new(TextDocument::new()))
}

struct DocumentEntry {
    renderer: SharedRenderer,
    controllers: Vec<Arc<dyn BlockController>>,
}

/// Registered documents in screen order.
pub struct DocumentRegistry {
    order: Vec<String>,
    entries: HashMap<String, DocumentEntry>,
    factory: RendererFactory,
    codes: Arc<dyn ControlCodes>,
}

impl std::fmt::Debug for DocumentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRegistry")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl DocumentRegistry {
    /// An empty registry. Documents are laid out at `codes.columns()` as of
    /// each (re)build.
    #[must_use]
    pub fn new(factory: RendererFactory, codes: Arc<dyn ControlCodes>) -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            factory,
            codes,
        }
    }

    fn build(&self, document: Document) -> DocumentEntry {
        let (mut layout, controllers) = document.into_parts();
        layout.width = Some(self.codes.columns());

        let renderer: SharedRenderer = Arc::new(Mutex::new((self.factory)()));
        let binding = BlockBinding::new(Arc::clone(&renderer));
        for controller in &controllers {
            controller.configure(binding.clone());
        }
        renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .describe(layout);

        DocumentEntry {
            renderer,
            controllers,
        }
    }

    /// Add a document at the bottom. Returns `false` if `id` is taken.
    pub fn append(&mut self, id: impl Into<String>, document: Document) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        let entry = self.build(document);
        self.entries.insert(id.clone(), entry);
        tracing::debug!(id = %id, "document appended");
        self.order.push(id);
        true
    }

    /// Add a document at the top. Returns `false` if `id` is taken.
    pub fn prepend(&mut self, id: impl Into<String>, document: Document) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        let entry = self.build(document);
        self.entries.insert(id.clone(), entry);
        tracing::debug!(id = %id, "document prepended");
        self.order.insert(0, id);
        true
    }

    /// Rebuild a document in place. Returns `false` if `id` is unknown.
    pub fn update(&mut self, id: &str, document: Document) -> bool {
        if !self.entries.contains_key(id) {
            return false;
        }
        let entry = self.build(document);
        self.entries.insert(id.to_string(), entry);
        tracing::debug!(id, "document updated");
        true
    }

    /// Remove a document. Returns `false` if `id` is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.entries.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);
        tracing::debug!(id, "document removed");
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Document ids, top to bottom.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visit every controller in document, row, then block order.
    pub fn for_each_controller(&self, mut visit: impl FnMut(&dyn BlockController)) {
        for id in &self.order {
            if let Some(entry) = self.entries.get(id) {
                for controller in &entry.controllers {
                    visit(controller.as_ref());
                }
            }
        }
    }

    /// Every document's rendered lines, concatenated top to bottom.
    /// Documents that render to nothing contribute no lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for id in &self.order {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            let renderer = entry.renderer.lock().unwrap_or_else(PoisonError::into_inner);
            let result = renderer.result();
            if !result.is_empty() {
                lines.extend(result.split('\n').map(str::to_string));
            }
        }
        lines
    }

    /// Re-lay out every document at a new width.
    pub fn redescribe_all(&self, width: u16) {
        for entry in self.entries.values() {
            entry
                .renderer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .resize(width);
        }
    }
}
