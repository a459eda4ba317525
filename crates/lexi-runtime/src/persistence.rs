#![forbid(unsafe_code)]

//! Persistence hook: stores for document snapshots and the commands that
//! use them.
//!
//! The core never picks a format. A [`DocumentStore`] holds at most one
//! [`DocumentSnapshot`]; [`MemoryStore`] keeps it in memory and, with the
//! `persistence` feature, [`JsonFileStore`] keeps it in a JSON file.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "document": { "config": { ... }, "pages": [ ... ], "cursor": 3 }
//! }
//! ```
//!
//! Writes go to a temp file first and are renamed into place.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{EditorError, Result};
use lexi_doc::{Document, DocumentSnapshot};

use crate::undo::{Command, CommandMetadata, CommandResult};

/// A single-slot snapshot store.
pub trait DocumentStore {
    /// Read the stored snapshot, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<DocumentSnapshot>>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &DocumentSnapshot) -> Result<()>;

    /// Forget the stored snapshot.
    fn clear(&self) -> Result<()>;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;
}

// =========================================================================
// Memory
// =========================================================================

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<DocumentSnapshot>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<DocumentSnapshot>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, snapshot: &DocumentSnapshot) -> Result<()> {
        *self.slot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// =========================================================================
// JSON file
// =========================================================================

#[cfg(feature = "persistence")]
pub use file::JsonFileStore;

#[cfg(feature = "persistence")]
mod file {
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};

    use super::DocumentStore;
    use lexi_core::{EditorError, Result};
    use lexi_doc::DocumentSnapshot;

    /// Current file format version.
    const FORMAT_VERSION: u64 = 1;

    #[derive(Serialize, Deserialize)]
    struct SnapshotFile<D> {
        version: u64,
        document: D,
    }

    fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> EditorError {
        EditorError::Storage(format!("failed to {action} {}: {err}", path.display()))
    }

    /// Store backed by one JSON file. Clones refer to the same file.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        /// The parent directory of `path` must already exist.
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl DocumentStore for JsonFileStore {
        /// A missing file is an empty store, not an error.
        fn load(&self) -> Result<Option<DocumentSnapshot>> {
            if !self.path.exists() {
                return Ok(None);
            }
            let contents = std::fs::read_to_string(&self.path)
                .map_err(|e| storage_error("read", &self.path, e))?;
            let file: SnapshotFile<DocumentSnapshot> = serde_json::from_str(&contents)
                .map_err(|e| storage_error("parse", &self.path, e))?;
            if file.version != FORMAT_VERSION {
                return Err(EditorError::Storage(format!(
                    "unsupported document file version: {} (expected {FORMAT_VERSION})",
                    file.version
                )));
            }
            Ok(Some(file.document))
        }

        fn save(&self, snapshot: &DocumentSnapshot) -> Result<()> {
            let file = SnapshotFile {
                version: FORMAT_VERSION,
                document: snapshot,
            };
            let json = serde_json::to_string_pretty(&file)
                .map_err(|e| storage_error("serialize", &self.path, e))?;
            let temp = self.path.with_extension("json.tmp");
            std::fs::write(&temp, json).map_err(|e| storage_error("write", &temp, e))?;
            std::fs::rename(&temp, &self.path)
                .map_err(|e| storage_error("replace", &self.path, e))?;
            tracing::debug!(target: "lexi.store", path = %self.path.display(), "snapshot written");
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| storage_error("remove", &self.path, e))?;
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "json-file"
        }
    }
}

// =========================================================================
// Commands
// =========================================================================

/// Swap `doc` for the document described by `snapshot`, keeping the clipboard.
fn replace_document(doc: &mut Document, snapshot: &DocumentSnapshot) -> Result<()> {
    let clipboard = doc.clipboard_contents()?;
    let mut next = Document::from_snapshot(snapshot)?;
    next.set_clipboard(&clipboard)?;
    *doc = next;
    Ok(())
}

/// Write the document to a store. Undo puts the store's old content back.
#[derive(Debug)]
pub struct SaveDocument<S> {
    store: S,
    metadata: CommandMetadata,
    previous: Option<Option<DocumentSnapshot>>,
}

impl<S: DocumentStore> SaveDocument<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            metadata: CommandMetadata::new("Save document"),
            previous: None,
        }
    }
}

impl<S: DocumentStore> Command for SaveDocument<S> {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let snapshot = doc.snapshot()?;
        let previous = self.store.load()?;
        self.store.save(&snapshot)?;
        self.previous = Some(previous);
        tracing::debug!(
            target: "lexi.store",
            store = self.store.name(),
            pages = snapshot.pages.len(),
            "document saved"
        );
        Ok(())
    }

    fn unexecute(&mut self, _doc: &mut Document) -> CommandResult {
        match self.previous.take().ok_or(EditorError::NullGlyph)? {
            Some(previous) => self.store.save(&previous),
            None => self.store.clear(),
        }
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "SaveDocument"
    }
}

/// Replace the document with the store's snapshot. Undo brings the old
/// document back.
#[derive(Debug)]
pub struct LoadDocument<S> {
    store: S,
    metadata: CommandMetadata,
    previous: Option<DocumentSnapshot>,
}

impl<S: DocumentStore> LoadDocument<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            metadata: CommandMetadata::new("Load document"),
            previous: None,
        }
    }
}

impl<S: DocumentStore> Command for LoadDocument<S> {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let snapshot = self.store.load()?.ok_or_else(|| {
            EditorError::Storage(format!("{} store holds no document", self.store.name()))
        })?;
        let previous = doc.snapshot()?;
        replace_document(doc, &snapshot)?;
        self.previous = Some(previous);
        tracing::debug!(
            target: "lexi.store",
            store = self.store.name(),
            pages = doc.pages_count(),
            "document loaded"
        );
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let previous = self.previous.take().ok_or(EditorError::NullGlyph)?;
        replace_document(doc, &previous)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "LoadDocument"
    }
}
