#![forbid(unsafe_code)]

//! Lexi editor core public facade.
//!
//! Re-exports the types most callers need from the member crates and adds
//! [`Editor`], a document paired with its undo executor.
//!
//! ```
//! use lexi::prelude::*;
//!
//! let mut editor = Editor::default();
//! editor.type_str("lexi").unwrap();
//! editor.backspace().unwrap();
//! assert_eq!(editor.text(), "lex");
//! editor.undo().unwrap();
//! assert_eq!(editor.text(), "lexi");
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use lexi_core::{EditorError, GlyphId, HistoryDirection, Point, Rect, Result, Sides};

// --- Layout re-exports -----------------------------------------------------

pub use lexi_layout::{Alignment, Compositor, CompositorConfig, Flow, Size};

// --- Document re-exports ---------------------------------------------------

pub use lexi_doc::{
    CharacterSnapshot, Document, DocumentSnapshot, DrawItem, DrawKind, GlyphKind, GlyphTree,
    LayoutState, PageSnapshot, RenderSink, RowSnapshot,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "persistence")]
pub use lexi_runtime::JsonFileStore;
pub use lexi_runtime::{
    Command, CommandBatch, CommandMetadata, CommandSource, CopyGlyphs, CutGlyphs, DocumentStore,
    Executor, ExecutorConfig, InsertCharacter, LoadDocument, MemoryStore, MoveCursorLeft,
    MoveCursorRight, PasteGlyphs, RemoveCharacter, SaveDocument, SetCurrentPage,
};

// --- Editor facade ---------------------------------------------------------

/// A document and the executor that records edits to it.
///
/// Every editing method goes through the executor, so it can be undone.
pub struct Editor {
    document: Document,
    executor: Executor,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("text", &self.document.text())
            .field("cursor", &self.document.cursor_offset())
            .field("executor", &self.executor)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Compositor::default(), ExecutorConfig::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(compositor: Compositor, config: ExecutorConfig) -> Self {
        Self {
            document: Document::new(compositor),
            executor: Executor::new(config),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.document.text()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.document.cursor_offset()
    }

    /// Run any command through the undo history.
    pub fn execute(&mut self, command: impl Command + 'static) -> Result<()> {
        self.executor.execute(&mut self.document, command)
    }

    pub fn type_char(&mut self, symbol: char) -> Result<()> {
        self.execute(InsertCharacter::new(symbol))
    }

    /// Type a run of characters as a single undo step. An empty string is
    /// a no-op and records nothing.
    pub fn type_str(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut batch = CommandBatch::new(format!("Type {text:?}"));
        for symbol in text.chars() {
            batch.push(Box::new(InsertCharacter::new(symbol)));
        }
        self.execute(batch)
    }

    /// Remove the character before the cursor.
    ///
    /// # Errors
    ///
    /// [`EditorError::NullGlyph`] when the cursor sits at the start of the
    /// document.
    pub fn backspace(&mut self) -> Result<()> {
        self.execute(RemoveCharacter::new())
    }

    pub fn move_left(&mut self) -> Result<()> {
        self.execute(MoveCursorLeft::new())
    }

    pub fn move_right(&mut self) -> Result<()> {
        self.execute(MoveCursorRight::new())
    }

    pub fn copy(&mut self, start: Point, end: Point) -> Result<()> {
        self.execute(CopyGlyphs::new(start, end))
    }

    pub fn cut(&mut self, start: Point, end: Point) -> Result<()> {
        self.execute(CutGlyphs::new(start, end))
    }

    pub fn paste(&mut self, at: Point) -> Result<()> {
        self.execute(PasteGlyphs::new(at))
    }

    /// Make the page at `index` the target of positional edits.
    pub fn go_to_page(&mut self, index: usize) -> Result<()> {
        self.execute(SetCurrentPage::new(index))
    }

    /// Undo the most recent edit and return its description.
    pub fn undo(&mut self) -> Result<String> {
        self.executor.undo(&mut self.document)
    }

    /// Redo the most recently undone edit and return its description.
    pub fn redo(&mut self) -> Result<String> {
        self.executor.redo(&mut self.document)
    }

    /// Write the document to `store`. Undo restores the store's old content.
    pub fn save<S: DocumentStore + 'static>(&mut self, store: S) -> Result<()> {
        self.execute(SaveDocument::new(store))
    }

    /// Replace the document with the one held by `store`.
    pub fn load<S: DocumentStore + 'static>(&mut self, store: S) -> Result<()> {
        self.execute(LoadDocument::new(store))
    }

    pub fn render<R: RenderSink + ?Sized>(&self, sink: &mut R) -> Result<()> {
        self.document.render(sink)
    }

    /// Split into the document and executor.
    #[must_use]
    pub fn into_parts(self) -> (Document, Executor) {
        (self.document, self.executor)
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Command, Compositor, Document, DocumentStore, Editor, EditorError, Executor,
        ExecutorConfig, MemoryStore, Point, Rect, Result, Sides,
    };

    pub use crate::{core, doc, layout, runtime};
}

pub use lexi_core as core;
pub use lexi_doc as doc;
pub use lexi_layout as layout;
pub use lexi_runtime as runtime;
