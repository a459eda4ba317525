#![forbid(unsafe_code)]

//! Document edits as reversible commands.
//!
//! Every structural command records the cursor as a character offset, the
//! current page as an index, and the row heights before it ran. Undo
//! re-creates removed characters from value snapshots, puts the heights
//! back, then restores the page and the cursor, so the document after
//! `unexecute` composes exactly as it did before `execute`.

use lexi_core::{EditorError, Point, Result};
use lexi_doc::{CharacterSnapshot, Document, LayoutState};

use crate::undo::{Command, CommandMetadata, CommandResult};

/// Cursor, page, and layout as they were before a command ran.
#[derive(Debug, Clone)]
struct Before {
    cursor: usize,
    page: usize,
    layout: LayoutState,
}

impl Before {
    fn capture(doc: &Document) -> Self {
        Self {
            cursor: doc.cursor_offset(),
            page: doc.current_page_index(),
            layout: doc.layout_state(),
        }
    }

    fn restore(&self, doc: &mut Document) -> Result<()> {
        doc.restore_layout(&self.layout)?;
        doc.set_current_page_index(self.page)?;
        doc.set_cursor_offset(self.cursor);
        Ok(())
    }
}

/// Take the state captured by `execute`, or fail if it never ran.
fn captured<T>(slot: &mut Option<T>) -> Result<T> {
    slot.take().ok_or(EditorError::NullGlyph)
}

// =========================================================================
// Typing
// =========================================================================

/// Type one character at the cursor.
#[derive(Debug)]
pub struct InsertCharacter {
    symbol: char,
    metadata: CommandMetadata,
    before: Option<Before>,
}

impl InsertCharacter {
    #[must_use]
    pub fn new(symbol: char) -> Self {
        Self {
            symbol,
            metadata: CommandMetadata::new(format!("Insert '{symbol}'")),
            before: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CommandMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn symbol(&self) -> char {
        self.symbol
    }
}

impl Command for InsertCharacter {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let before = Before::capture(doc);
        doc.insert_char(self.symbol)?;
        self.before = Some(before);
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let before = captured(&mut self.before)?;
        doc.remove_character_at(before.cursor)?;
        before.restore(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "InsertCharacter"
    }
}

/// Delete the character under the cursor.
#[derive(Debug)]
pub struct RemoveCharacter {
    metadata: CommandMetadata,
    removed: Option<(Before, CharacterSnapshot)>,
}

impl Default for RemoveCharacter {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoveCharacter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: CommandMetadata::new("Remove character"),
            removed: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CommandMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The character removed by the last `execute`, if it is still applied.
    #[must_use]
    pub fn removed(&self) -> Option<&CharacterSnapshot> {
        self.removed.as_ref().map(|(_, character)| character)
    }
}

impl Command for RemoveCharacter {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let before = Before::capture(doc);
        let offset = before.cursor.checked_sub(1).ok_or(EditorError::NullGlyph)?;
        let character = doc.remove_character_at(offset)?;
        self.removed = Some((before, character));
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let (before, character) = captured(&mut self.removed)?;
        doc.insert_character_at(before.cursor - 1, character)?;
        before.restore(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "RemoveCharacter"
    }
}

// =========================================================================
// Clipboard
// =========================================================================

/// Copy the glyphs inside a rectangle to the clipboard.
#[derive(Debug)]
pub struct CopyGlyphs {
    start: Point,
    end: Point,
    metadata: CommandMetadata,
    previous: Option<(usize, Vec<CharacterSnapshot>)>,
}

impl CopyGlyphs {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            metadata: CommandMetadata::new("Copy"),
            previous: None,
        }
    }
}

impl Command for CopyGlyphs {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let page = doc.current_page_index();
        let previous = doc.clipboard_contents()?;
        doc.select_glyphs(self.start, self.end)?;
        self.previous = Some((page, previous));
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let (page, previous) = captured(&mut self.previous)?;
        doc.set_clipboard(&previous)?;
        doc.set_current_page_index(page)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "CopyGlyphs"
    }
}

#[derive(Debug)]
struct CutState {
    before: Before,
    clipboard: Vec<CharacterSnapshot>,
    removed: Vec<(usize, CharacterSnapshot)>,
}

/// Move the glyphs inside a rectangle to the clipboard.
#[derive(Debug)]
pub struct CutGlyphs {
    start: Point,
    end: Point,
    metadata: CommandMetadata,
    state: Option<CutState>,
}

impl CutGlyphs {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            metadata: CommandMetadata::new("Cut"),
            state: None,
        }
    }

    /// Number of characters removed by the applied cut.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.removed.len())
    }
}

impl Command for CutGlyphs {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let before = Before::capture(doc);
        let clipboard = doc.clipboard_contents()?;
        let removed = doc.cut_glyphs(self.start, self.end)?;
        self.state = Some(CutState {
            before,
            clipboard,
            removed,
        });
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let state = captured(&mut self.state)?;
        for (offset, character) in &state.removed {
            doc.insert_character_at(*offset, *character)?;
        }
        doc.set_clipboard(&state.clipboard)?;
        state.before.restore(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "CutGlyphs"
    }
}

/// Insert the clipboard at a point.
#[derive(Debug)]
pub struct PasteGlyphs {
    at: Point,
    metadata: CommandMetadata,
    pasted: Option<(Before, Vec<usize>)>,
}

impl PasteGlyphs {
    #[must_use]
    pub fn new(at: Point) -> Self {
        Self {
            at,
            metadata: CommandMetadata::new("Paste"),
            pasted: None,
        }
    }
}

impl Command for PasteGlyphs {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let before = Before::capture(doc);
        let pasted = doc.paste_glyphs(self.at)?;
        let mut offsets = pasted
            .iter()
            .map(|glyph| doc.offset_of(*glyph))
            .collect::<Result<Vec<_>>>()?;
        offsets.sort_unstable();
        self.pasted = Some((before, offsets));
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let (before, offsets) = captured(&mut self.pasted)?;
        for offset in offsets.iter().rev() {
            doc.remove_character_at(*offset)?;
        }
        before.restore(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "PasteGlyphs"
    }
}

// =========================================================================
// Pages
// =========================================================================

/// Make another page current, by index.
#[derive(Debug)]
pub struct SetCurrentPage {
    index: usize,
    metadata: CommandMetadata,
    previous: Option<usize>,
}

impl SetCurrentPage {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            metadata: CommandMetadata::new(format!("Go to page {}", index + 1)),
            previous: None,
        }
    }
}

impl Command for SetCurrentPage {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        let previous = doc.current_page_index();
        doc.set_current_page_index(self.index)?;
        self.previous = Some(previous);
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let previous = captured(&mut self.previous)?;
        doc.set_current_page_index(previous)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "SetCurrentPage"
    }
}

// =========================================================================
// Cursor
// =========================================================================

/// Direction of a cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Left,
    Right,
}

#[derive(Debug)]
struct CursorStep {
    step: Step,
    metadata: CommandMetadata,
    previous: Option<usize>,
}

impl CursorStep {
    fn new(step: Step, description: &str) -> Self {
        Self {
            step,
            metadata: CommandMetadata::new(description),
            previous: None,
        }
    }

    fn execute(&mut self, doc: &mut Document) {
        self.previous = Some(doc.cursor_offset());
        match self.step {
            Step::Left => doc.move_cursor_left(),
            Step::Right => doc.move_cursor_right(),
        };
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        let previous = captured(&mut self.previous)?;
        doc.set_cursor_offset(previous);
        Ok(())
    }
}

/// Step the cursor one glyph back.
#[derive(Debug)]
pub struct MoveCursorLeft(CursorStep);

impl Default for MoveCursorLeft {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveCursorLeft {
    #[must_use]
    pub fn new() -> Self {
        Self(CursorStep::new(Step::Left, "Move cursor left"))
    }
}

impl Command for MoveCursorLeft {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        self.0.execute(doc);
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        self.0.unexecute(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.0.metadata
    }

    fn debug_name(&self) -> &'static str {
        "MoveCursorLeft"
    }
}

/// Step the cursor one glyph forward.
#[derive(Debug)]
pub struct MoveCursorRight(CursorStep);

impl Default for MoveCursorRight {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveCursorRight {
    #[must_use]
    pub fn new() -> Self {
        Self(CursorStep::new(Step::Right, "Move cursor right"))
    }
}

impl Command for MoveCursorRight {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        self.0.execute(doc);
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        self.0.unexecute(doc)
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.0.metadata
    }

    fn debug_name(&self) -> &'static str {
        "MoveCursorRight"
    }
}
