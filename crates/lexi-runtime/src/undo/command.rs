#![forbid(unsafe_code)]

//! Reversible command infrastructure.
//!
//! A command moves through `Unexecuted -> execute -> Executed -> unexecute ->
//! Unexecuted`. Whatever `unexecute` needs is captured as plain values while
//! `execute` runs; commands never keep glyph handles across that boundary,
//! because the document re-creates glyphs on undo.
//!
//! # Invariants
//!
//! - `execute()` followed by `unexecute()` restores the prior document state
//! - `unexecute()` followed by `redo()` restores the executed state
//! - A command whose `execute()` failed left the document unchanged

use std::fmt;

use lexi_core::Result;
use lexi_doc::Document;
use web_time::Instant;

/// Who or what triggered a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandSource {
    /// Direct user action (keyboard, mouse).
    #[default]
    User,
    /// Triggered programmatically by application code.
    Programmatic,
    /// Replayed from a recorded macro.
    Macro,
    /// Triggered by an external system.
    External,
}

/// Metadata attached to every command for tracing and UI display.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Human-readable description (e.g. "Insert character").
    pub description: String,
    /// When the command was created.
    pub timestamp: Instant,
    pub source: CommandSource,
    /// Optional id shared by commands of one batch.
    pub batch_id: Option<u64>,
}

impl CommandMetadata {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            timestamp: Instant::now(),
            source: CommandSource::User,
            batch_id: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: CommandSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_batch(mut self, batch_id: u64) -> Self {
        self.batch_id = Some(batch_id);
        self
    }
}

impl Default for CommandMetadata {
    fn default() -> Self {
        Self::new("Unknown")
    }
}

/// Result of executing or reverting a command.
pub type CommandResult = Result<()>;

/// A reversible edit applied to a [`Document`].
pub trait Command {
    /// Apply the edit, capturing what `unexecute` needs.
    fn execute(&mut self, doc: &mut Document) -> CommandResult;

    /// Revert the edit.
    fn unexecute(&mut self, doc: &mut Document) -> CommandResult;

    /// Re-apply after `unexecute`.
    fn redo(&mut self, doc: &mut Document) -> CommandResult {
        self.execute(doc)
    }

    fn metadata(&self) -> &CommandMetadata;

    /// Human-readable description for UI display.
    fn description(&self) -> &str {
        &self.metadata().description
    }

    fn debug_name(&self) -> &'static str {
        "Command"
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.debug_name())
            .field("description", &self.description())
            .field("source", &self.metadata().source)
            .finish()
    }
}

/// Commands that execute and revert as one history entry.
///
/// A failure part-way through `execute` reverts the commands that already
/// ran, so the batch is all or nothing.
pub struct CommandBatch {
    commands: Vec<Box<dyn Command>>,
    metadata: CommandMetadata,
    /// Number of leading commands currently applied.
    executed_to: usize,
}

impl fmt::Debug for CommandBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("commands_count", &self.commands.len())
            .field("metadata", &self.metadata)
            .field("executed_to", &self.executed_to)
            .finish()
    }
}

impl CommandBatch {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            metadata: CommandMetadata::new(description),
            executed_to: 0,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: CommandSource) -> Self {
        self.metadata = self.metadata.with_source(source);
        self
    }

    /// Append a command (builder style).
    #[must_use]
    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.push(Box::new(command));
        self
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for CommandBatch {
    fn execute(&mut self, doc: &mut Document) -> CommandResult {
        for i in 0..self.commands.len() {
            if let Err(err) = self.commands[i].execute(doc) {
                for j in (0..i).rev() {
                    if let Err(rollback) = self.commands[j].unexecute(doc) {
                        tracing::warn!(
                            target: "lexi.executor",
                            command = self.commands[j].debug_name(),
                            error = %rollback,
                            "batch rollback failed"
                        );
                    }
                }
                self.executed_to = 0;
                return Err(err);
            }
            self.executed_to = i + 1;
        }
        Ok(())
    }

    fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
        for i in (0..self.executed_to).rev() {
            self.commands[i].unexecute(doc)?;
            self.executed_to = i;
        }
        Ok(())
    }

    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn debug_name(&self) -> &'static str {
        "CommandBatch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::EditorError;

    struct Recorder {
        metadata: CommandMetadata,
        symbol: char,
        fail: bool,
    }

    impl Recorder {
        fn new(symbol: char) -> Self {
            Self {
                metadata: CommandMetadata::new(format!("type {symbol}")),
                symbol,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new('!')
            }
        }
    }

    impl Command for Recorder {
        fn execute(&mut self, doc: &mut Document) -> CommandResult {
            if self.fail {
                return Err(EditorError::NullGlyph);
            }
            doc.insert_char(self.symbol).map(|_| ())
        }

        fn unexecute(&mut self, doc: &mut Document) -> CommandResult {
            doc.remove_char().map(|_| ())
        }

        fn metadata(&self) -> &CommandMetadata {
            &self.metadata
        }
    }

    #[test]
    fn metadata_builder() {
        let meta = CommandMetadata::new("Paste")
            .with_source(CommandSource::Macro)
            .with_batch(7);
        assert_eq!(meta.description, "Paste");
        assert_eq!(meta.source, CommandSource::Macro);
        assert_eq!(meta.batch_id, Some(7));
        assert_eq!(CommandMetadata::default().description, "Unknown");
        assert_eq!(CommandSource::default(), CommandSource::User);
    }

    #[test]
    fn batch_runs_in_order_and_reverts_in_reverse() {
        let mut doc = Document::default();
        let mut batch = CommandBatch::new("Type ab")
            .with(Recorder::new('a'))
            .with(Recorder::new('b'));
        assert_eq!(batch.len(), 2);
        batch.execute(&mut doc).unwrap();
        assert_eq!(doc.text(), "ab");
        batch.unexecute(&mut doc).unwrap();
        assert_eq!(doc.text(), "");
        batch.redo(&mut doc).unwrap();
        assert_eq!(doc.text(), "ab");
        assert_eq!(batch.description(), "Type ab");
    }

    #[test]
    fn batch_failure_rolls_back() {
        let mut doc = Document::default();
        let mut batch = CommandBatch::new("Broken")
            .with(Recorder::new('a'))
            .with(Recorder::failing());
        assert_eq!(batch.execute(&mut doc), Err(EditorError::NullGlyph));
        assert_eq!(doc.text(), "");
        batch.unexecute(&mut doc).unwrap();
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn debug_uses_command_name() {
        let batch = CommandBatch::new("Empty");
        assert!(batch.is_empty());
        let boxed: Box<dyn Command> = Box::new(batch);
        let rendered = format!("{boxed:?}");
        assert!(rendered.starts_with("CommandBatch"));
        assert!(rendered.contains("Empty"));
    }
}
