#![forbid(unsafe_code)]

//! Command executor with bounded undo/redo.
//!
//! # Failure policy
//!
//! - A command whose `execute` fails is dropped, history is untouched.
//! - Undo or redo with nothing available returns
//!   [`EditorError::HistoryEmpty`], a recoverable no-op.
//! - A failed `unexecute` or `redo` leaves the entry on the side it came
//!   from, so the counters keep matching the document.

use std::fmt;

use lexi_core::{EditorError, HistoryDirection, Result};
use lexi_doc::Document;

use crate::undo::{BoundedHistory, Command};

/// Executor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of undoable commands.
    pub capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl ExecutorConfig {
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

/// Runs commands against a document and remembers them for undo.
pub struct Executor {
    history: BoundedHistory<Box<dyn Command>>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("history", &self.history)
            .field("next_undo", &self.next_undo_description())
            .field("next_redo", &self.next_redo_description())
            .finish()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl Executor {
    #[must_use]
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            history: BoundedHistory::new(config.capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Execute `command` and record it. Pending redo entries are dropped.
    ///
    /// # Errors
    ///
    /// Whatever the command reports. It is not recorded in that case.
    pub fn execute(&mut self, doc: &mut Document, command: impl Command + 'static) -> Result<()> {
        self.execute_boxed(doc, Box::new(command))
    }

    /// [`execute`](Self::execute) for an already boxed command.
    pub fn execute_boxed(&mut self, doc: &mut Document, mut command: Box<dyn Command>) -> Result<()> {
        if let Err(err) = command.execute(doc) {
            tracing::warn!(
                target: "lexi.executor",
                command = command.debug_name(),
                error = %err,
                "command failed"
            );
            return Err(err);
        }
        tracing::debug!(
            target: "lexi.executor",
            command = command.debug_name(),
            description = command.description(),
            "command executed"
        );
        self.history.push(command);
        Ok(())
    }

    /// Revert the most recent command and return its description.
    ///
    /// # Errors
    ///
    /// - [`EditorError::HistoryEmpty`] when there is nothing to undo.
    /// - The command's own error if reverting failed.
    pub fn undo(&mut self, doc: &mut Document) -> Result<String> {
        let Some(command) = self.history.pop() else {
            tracing::debug!(target: "lexi.executor", "nothing to undo");
            return Err(EditorError::HistoryEmpty(HistoryDirection::Undo));
        };
        let description = command.description().to_string();
        match command.unexecute(doc) {
            Ok(()) => {
                tracing::debug!(target: "lexi.executor", %description, "command undone");
                Ok(description)
            }
            Err(err) => {
                tracing::warn!(target: "lexi.executor", %description, error = %err, "undo failed");
                self.history.get_next();
                Err(err)
            }
        }
    }

    /// Re-apply the most recently undone command and return its description.
    ///
    /// # Errors
    ///
    /// - [`EditorError::HistoryEmpty`] when there is nothing to redo.
    /// - The command's own error if re-applying failed.
    pub fn redo(&mut self, doc: &mut Document) -> Result<String> {
        let Some(command) = self.history.get_next() else {
            tracing::debug!(target: "lexi.executor", "nothing to redo");
            return Err(EditorError::HistoryEmpty(HistoryDirection::Redo));
        };
        let description = command.description().to_string();
        match command.redo(doc) {
            Ok(()) => {
                tracing::debug!(target: "lexi.executor", %description, "command redone");
                Ok(description)
            }
            Err(err) => {
                tracing::warn!(target: "lexi.executor", %description, error = %err, "redo failed");
                self.history.pop();
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.redoable() > 0
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.active()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redoable()
    }

    /// Descriptions of undoable commands, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.history
            .iter_active()
            .take(limit)
            .map(|command| command.description())
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.history.peek_undo().map(|command| command.description())
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.history.peek_redo().map(|command| command.description())
    }

    /// Forget all history. The document is not touched.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
