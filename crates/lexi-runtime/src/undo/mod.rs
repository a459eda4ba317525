#![forbid(unsafe_code)]

//! Undo/redo for document edits.
//!
//! Edits are [`Command`]s. The [`Executor`](crate::Executor) runs them and
//! records them in a [`BoundedHistory`], a ring buffer whose capacity bounds
//! the undo depth.
//!
//! ```text
//!   execute(cmd) ──► cmd.execute(doc) ──► history.push(cmd)
//!   undo()       ──► history.pop()      ──► cmd.unexecute(doc)
//!   redo()       ──► history.get_next() ──► cmd.redo(doc)
//! ```
//!
//! # Module Structure
//!
//! - [`command`]: the `Command` trait, metadata and batches
//! - [`history`]: the ring buffer

pub mod command;
pub mod history;

pub use command::{Command, CommandBatch, CommandMetadata, CommandResult, CommandSource};
pub use history::BoundedHistory;
