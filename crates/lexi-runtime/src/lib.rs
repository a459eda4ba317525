#![forbid(unsafe_code)]

//! Runtime layer of the Lexi editor core: reversible commands, a bounded
//! undo/redo executor, and persistence stores.
//!
//! # Example
//!
//! ```
//! use lexi_doc::Document;
//! use lexi_runtime::{Executor, InsertCharacter};
//!
//! let mut doc = Document::default();
//! let mut executor = Executor::default();
//! executor.execute(&mut doc, InsertCharacter::new('a')).unwrap();
//! executor.execute(&mut doc, InsertCharacter::new('b')).unwrap();
//! executor.undo(&mut doc).unwrap();
//! assert_eq!(doc.text(), "a");
//! executor.redo(&mut doc).unwrap();
//! assert_eq!(doc.text(), "ab");
//! ```
//!
//! # Feature Flags
//!
//! - `persistence`: enables [`JsonFileStore`] (serde_json).

pub mod commands;
pub mod executor;
pub mod persistence;
pub mod undo;

pub use commands::{
    CopyGlyphs, CutGlyphs, InsertCharacter, MoveCursorLeft, MoveCursorRight, PasteGlyphs,
    RemoveCharacter, SetCurrentPage,
};
pub use executor::{Executor, ExecutorConfig};
#[cfg(feature = "persistence")]
pub use persistence::JsonFileStore;
pub use persistence::{DocumentStore, LoadDocument, MemoryStore, SaveDocument};
pub use undo::{BoundedHistory, Command, CommandBatch, CommandMetadata, CommandResult, CommandSource};
