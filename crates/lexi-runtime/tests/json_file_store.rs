#![forbid(unsafe_code)]

//! JSON file store: round trips, missing and damaged files, and the
//! save/load commands running against a real file.

use lexi_doc::Document;
use lexi_layout::{Alignment, Compositor};
use lexi_runtime::{
    DocumentStore, Executor, InsertCharacter, JsonFileStore, LoadDocument, SaveDocument,
};

fn typed(compositor: Compositor, text: &str) -> Document {
    let mut doc = Document::new(compositor);
    for c in text.chars() {
        doc.insert_char(c).unwrap();
    }
    doc
}

#[test]
fn missing_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
    assert_eq!(store.name(), "json-file");
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    let mut doc = typed(Compositor::default().alignment(Alignment::Center), "lexi");
    doc.move_cursor_left();
    let snapshot = doc.snapshot().unwrap();

    store.save(&snapshot).unwrap();
    assert!(store.path().exists());
    assert!(!dir.path().join("doc.json.tmp").exists());

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.cursor, 3);

    let rebuilt = Document::from_snapshot(&loaded).unwrap();
    assert_eq!(rebuilt.snapshot().unwrap(), snapshot);
}

#[test]
fn file_carries_a_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    store
        .save(&typed(Compositor::default(), "v").snapshot().unwrap())
        .unwrap();
    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["document"]["cursor"], 1);
}

#[test]
fn corrupted_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, lexi_core::EditorError::Storage(_)));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    store
        .save(&typed(Compositor::default(), "ab").snapshot().unwrap())
        .unwrap();
    let raw = std::fs::read_to_string(store.path()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["version"] = serde_json::json!(99);
    std::fs::write(store.path(), value.to_string()).unwrap();

    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("version: 99"));
}

#[test]
fn clear_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    store
        .save(&typed(Compositor::default(), "x").snapshot().unwrap())
        .unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_and_load_commands_undo_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("doc.json"));
    let mut doc = Document::default();
    let mut executor = Executor::default();

    for c in "ab".chars() {
        executor.execute(&mut doc, InsertCharacter::new(c)).unwrap();
    }
    executor
        .execute(&mut doc, SaveDocument::new(store.clone()))
        .unwrap();
    executor.execute(&mut doc, InsertCharacter::new('c')).unwrap();
    executor
        .execute(&mut doc, LoadDocument::new(store.clone()))
        .unwrap();
    assert_eq!(doc.text(), "ab");

    assert_eq!(executor.undo(&mut doc).unwrap(), "Load document");
    assert_eq!(doc.text(), "abc");
    executor.undo(&mut doc).unwrap();
    assert_eq!(executor.undo(&mut doc).unwrap(), "Save document");
    assert!(!store.path().exists());

    executor.redo(&mut doc).unwrap();
    assert_eq!(store.load().unwrap().unwrap().text(), "ab");
}
