#![forbid(unsafe_code)]

//! Property-based invariant tests for undo/redo.
//!
//! 1. `BoundedHistory` behaves like a depth-bounded pair of stacks
//! 2. k undos after k commands restore every intermediate document state
//! 3. k redos after that restore the final state
//! 4. Failed commands leave the document and history untouched
//! 5. All of the above hold while editing a page other than the first

use std::collections::VecDeque;

use lexi_core::Point;
use lexi_doc::{Document, DocumentSnapshot};
use lexi_layout::{Compositor, Sides};
use lexi_runtime::{
    BoundedHistory, Command, CopyGlyphs, CutGlyphs, Executor, ExecutorConfig, InsertCharacter,
    MoveCursorLeft, MoveCursorRight, PasteGlyphs, RemoveCharacter, SetCurrentPage,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum HistoryOp {
    Push(u8),
    Pop,
    GetNext,
}

fn history_op_strategy() -> impl Strategy<Value = HistoryOp> {
    prop_oneof![
        3 => any::<u8>().prop_map(HistoryOp::Push),
        2 => Just(HistoryOp::Pop),
        2 => Just(HistoryOp::GetNext),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Insert(char),
    Remove,
    Left,
    Right,
    CopyRect(Point, Point),
    CutRect(Point, Point),
    Paste(Point),
    Page(usize),
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (0i32..44, 0i32..34).prop_map(|(x, y)| Point::new(x, y))
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        6 => proptest::char::range('a', 'z').prop_map(Edit::Insert),
        2 => Just(Edit::Remove),
        1 => Just(Edit::Left),
        1 => Just(Edit::Right),
        1 => (point_strategy(), point_strategy()).prop_map(|(a, b)| Edit::CopyRect(a, b)),
        1 => (point_strategy(), point_strategy()).prop_map(|(a, b)| Edit::CutRect(a, b)),
        2 => point_strategy().prop_map(Edit::Paste),
        1 => (0usize..3).prop_map(Edit::Page),
    ]
}

fn command(edit: Edit) -> Box<dyn Command> {
    match edit {
        Edit::Insert(c) => Box::new(InsertCharacter::new(c)),
        Edit::Remove => Box::new(RemoveCharacter::new()),
        Edit::Left => Box::new(MoveCursorLeft::new()),
        Edit::Right => Box::new(MoveCursorRight::new()),
        Edit::CopyRect(a, b) => Box::new(CopyGlyphs::new(a, b)),
        Edit::CutRect(a, b) => Box::new(CutGlyphs::new(a, b)),
        Edit::Paste(at) => Box::new(PasteGlyphs::new(at)),
        Edit::Page(index) => Box::new(SetCurrentPage::new(index)),
    }
}

/// Narrow pages so that edits wrap rows and spill onto new pages.
fn small_document() -> Document {
    Document::new(
        Compositor::default()
            .page_size(40, 30)
            .margins(Sides::all(2))
            .char_width(4)
            .row_height(3)
            .line_spacing(1),
    )
}

/// Eight characters per page, so most scripts reach a second page.
fn tiny_document() -> Document {
    Document::new(
        Compositor::default()
            .page_size(20, 12)
            .margins(Sides::all(2))
            .char_width(4)
            .row_height(3)
            .line_spacing(1),
    )
}

fn state(doc: &Document) -> DocumentSnapshot {
    doc.snapshot().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// Ring buffer model
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_matches_stack_model(
        capacity in 1usize..8,
        ops in proptest::collection::vec(history_op_strategy(), 0..120),
    ) {
        let mut history = BoundedHistory::new(capacity);
        let mut undo: VecDeque<u8> = VecDeque::new();
        let mut redo: Vec<u8> = Vec::new();
        for op in ops {
            match op {
                HistoryOp::Push(value) => {
                    history.push(value);
                    undo.push_back(value);
                    if undo.len() > capacity {
                        undo.pop_front();
                    }
                    redo.clear();
                }
                HistoryOp::Pop => {
                    let expected = undo.pop_back();
                    if let Some(value) = expected {
                        redo.push(value);
                    }
                    prop_assert_eq!(history.pop().copied(), expected);
                }
                HistoryOp::GetNext => {
                    let expected = redo.pop();
                    if let Some(value) = expected {
                        undo.push_back(value);
                    }
                    prop_assert_eq!(history.get_next().copied(), expected);
                }
            }
            prop_assert_eq!(history.active(), undo.len());
            prop_assert_eq!(history.redoable(), redo.len());
            prop_assert_eq!(history.is_empty(), undo.is_empty());
            prop_assert!(history.active() + history.redoable() <= capacity);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Document round trips
// ═══════════════════════════════════════════════════════════════════════

fn assert_round_trips(mut doc: Document, edits: Vec<Edit>) -> Result<(), TestCaseError> {
    let mut executor = Executor::new(ExecutorConfig::new(64));
    let mut states = vec![state(&doc)];

    for edit in edits {
        let before = state(&doc);
        let depth = executor.undo_depth();
        match executor.execute_boxed(&mut doc, command(edit)) {
            Ok(()) => states.push(state(&doc)),
            Err(_) => {
                prop_assert_eq!(state(&doc), before);
                prop_assert_eq!(executor.undo_depth(), depth);
            }
        }
    }

    let last = states.len() - 1;
    for expected in states.iter().rev().skip(1) {
        executor.undo(&mut doc).unwrap();
        prop_assert_eq!(&state(&doc), expected);
    }
    prop_assert!(executor.undo(&mut doc).unwrap_err().is_history_empty());

    for expected in states.iter().skip(1) {
        executor.redo(&mut doc).unwrap();
        prop_assert_eq!(&state(&doc), expected);
    }
    prop_assert!(executor.redo(&mut doc).unwrap_err().is_history_empty());
    prop_assert_eq!(state(&doc), states[last].clone());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_restores_each_prior_state(
        edits in proptest::collection::vec(edit_strategy(), 0..40),
    ) {
        assert_round_trips(small_document(), edits)?;
    }

    #[test]
    fn undo_restores_state_across_pages(
        edits in proptest::collection::vec(edit_strategy(), 0..40),
    ) {
        assert_round_trips(tiny_document(), edits)?;
    }
}
