#![forbid(unsafe_code)]

//! Fixed-capacity ring buffer for undo/redo.
//!
//! Entries are never cleared when undone. Two counters decide what is
//! reachable:
//!
//! - `active`: entries that can be undone, clamped to `[0, capacity]`.
//! - `redoable`: undone entries still physically present.
//!
//! `head` is the next write slot and always sits one past the newest active
//! entry.
//!
//! # Invariants
//!
//! 1. `active + redoable <= capacity`
//! 2. `push` resets `redoable` to zero (a new edit drops the redo branch)
//! 3. Once full, `push` overwrites the oldest entry and `active` stays at capacity
//!
//! ```text
//! capacity 5, push 0..=7
//! ┌───┬───┬───┬───┬───┐
//! │ 5 │ 6 │ 7 │ 3 │ 4 │   head = 3, active = 5, redoable = 0
//! └───┴───┴───┴───┴───┘
//!
//! pop() -> 7
//! ┌───┬───┬───┬───┬───┐
//! │ 5 │ 6 │ 7 │ 3 │ 4 │   head = 2, active = 4, redoable = 1
//! └───┴───┴───┴───┴───┘
//! ```

use std::fmt;

use lexi_core::{CircularValue, LimitedValue};

/// Bounded undo/redo store.
pub struct BoundedHistory<T> {
    slots: Vec<Option<T>>,
    head: CircularValue,
    active: LimitedValue,
    redoable: usize,
}

impl<T> fmt::Debug for BoundedHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedHistory")
            .field("capacity", &self.capacity())
            .field("head", &self.head.get())
            .field("active", &self.active.get())
            .field("redoable", &self.redoable)
            .finish()
    }
}

impl<T> BoundedHistory<T> {
    /// Create an empty history. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: CircularValue::new(0, capacity),
            active: LimitedValue::new(0, capacity),
            redoable: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries that can be undone.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.get()
    }

    /// Number of entries that can be redone.
    #[must_use]
    pub fn redoable(&self) -> usize {
        self.redoable
    }

    /// True when nothing can be undone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.get() == 0
    }

    /// Record a new entry, dropping any redo branch.
    pub fn push(&mut self, item: T) {
        self.redoable = 0;
        let slot = self.head.post_increment();
        let evicted = self.active.is_at_bound();
        self.slots[slot] = Some(item);
        self.active.increment();
        tracing::trace!(
            target: "lexi.history",
            slot,
            active = self.active.get(),
            evicted,
            "entry pushed"
        );
    }

    /// Step back: the entry just excluded from the active range.
    pub fn pop(&mut self) -> Option<&mut T> {
        if self.active.get() == 0 {
            return None;
        }
        self.active.decrement();
        self.redoable += 1;
        let slot = self.head.decrement();
        tracing::trace!(target: "lexi.history", slot, active = self.active.get(), "entry popped");
        self.slots[slot].as_mut()
    }

    /// Step forward: the entry just included again.
    pub fn get_next(&mut self) -> Option<&mut T> {
        if self.redoable == 0 {
            return None;
        }
        self.redoable -= 1;
        self.active.increment();
        let slot = self.head.post_increment();
        tracing::trace!(target: "lexi.history", slot, active = self.active.get(), "entry restored");
        self.slots[slot].as_mut()
    }

    fn newest_slot(&self) -> usize {
        (self.head.get() + self.capacity() - 1) % self.capacity()
    }

    /// Entry the next `pop` would return.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.newest_slot()].as_ref()
    }

    /// Entry the next `get_next` would return.
    #[must_use]
    pub fn peek_redo(&self) -> Option<&T> {
        if self.redoable == 0 {
            return None;
        }
        self.slots[self.head.get()].as_ref()
    }

    /// Undoable entries, most recent first.
    pub fn iter_active(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        let newest = self.newest_slot();
        (0..self.active.get()).filter_map(move |age| {
            self.slots[(newest + capacity - age) % capacity].as_ref()
        })
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = CircularValue::new(0, self.capacity());
        self.active.reset();
        self.redoable = 0;
    }
}
