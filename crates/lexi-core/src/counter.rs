#![forbid(unsafe_code)]

//! Bounded index arithmetic.
//!
//! Two small counters used by the undo ring:
//!
//! - [`CircularValue`] wraps modulo its bound (`bound - 1` then `0`).
//! - [`LimitedValue`] clamps into `[0, bound]`.
//!
//! # Invariants
//!
//! 1. `CircularValue::get() < bound()` always holds.
//! 2. `LimitedValue::get() <= bound()` always holds.

/// A counter that wraps around modulo `bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularValue {
    value: usize,
    bound: usize,
}

impl CircularValue {
    /// Create a counter starting at `value % bound`.
    ///
    /// A zero bound is treated as one, so the counter is pinned at zero.
    #[must_use]
    pub const fn new(value: usize, bound: usize) -> Self {
        let bound = if bound == 0 { 1 } else { bound };
        Self {
            value: value % bound,
            bound,
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> usize {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Advance by one, wrapping to zero after `bound - 1`. Returns the new value.
    pub fn increment(&mut self) -> usize {
        self.value = (self.value + 1) % self.bound;
        self.value
    }

    /// Step back by one, wrapping to `bound - 1` from zero. Returns the new value.
    pub fn decrement(&mut self) -> usize {
        self.value = if self.value == 0 {
            self.bound - 1
        } else {
            self.value - 1
        };
        self.value
    }

    /// Return the current value, then advance.
    pub fn post_increment(&mut self) -> usize {
        let prev = self.value;
        self.increment();
        prev
    }

    /// Return the current value, then step back.
    pub fn post_decrement(&mut self) -> usize {
        let prev = self.value;
        self.decrement();
        prev
    }
}

/// A counter clamped into `[0, bound]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitedValue {
    value: usize,
    bound: usize,
}

impl LimitedValue {
    /// Create a counter starting at `value`, clamped to `bound`.
    #[must_use]
    pub const fn new(value: usize, bound: usize) -> Self {
        let value = if value > bound { bound } else { value };
        Self { value, bound }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> usize {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// True when the counter sits at its upper bound.
    #[inline]
    #[must_use]
    pub const fn is_at_bound(&self) -> bool {
        self.value == self.bound
    }

    /// Advance by one, saturating at `bound`. Returns the new value.
    pub fn increment(&mut self) -> usize {
        if self.value < self.bound {
            self.value += 1;
        }
        self.value
    }

    /// Step back by one, saturating at zero. Returns the new value.
    pub fn decrement(&mut self) -> usize {
        self.value = self.value.saturating_sub(1);
        self.value
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_wraps_forward() {
        let mut v = CircularValue::new(3, 5);
        assert_eq!(v.increment(), 4);
        assert_eq!(v.increment(), 0);
        assert_eq!(v.increment(), 1);
    }

    #[test]
    fn circular_wraps_backward() {
        let mut v = CircularValue::new(1, 5);
        assert_eq!(v.decrement(), 0);
        assert_eq!(v.decrement(), 4);
        assert_eq!(v.decrement(), 3);
    }

    #[test]
    fn circular_post_ops_return_previous() {
        let mut v = CircularValue::new(4, 5);
        assert_eq!(v.post_increment(), 4);
        assert_eq!(v.get(), 0);
        assert_eq!(v.post_decrement(), 0);
        assert_eq!(v.get(), 4);
    }

    #[test]
    fn circular_initial_value_is_reduced() {
        assert_eq!(CircularValue::new(7, 5).get(), 2);
        assert_eq!(CircularValue::new(7, 0).get(), 0);
        assert_eq!(CircularValue::new(7, 0).bound(), 1);
    }

    #[test]
    fn limited_clamps_at_bound() {
        let mut v = LimitedValue::new(3, 4);
        assert_eq!(v.increment(), 4);
        assert!(v.is_at_bound());
        assert_eq!(v.increment(), 4);
    }

    #[test]
    fn limited_clamps_at_zero() {
        let mut v = LimitedValue::new(1, 4);
        assert_eq!(v.decrement(), 0);
        assert_eq!(v.decrement(), 0);
    }

    #[test]
    fn limited_initial_value_is_clamped() {
        assert_eq!(LimitedValue::new(10, 4).get(), 4);
        let mut v = LimitedValue::new(2, 4);
        v.reset();
        assert_eq!(v.get(), 0);
    }
}
