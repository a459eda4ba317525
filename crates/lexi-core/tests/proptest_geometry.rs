#![forbid(unsafe_code)]

//! Property-based tests for geometry and counters.
//!
//! 1. Validated construction is an identity on non-negative input
//! 2. Intersection is reflexive (zero-size included) and symmetric
//! 3. Border points are contained
//! 4. Counters stay inside their bounds under any step sequence

use lexi_core::{CircularValue, LimitedValue, Point, Rect};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0i32..2000, 0i32..2000, 0i32..500, 0i32..500).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Up), Just(Step::Down)]
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Construction round trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn checked_construction_is_identity(
        x in 0i32..10_000, y in 0i32..10_000, w in 0i32..10_000, h in 0i32..10_000,
    ) {
        let rect = Rect::checked(x, y, w, h).unwrap();
        prop_assert_eq!((rect.x, rect.y, rect.width, rect.height), (x, y, w, h));
        prop_assert_eq!(rect.right(), x + w);
        prop_assert_eq!(rect.bottom(), y + h);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Intersection
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersects_is_reflexive(rect in rect_strategy()) {
        prop_assert!(rect.intersects(&rect));
    }

    #[test]
    fn intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn all_corners_are_contained(rect in rect_strategy()) {
        for corner in [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.x, rect.bottom()),
            Point::new(rect.right(), rect.bottom()),
        ] {
            prop_assert!(rect.contains(corner));
        }
        prop_assert!(!rect.contains(Point::new(rect.right() + 1, rect.y)));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Counters stay bounded
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn circular_value_stays_below_bound(
        bound in 1usize..50,
        start in 0usize..100,
        steps in proptest::collection::vec(step_strategy(), 0..200),
    ) {
        let mut value = CircularValue::new(start, bound);
        let mut model = start % bound;
        for step in steps {
            match step {
                Step::Up => {
                    value.increment();
                    model = (model + 1) % bound;
                }
                Step::Down => {
                    value.decrement();
                    model = (model + bound - 1) % bound;
                }
            }
            prop_assert!(value.get() < bound);
            prop_assert_eq!(value.get(), model);
        }
    }

    #[test]
    fn limited_value_stays_in_range(
        bound in 0usize..50,
        steps in proptest::collection::vec(step_strategy(), 0..200),
    ) {
        let mut value = LimitedValue::new(0, bound);
        for step in steps {
            match step {
                Step::Up => value.increment(),
                Step::Down => value.decrement(),
            };
            prop_assert!(value.get() <= bound);
        }
    }
}
