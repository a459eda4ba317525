#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Glyph geometry is measured in signed integers so that a bad move or a
//! negative size coming from outside can be detected and rejected, instead of
//! wrapping around. The tree only ever stores non-negative values.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// An integer point in document coordinates (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by the given offsets.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] if a coordinate overflows.
    pub fn offset(self, dx: i32, dy: i32) -> Result<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Ok(Self::new(x, y)),
            _ => Err(EditorError::InvalidGeometry {
                x: self.x,
                y: self.y,
                width: 0,
                height: 0,
            }),
        }
    }

    /// True when both coordinates are non-negative.
    #[inline]
    pub const fn is_non_negative(self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle holding a glyph's position and size.
///
/// Hit testing is inclusive of all four edges: the right border `x + width`
/// and the bottom border `y + height` belong to the rectangle. A zero-size
/// rectangle therefore still contains its own origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle. No validation is performed.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn at(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Create a validated rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] if any component is negative.
    pub fn checked(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        let rect = Self::new(x, y, width, height);
        rect.validate()?;
        Ok(rect)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right border (`x + width`, inside the rectangle). Saturates at
    /// `i32::MAX`.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom border (`y + height`, inside the rectangle). Saturates at
    /// `i32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point lies inside the rectangle, edges included.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check if two rectangles overlap or touch, edges and corners included.
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Check whether `x` falls within the horizontal span `[x, right]`.
    #[inline]
    pub const fn spans_x(&self, x: i32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Same rectangle moved to a new origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Same rectangle translated by the given offsets.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidGeometry`] naming the unmoved rectangle if the
    /// origin overflows.
    pub fn translate(self, dx: i32, dy: i32) -> Result<Self> {
        let origin = self.origin().offset(dx, dy).map_err(|_| self.invalid())?;
        Ok(self.with_origin(origin))
    }

    /// Create a new rectangle inside the current one with the given margin.
    ///
    /// Sizes saturate at zero when the margins exceed the rectangle.
    #[must_use]
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x.saturating_add(margin.left),
            y: self.y.saturating_add(margin.top),
            width: self.width.saturating_sub(margin.horizontal_sum()).max(0),
            height: self.height.saturating_sub(margin.vertical_sum()).max(0),
        }
    }

    /// Reject negative position or size, and borders past `i32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] naming the offending rectangle.
    pub fn validate(&self) -> Result<()> {
        let negative = self.x < 0 || self.y < 0 || self.width < 0 || self.height < 0;
        let overflows =
            self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none();
        if negative || overflows {
            return Err(self.invalid());
        }
        Ok(())
    }

    fn invalid(&self) -> EditorError {
        EditorError::InvalidGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Page margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<(i32, i32, i32, i32)> for Sides {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Sides};
    use crate::EditorError;

    #[test]
    fn borders_are_position_plus_size() {
        let rect = Rect::new(1, 2, 3, 4);
        assert_eq!(rect.right(), 4);
        assert_eq!(rect.bottom(), 6);
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(6, 8)));
        assert!(!rect.contains(Point::new(7, 3)));
        assert!(!rect.contains(Point::new(2, 9)));
        assert!(!rect.contains(Point::new(1, 3)));
    }

    #[test]
    fn zero_size_rect_intersects_itself() {
        let rect = Rect::new(5, 5, 0, 0);
        assert!(rect.intersects(&rect));
        assert!(rect.contains(Point::new(5, 5)));
    }

    #[test]
    fn corner_touch_counts_as_intersection() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 4, 2, 2);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&Rect::new(5, 0, 1, 1)));
    }

    #[test]
    fn inner_applies_margins() {
        let page = Rect::new(0, 0, 500, 1000);
        let column = page.inner(Sides::new(10, 40, 20, 30));
        assert_eq!(column, Rect::new(30, 10, 430, 970));
    }

    #[test]
    fn inner_saturates_at_zero() {
        let rect = Rect::new(0, 0, 10, 10);
        let inner = rect.inner(Sides::all(8));
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn checked_rejects_negative_components() {
        assert!(Rect::checked(0, 0, 0, 0).is_ok());
        for rect in [(-1, 0, 1, 1), (0, -1, 1, 1), (0, 0, -1, 1), (0, 0, 1, -1)] {
            let err = Rect::checked(rect.0, rect.1, rect.2, rect.3).unwrap_err();
            assert!(matches!(err, EditorError::InvalidGeometry { .. }));
        }
    }

    #[test]
    fn sides_tuple_is_top_right_bottom_left() {
        assert_eq!(Sides::from((1, 2, 3, 4)), Sides::new(1, 2, 3, 4));
        assert_eq!(Sides::new(1, 2, 3, 4).horizontal_sum(), 6);
        assert_eq!(Sides::new(1, 2, 3, 4).vertical_sum(), 4);
    }

    #[test]
    fn rect_serializes_as_named_fields() {
        let json = serde_json::to_string(&Rect::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"width":3,"height":4}"#);
    }

    #[test]
    fn point_offset() {
        assert_eq!(Point::new(3, 4).offset(-3, 1).unwrap(), Point::new(0, 5));
        assert!(!Point::new(0, -1).is_non_negative());
        assert!(Point::new(1, 0).offset(i32::MAX, 0).is_err());
        assert!(Point::new(0, -2).offset(0, i32::MIN).is_err());
    }

    #[test]
    fn translate_overflow_is_an_error() {
        let rect = Rect::new(1, 1, 2, 2);
        assert_eq!(rect.translate(4, 5).unwrap(), Rect::new(5, 6, 2, 2));
        let err = rect.translate(i32::MAX, 0).unwrap_err();
        assert_eq!(
            err,
            EditorError::InvalidGeometry {
                x: 1,
                y: 1,
                width: 2,
                height: 2
            }
        );
    }

    #[test]
    fn validate_rejects_borders_past_max() {
        assert!(Rect::checked(30, 10, i32::MAX, 5).is_err());
        assert!(Rect::checked(0, 1, 1, i32::MAX).is_err());
        assert!(Rect::checked(0, 0, i32::MAX, i32::MAX).is_ok());
    }

    #[test]
    fn borders_saturate() {
        let rect = Rect::new(i32::MAX, i32::MAX, 5, 5);
        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.bottom(), i32::MAX);
        assert!(rect.contains(Point::new(i32::MAX, i32::MAX)));
    }
}
