//! Bounding-quad geometry.
//!
//! Coordinates are normalized to `[0, 1]` on each page axis, with `y`
//! growing downwards. Quads are not re-validated; blocks without a usable
//! polygon are dropped while decoding the layout result.

use serde::{Deserialize, Serialize};

/// A 2D point in normalized page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position (0 = top of the page)
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Four corner points in clockwise order starting at the top-left:
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingQuad {
    /// Corner points
    pub points: [Point; 4],
}

impl BoundingQuad {
    /// Create a quad from its four corners.
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Create an axis-aligned quad from its edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new([
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ])
    }

    /// Left edge (x of the top-left corner).
    pub fn left(&self) -> f64 {
        self.points[0].x
    }

    /// Right edge (x of the bottom-right corner).
    pub fn right(&self) -> f64 {
        self.points[2].x
    }

    /// Top edge (y of the top-left corner).
    pub fn top(&self) -> f64 {
        self.points[0].y
    }

    /// Bottom edge (y of the bottom-right corner).
    pub fn bottom(&self) -> f64 {
        self.points[2].y
    }

    /// X of the top-right corner, used as a column's provisional right edge.
    pub fn top_right_x(&self) -> f64 {
        self.points[1].x
    }

    /// Vertical span as `(top, bottom)`.
    pub fn vertical_span(&self) -> (f64, f64) {
        (self.top(), self.bottom())
    }

    /// Check whether two quads share any vertical extent (touching counts).
    pub fn vertical_overlap(&self, other: &BoundingQuad) -> bool {
        self.top() <= other.bottom() && self.bottom() >= other.top()
    }

    /// Check whether the four derived edges are exactly equal.
    pub fn exact_match(&self, other: &BoundingQuad) -> bool {
        self.left() == other.left()
            && self.right() == other.right()
            && self.top() == other.top()
            && self.bottom() == other.bottom()
    }

    /// Check whether every derived edge differs by at most `tolerance`.
    ///
    /// A tolerance of `0.0` is the same as [`exact_match`](Self::exact_match).
    pub fn edges_match(&self, other: &BoundingQuad, tolerance: f64) -> bool {
        if tolerance <= 0.0 {
            return self.exact_match(other);
        }
        (self.left() - other.left()).abs() <= tolerance
            && (self.right() - other.right()).abs() <= tolerance
            && (self.top() - other.top()).abs() <= tolerance
            && (self.bottom() - other.bottom()).abs() <= tolerance
    }

    /// Scale every point by the page dimensions, producing normalized coordinates.
    pub fn normalized(&self, width: f64, height: f64) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x /= width;
            p.y /= height;
        }
        Self { points }
    }
}

/// Check whether two quads share any vertical extent.
pub fn vertical_overlap(a: &BoundingQuad, b: &BoundingQuad) -> bool {
    a.vertical_overlap(b)
}

/// Check whether two quads have exactly equal edges.
pub fn exact_match(a: &BoundingQuad, b: &BoundingQuad) -> bool {
    a.exact_match(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_accessors() {
        let quad = BoundingQuad::new([
            Point::new(0.1, 0.2),
            Point::new(0.45, 0.21),
            Point::new(0.4, 0.3),
            Point::new(0.1, 0.3),
        ]);
        assert_eq!(quad.left(), 0.1);
        assert_eq!(quad.right(), 0.4);
        assert_eq!(quad.top(), 0.2);
        assert_eq!(quad.bottom(), 0.3);
        assert_eq!(quad.top_right_x(), 0.45);
    }

    #[test]
    fn test_vertical_overlap() {
        let a = BoundingQuad::from_edges(0.1, 0.1, 0.4, 0.2);
        let b = BoundingQuad::from_edges(0.6, 0.15, 0.9, 0.25);
        let c = BoundingQuad::from_edges(0.6, 0.2, 0.9, 0.3);
        let d = BoundingQuad::from_edges(0.6, 0.21, 0.9, 0.3);

        assert!(vertical_overlap(&a, &b));
        assert!(vertical_overlap(&b, &a));
        // Touching edges overlap
        assert!(vertical_overlap(&a, &c));
        assert!(!vertical_overlap(&a, &d));
    }

    #[test]
    fn test_exact_match() {
        let a = BoundingQuad::from_edges(0.1, 0.1, 0.4, 0.2);
        let b = BoundingQuad::from_edges(0.1, 0.1, 0.4, 0.2);
        let c = BoundingQuad::from_edges(0.1, 0.1, 0.4, 0.2000001);

        assert!(exact_match(&a, &b));
        assert!(!exact_match(&a, &c));
        assert!(a.edges_match(&c, 0.001));
        assert!(!a.edges_match(&c, 0.0));
    }

    #[test]
    fn test_normalized() {
        let quad = BoundingQuad::from_edges(1.0, 2.0, 4.25, 5.5);
        let n = quad.normalized(8.5, 11.0);
        assert_eq!(n.left(), 1.0 / 8.5);
        assert_eq!(n.right(), 0.5);
        assert_eq!(n.bottom(), 0.5);
    }
}
