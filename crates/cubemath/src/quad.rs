//! Point-in-quadrilateral test for projected faces.
//!
//! A point is inside a quad if it lies between both pairs of opposite edges.
//! "Between two lines" is decided by dropping a perpendicular from the point
//! onto one line and extending it until it meets the other line: the point is
//! between them if it is closer to the first line than the second line is, and
//! the same holds with the lines swapped.

use cgmath::{EuclideanSpace, InnerSpace, MetricSpace, Point2, Vector2};
use itertools::Itertools;

use crate::{DEGENERATE_EPSILON, Float};

/// Quadrilateral in screen space, with corners listed in boundary order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad(pub [Point2<Float>; 4]);
impl Quad {
    /// Returns the four corners.
    pub fn corners(&self) -> &[Point2<Float>; 4] {
        &self.0
    }

    /// Returns the edge vectors `b-a`, `c-b`, `d-c`, `a-d`.
    pub fn edges(&self) -> [Vector2<Float>; 4] {
        let [a, b, c, d] = self.0;
        [b - a, c - b, d - c, a - d]
    }

    /// Returns the average of the four corners.
    pub fn centroid(&self) -> Point2<Float> {
        Point2::centroid(&self.0)
    }

    /// Returns whether `point` is strictly inside the quad.
    pub fn contains(&self, point: Point2<Float>) -> bool {
        let [a, b, c, d] = self.0;
        is_in_quad(point, a, b, c, d)
    }

    /// Returns whether any edge of the quad has (nearly) zero length.
    pub fn is_degenerate(&self) -> bool {
        self.0
            .iter()
            .circular_tuple_windows()
            .any(|(p, q)| p.distance2(*q) < DEGENERATE_EPSILON)
    }
}

/// Returns whether `p` lies inside the quad `a`, `b`, `c`, `d`.
///
/// The corners may be wound in either direction. Degenerate quads contain no
/// points.
pub fn is_in_quad(
    p: Point2<Float>,
    a: Point2<Float>,
    b: Point2<Float>,
    c: Point2<Float>,
    d: Point2<Float>,
) -> bool {
    is_between_lines(p, (a, b), (d, c)) && is_between_lines(p, (a, d), (b, c))
}

/// Returns whether `p` lies strictly between two (roughly parallel) lines, each
/// given by two points.
pub fn is_between_lines(
    p: Point2<Float>,
    line1: (Point2<Float>, Point2<Float>),
    line2: (Point2<Float>, Point2<Float>),
) -> bool {
    closer_than_opposite_line(p, line1, line2) && closer_than_opposite_line(p, line2, line1)
}

/// Returns whether `p` is closer to `near` than `far` is, measured along the
/// perpendicular from `p` to `near`.
fn closer_than_opposite_line(
    p: Point2<Float>,
    near: (Point2<Float>, Point2<Float>),
    far: (Point2<Float>, Point2<Float>),
) -> bool {
    let Some(foot) = foot_of_perpendicular(p, near.0, near.1 - near.0) else {
        return false;
    };
    let Some(intersection) = line_intersection((p, foot - p), (far.0, far.1 - far.0)) else {
        return false;
    };
    foot.distance2(p) < intersection.distance2(foot)
}

/// Returns the point on the line through `start` with direction `dir` that is
/// closest to `p`.
pub fn foot_of_perpendicular(
    p: Point2<Float>,
    start: Point2<Float>,
    dir: Vector2<Float>,
) -> Option<Point2<Float>> {
    let len2 = dir.magnitude2();
    if len2 < DEGENERATE_EPSILON {
        return None;
    }
    let s = dir.dot(p - start) / len2;
    Some(start + dir * s)
}

/// Returns the intersection of two lines, each given as a point and a
/// direction, or `None` if they are (nearly) parallel.
pub fn line_intersection(
    (p, d1): (Point2<Float>, Vector2<Float>),
    (q, d2): (Point2<Float>, Vector2<Float>),
) -> Option<Point2<Float>> {
    let denom = d1.perp_dot(d2);
    if denom.abs() <= DEGENERATE_EPSILON * d1.magnitude() * d2.magnitude() || denom == 0.0 {
        return None;
    }
    let t = (q - p).perp_dot(d2) / denom;
    Some(p + d1 * t)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::assert_approx_eq;

    fn unit_square() -> Quad {
        Quad([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_unit_square_containment() {
        let q = unit_square();
        assert!(q.contains(Point2::new(0.5, 0.5)));
        assert!(q.contains(Point2::new(0.01, 0.99)));
        assert!(!q.contains(Point2::new(1.5, 0.5)));
        assert!(!q.contains(Point2::new(-0.2, 0.5)));
        assert!(!q.contains(Point2::new(0.5, 1.01)));
        // Exactly on an edge is not inside.
        assert!(!q.contains(Point2::new(0.0, 0.5)));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let [a, b, c, d] = unit_square().0;
        let reversed = Quad([a, d, c, b]);
        assert!(reversed.contains(Point2::new(0.25, 0.75)));
        assert!(!reversed.contains(Point2::new(1.25, 0.75)));
    }

    #[test]
    fn test_trapezoid() {
        // Perspective-distorted face: wide at the bottom, narrow at the top.
        let q = Quad([
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(7.0, 0.0),
            Point2::new(3.0, 0.0),
        ]);
        assert!(q.contains(Point2::new(5.0, 5.0)));
        assert!(q.contains(Point2::new(1.0, 9.0)));
        assert!(!q.contains(Point2::new(1.0, 1.0)));
        assert!(!q.contains(Point2::new(9.0, 1.0)));
    }

    #[test]
    fn test_degenerate_quad_contains_nothing() {
        let p = Point2::new(2.0, 2.0);
        let q = Quad([p; 4]);
        assert!(q.is_degenerate());
        assert!(!q.contains(p));
        assert!(!q.contains(Point2::new(2.5, 2.0)));

        let sliver = Quad([
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert!(!sliver.contains(Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_foot_and_intersection() {
        let foot = foot_of_perpendicular(
            Point2::new(3.0, 4.0),
            Point2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
        );
        assert_approx_eq!(foot.unwrap(), Point2::new(3.0, 0.0));

        let x = line_intersection(
            (Point2::new(0.0, 0.0), Vector2::new(1.0, 1.0)),
            (Point2::new(0.0, 2.0), Vector2::new(1.0, -1.0)),
        );
        assert_approx_eq!(x.unwrap(), Point2::new(1.0, 1.0));

        let parallel = line_intersection(
            (Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0)),
            (Point2::new(0.0, 1.0), Vector2::new(-3.0, 0.0)),
        );
        assert_eq!(parallel, None);
    }

    proptest! {
        #[test]
        fn proptest_rectangle_containment(
            x0 in -500.0_f32..500.0,
            y0 in -500.0_f32..500.0,
            w in 1.0_f32..300.0,
            h in 1.0_f32..300.0,
            u in -0.5_f32..1.5,
            v in -0.5_f32..1.5,
        ) {
            // Keep away from the boundary, where rounding decides.
            prop_assume!((u.abs() > 0.01) && ((u - 1.0).abs() > 0.01));
            prop_assume!((v.abs() > 0.01) && ((v - 1.0).abs() > 0.01));

            let q = Quad([
                Point2::new(x0, y0),
                Point2::new(x0 + w, y0),
                Point2::new(x0 + w, y0 + h),
                Point2::new(x0, y0 + h),
            ]);
            let p = Point2::new(x0 + u * w, y0 + v * h);
            let expected = (0.0..1.0).contains(&u) && (0.0..1.0).contains(&v);
            prop_assert_eq!(q.contains(p), expected);
        }
    }
}
