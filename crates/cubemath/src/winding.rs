//! Winding classification of projected quads.
//!
//! A face's corners are listed in the same order for every face, so the
//! direction in which they wind on screen tells whether the face is seen from
//! the front or from behind. Rather than a signed area, each hypothesis is
//! matched against the expected sequence of edge directions and scored by how
//! far the edges stray from the screen axes. The better-scoring hypothesis
//! wins.

use std::fmt;

use cgmath::Vector2;

use crate::Float;
use crate::quad::Quad;

/// Direction in which a quad's corners wind in screen space (Y down).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Left, up, right, down.
    Clockwise,
    /// Up, left, down, right.
    CounterClockwise,
}
impl fmt::Display for Winding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winding::Clockwise => write!(f, "clockwise"),
            Winding::CounterClockwise => write!(f, "counterclockwise"),
        }
    }
}

/// Alignment error of each winding hypothesis for a quad. `None` means that the
/// edges do not follow the hypothesis's pattern in any rotation.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct WindingErrors {
    /// Error of the clockwise hypothesis.
    pub clockwise: Option<Float>,
    /// Error of the counterclockwise hypothesis.
    pub counter_clockwise: Option<Float>,
}
impl WindingErrors {
    /// Scores both hypotheses for `quad`.
    pub fn of(quad: &Quad) -> Self {
        let edges = quad.edges();
        Self {
            clockwise: clockwise_error(edges),
            counter_clockwise: counter_clockwise_error(edges),
        }
    }

    /// Returns the hypothesis with strictly lower error, or `None` if neither
    /// pattern matches.
    pub fn best(&self) -> Option<Winding> {
        match (self.clockwise, self.counter_clockwise) {
            (Some(cw), Some(ccw)) if ccw < cw => Some(Winding::CounterClockwise),
            (Some(_), _) => Some(Winding::Clockwise),
            (None, Some(_)) => Some(Winding::CounterClockwise),
            (None, None) => None,
        }
    }
}

/// Returns the mean ratio of off-axis to on-axis movement of the edges, for the
/// first rotation of `edges` in which they go left, up, right, then down.
pub fn clockwise_error(edges: [Vector2<Float>; 4]) -> Option<Float> {
    first_matching_rotation(edges, |[e0, e1, e2, e3]| {
        (e0.x < 0.0 && e1.y < 0.0 && e2.x > 0.0 && e3.y > 0.0).then(|| {
            mean_abs([e0.y / e0.x, e1.x / e1.y, e2.y / e2.x, e3.x / e3.y])
        })
    })
}

/// Returns the mean ratio of off-axis to on-axis movement of the edges, for the
/// first rotation of `edges` in which they go up, left, down, then right.
pub fn counter_clockwise_error(edges: [Vector2<Float>; 4]) -> Option<Float> {
    first_matching_rotation(edges, |[e0, e1, e2, e3]| {
        (e0.y < 0.0 && e1.x < 0.0 && e2.y > 0.0 && e3.x > 0.0).then(|| {
            mean_abs([e0.x / e0.y, e1.y / e1.x, e2.x / e2.y, e3.y / e3.x])
        })
    })
}

/// Tries each rotation of `edges`, starting with the edge from the first
/// corner, and returns the score of the first one that matches.
fn first_matching_rotation(
    edges: [Vector2<Float>; 4],
    score: impl Fn([Vector2<Float>; 4]) -> Option<Float>,
) -> Option<Float> {
    (0..4).find_map(|i| score(std::array::from_fn(|j| edges[(i + j) % 4])))
}

fn mean_abs(values: [Float; 4]) -> Float {
    values.iter().map(|v| v.abs()).sum::<Float>() / 4.0
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;
    use pretty_assertions::assert_eq;

    use super::*;

    fn quad(points: [(Float, Float); 4]) -> Quad {
        Quad(points.map(|(x, y)| Point2::new(x, y)))
    }

    #[test]
    fn test_clockwise_unit_square() {
        // Left, up, right, down with Y pointing down.
        let q = quad([(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)]);
        let errors = WindingErrors::of(&q);
        assert_eq!(errors.clockwise, Some(0.0));
        assert_eq!(errors.counter_clockwise, None);
        assert_eq!(errors.best(), Some(Winding::Clockwise));
    }

    #[test]
    fn test_counter_clockwise_unit_square() {
        let q = quad([(1.0, 1.0), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0)]);
        let errors = WindingErrors::of(&q);
        assert_eq!(errors.clockwise, None);
        assert_eq!(errors.counter_clockwise, Some(0.0));
        assert_eq!(errors.best(), Some(Winding::CounterClockwise));
    }

    #[test]
    fn test_starting_corner_does_not_matter() {
        let corners = [(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)];
        for i in 0..4 {
            let rotated = std::array::from_fn(|j| corners[(i + j) % 4]);
            assert_eq!(WindingErrors::of(&quad(rotated)).best(), Some(Winding::Clockwise));
        }
    }

    #[test]
    fn test_skewed_clockwise_quad() {
        let q = quad([(10.0, 10.0), (0.0, 9.0), (1.0, 0.0), (9.0, 2.0)]);
        let errors = WindingErrors::of(&q);
        let cw = errors.clockwise.expect("clockwise pattern should match");
        assert!(cw > 0.0);
        assert!(errors.counter_clockwise.is_none_or(|ccw| cw < ccw));
        assert_eq!(errors.best(), Some(Winding::Clockwise));
    }

    #[test]
    fn test_error_comes_from_first_matching_rotation() {
        // Tilted square whose edges match the clockwise pattern starting from
        // both the first and the second edge; the first scores 3, the second
        // scores 1/3.
        let q = quad([(3.0, 0.0), (2.0, 3.0), (-1.0, 2.0), (0.0, -1.0)]);
        let errors = WindingErrors::of(&q);
        assert_eq!(errors.clockwise, Some(3.0));
        assert_eq!(errors.counter_clockwise, None);
        assert_eq!(errors.best(), Some(Winding::Clockwise));
    }

    #[test]
    fn test_degenerate_quad_has_no_winding() {
        let q = quad([(3.0, 3.0); 4]);
        assert_eq!(WindingErrors::of(&q).best(), None);
    }
}
