//! Screen-space geometry used to resolve a 2D cursor into a face of a 3D
//! puzzle: viewport projection, quadrilateral containment, and winding
//! classification.

pub use approx;

/// Floating-point type used for geometry.
pub type Float = f32;

/// Small floating-point value used for comparisons and tiny offsets.
pub const EPSILON: Float = 0.000001;

/// Squared length below which a projected edge or line direction is considered
/// degenerate.
pub const DEGENERATE_EPSILON: Float = 0.000001;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr, epsilon = $eps:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $eps)
    };
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
}

pub mod approx_cmp;
pub mod projection;
pub mod quad;
pub mod sign;
pub mod winding;

pub use projection::{Viewport, project_point};
pub use quad::Quad;
pub use sign::Sign;
pub use winding::{Winding, WindingErrors};
