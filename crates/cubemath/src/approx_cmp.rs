//! Approximate comparison.

use crate::Float;

/// Returns `x`, or zero if it is within `epsilon` of zero.
pub fn snap_to_zero(x: Float, epsilon: Float) -> Float {
    match approx::abs_diff_eq!(x, 0.0, epsilon = epsilon) {
        true => 0.0,
        false => x,
    }
}
