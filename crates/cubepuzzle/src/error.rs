use cubeprefs::MIN_PUZZLE_SIZE;
use thiserror::Error;

use crate::FaceMask;

/// Error constructing a puzzle or a rotation command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PuzzleError {
    #[error("puzzle size must be at least {MIN_PUZZLE_SIZE}, got {0}")]
    InvalidSize(usize),
    #[error("face mask {0} does not occur on a cube")]
    InvalidFaceMask(FaceMask),
    #[error("slice vector {0:?} must select exactly one axis")]
    MalformedSliceVector([i32; 3]),
    #[error("slice index {index} is out of range for a puzzle of size {size}")]
    SliceOutOfRange { index: usize, size: usize },
}
