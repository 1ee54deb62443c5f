use serde::{Deserialize, Serialize};

/// Smallest puzzle that has a well-defined shell of cubelets.
pub const MIN_PUZZLE_SIZE: usize = 2;

/// Edge length of a cubelet.
pub const DEFAULT_FACE_SCALE: f32 = 1.7;
/// Empty space between adjacent cubelets.
pub const DEFAULT_FACE_GAP: f32 = 0.05;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PuzzlePreferences {
    /// Number of cubelets along each edge.
    pub size: usize,
    pub face_scale: f32,
    pub face_gap: f32,
}
impl Default for PuzzlePreferences {
    fn default() -> Self {
        Self {
            size: 3,
            face_scale: DEFAULT_FACE_SCALE,
            face_gap: DEFAULT_FACE_GAP,
        }
    }
}
