use serde::{Deserialize, Serialize};

/// Distance (in pixels) the cursor must be dragged before a drag turns the
/// puzzle.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionPreferences {
    /// Whether faces seen from behind are ignored when picking.
    pub cull_back_faces: bool,
    pub drag_threshold: f32,
}
impl Default for InteractionPreferences {
    fn default() -> Self {
        Self {
            cull_back_faces: true,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}
