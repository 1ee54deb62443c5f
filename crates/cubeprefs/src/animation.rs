use serde::{Deserialize, Serialize};

/// Angular speed of slice turns, in radians per second.
pub const DEFAULT_ROTATION_SPEED: f32 = 5.0;
/// Remaining angle (in radians) below which a turn is considered finished.
pub const DEFAULT_SETTLE_EPSILON: f32 = 0.0001;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationPreferences {
    pub rotation_speed: f32,
    pub settle_epsilon: f32,
    pub concurrency: ConcurrencyMode,
}
impl Default for AnimationPreferences {
    fn default() -> Self {
        Self {
            rotation_speed: DEFAULT_ROTATION_SPEED,
            settle_epsilon: DEFAULT_SETTLE_EPSILON,
            concurrency: ConcurrencyMode::default(),
        }
    }
}

/// When the head of the rotation queue may start.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Wait until no cubelet is animating.
    #[default]
    Serial,
    /// Wait only until no cubelet in the head command's slice is animating.
    IndependentSlices,
}
