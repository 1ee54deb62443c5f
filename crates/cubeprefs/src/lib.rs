//! User preferences.
//!
//! Defaults live in `default.yaml`, which is embedded in the binary. A user
//! preferences file, if given, is layered on top of it so that it only needs
//! to mention the keys it changes.

#![allow(missing_docs)] // field names are self-explanatory

#[macro_use]
extern crate lazy_static;

use std::path::Path;

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

mod animation;
mod interaction;
mod puzzle;

pub use animation::*;
pub use interaction::*;
pub use puzzle::*;

const PREFS_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_PREFS_STR: &str = include_str!("default.yaml");

lazy_static! {
    pub static ref DEFAULT_PREFS: Preferences =
        serde_norway::from_str(DEFAULT_PREFS_STR).expect("error loading default preferences");
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub puzzle: PuzzlePreferences,
    pub animation: AnimationPreferences,
    pub interaction: InteractionPreferences,
    pub perf: PerfPreferences,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PerfPreferences {
    /// Number of samples averaged by moving-average timers.
    pub moving_average_window: usize,
}
impl Default for PerfPreferences {
    fn default() -> Self {
        Self {
            moving_average_window: 120,
        }
    }
}

impl Preferences {
    /// Loads preferences, layering `user_file` (if any) over the defaults. If
    /// loading fails, then a warning is logged and the default preferences are
    /// returned.
    pub fn load(user_file: Option<&Path>) -> Self {
        Self::try_load(user_file).unwrap_or_else(|e| {
            log::warn!("Error loading preferences: {e:#}");
            DEFAULT_PREFS.clone()
        })
    }

    /// Loads preferences, layering `user_file` (if any) over the defaults.
    pub fn try_load(user_file: Option<&Path>) -> Result<Self> {
        lazy_static::initialize(&DEFAULT_PREFS);

        let mut config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_PREFS_STR, PREFS_FILE_FORMAT));

        if let Some(path) = user_file {
            log::debug!("Loading user preferences from {}", path.display());
            config = config.add_source(config::File::from(path).format(PREFS_FILE_FORMAT));
        }

        let prefs: Self = config
            .build()
            .wrap_err("error reading preferences")?
            .try_deserialize()
            .wrap_err("error parsing preferences")?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Writes the preferences to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(p) = path.parent() {
            std::fs::create_dir_all(p)?;
        }
        serde_norway::to_writer(std::fs::File::create(path)?, self)
            .wrap_err("error writing preferences")?;
        Ok(())
    }

    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.puzzle.size < MIN_PUZZLE_SIZE {
            bail!(
                "puzzle size must be at least {MIN_PUZZLE_SIZE}, got {}",
                self.puzzle.size,
            );
        }
        if self.puzzle.face_scale <= 0.0 {
            bail!("face scale must be positive");
        }
        if self.puzzle.face_gap < 0.0 {
            bail!("face gap must not be negative");
        }
        if self.animation.rotation_speed <= 0.0 {
            bail!("rotation speed must be positive");
        }
        if self.animation.settle_epsilon < 0.0 {
            bail!("settle epsilon must not be negative");
        }
        if self.perf.moving_average_window == 0 {
            bail!("moving average window must be at least 1");
        }
        Ok(())
    }
}
