//! N×N×N twisty cube simulation.
//!
//! A [`Cube`] owns its [`Cubelet`]s and a queue of [`RotationCommand`]s.
//! Each call to [`Cube::tick()`] dispatches queued turns and advances the
//! animation of every cubelet. A [`SelectionPicker`] maps a cursor position
//! on screen to a face of a cubelet, which can then be dragged to turn its
//! slice.

/// Panics in debug mode, or logs an error in release mode.
macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => log::error!($($tok)*),
        }
    };
}

mod camera;
mod command;
mod cube;
mod cubelet;
mod error;
mod face;
mod net;
pub mod perf;
mod picker;

pub use camera::{Camera, DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR};
pub use command::{CommandQueue, RotationCommand};
pub use cube::{Cube, TickOutcome};
pub use cubelet::{Cubelet, CubeletLayout, Sticker, axis_rotation, euler_rotation};
pub use error::PuzzleError;
pub use face::{Axis, Color, Face, FaceMask};
pub use net::{FaceGrid, Net};
pub use perf::{PerfStats, PerfSummary};
pub use picker::{DragTurn, Selection, SelectionPicker, TurnIndicators};
