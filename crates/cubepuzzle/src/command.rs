//! Slice turn requests and the queue that serializes them.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::{Axis, PuzzleError};

/// Request to turn one slice of the puzzle.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RotationCommand {
    /// Axis perpendicular to the slice.
    pub axis: Axis,
    /// Position of the slice along the axis, from `0` to `n-1`.
    pub index: usize,
    /// Signed number of quarter turns. A positive turn is clockwise as seen
    /// from the face nearest to the slice.
    pub turns: i32,
}
impl fmt::Display for RotationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{:+}", self.axis, self.index, self.turns)
    }
}
impl RotationCommand {
    /// Constructs a command for a puzzle of size `size`.
    pub fn new(axis: Axis, index: usize, turns: i32, size: usize) -> Result<Self, PuzzleError> {
        if index >= size {
            return Err(PuzzleError::SliceOutOfRange { index, size });
        }
        Ok(Self { axis, index, turns })
    }

    /// Constructs a command from a slice vector, in which exactly one
    /// component holds the slice index and the others are `-1`.
    pub fn from_slice_vector(
        slice: [i32; 3],
        turns: i32,
        size: usize,
    ) -> Result<Self, PuzzleError> {
        let mut selected = slice
            .iter()
            .enumerate()
            .filter(|&(_, &coord)| coord != -1);
        let (Some((axis, &index)), None) = (selected.next(), selected.next()) else {
            return Err(PuzzleError::MalformedSliceVector(slice));
        };
        let axis = Axis::from_int(axis).ok_or(PuzzleError::MalformedSliceVector(slice))?;
        let index = usize::try_from(index).map_err(|_| PuzzleError::MalformedSliceVector(slice))?;
        Self::new(axis, index, turns, size)
    }

    /// Returns the command that undoes this one.
    #[must_use]
    pub fn rev(self) -> Self {
        Self {
            turns: -self.turns,
            ..self
        }
    }
}

/// First-in, first-out queue of rotation commands.
#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    commands: VecDeque<RotationCommand>,
}
impl CommandQueue {
    /// Constructs an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command to the back of the queue.
    pub fn push(&mut self, command: RotationCommand) {
        self.commands.push_back(command);
    }
    /// Returns the command at the front of the queue.
    pub fn front(&self) -> Option<&RotationCommand> {
        self.commands.front()
    }
    /// Removes and returns the command at the front of the queue.
    pub fn pop(&mut self) -> Option<RotationCommand> {
        self.commands.pop_front()
    }

    /// Returns the number of commands that have not yet been dispatched.
    pub fn len(&self) -> usize {
        self.commands.len()
    }
    /// Returns whether every command has been dispatched.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    /// Returns an iterator over the pending commands, front first.
    pub fn iter(&self) -> impl Iterator<Item = &RotationCommand> {
        self.commands.iter()
    }
}
