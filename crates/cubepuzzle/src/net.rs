//! Flat views of the cube's faces.

use std::fmt;

use cgmath::Vector3;
use serde::Serialize;

use crate::{Color, Face};

/// Colors of one face of the puzzle, as seen from outside.
///
/// Cells are stored row by row. The row and column of a cubelet on each face
/// are:
///
/// | Face   | Row           | Column        |
/// |--------|---------------|---------------|
/// | Right  | `n-1-y`       | `z`           |
/// | Left   | `n-1-y`       | `n-1-z`       |
/// | Bottom | `z`           | `n-1-x`       |
/// | Top    | `n-1-z`       | `n-1-x`       |
/// | Front  | `n-1-y`       | `n-1-x`       |
/// | Back   | `n-1-y`       | `x`           |
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FaceGrid {
    /// Face that the grid shows.
    pub face: Face,
    /// Number of rows and columns.
    pub size: usize,
    cells: Vec<Option<Color>>,
}
impl FaceGrid {
    pub(crate) fn new(face: Face, size: usize) -> Self {
        Self {
            face,
            size,
            cells: vec![None; size * size],
        }
    }

    /// Returns the row and column at which the cubelet in `grid_position`
    /// appears on `face`, or `None` if it is not on that face.
    pub fn cell_of(face: Face, grid_position: Vector3<i32>, size: usize) -> Option<(usize, usize)> {
        let n = size as i32;
        let [x, y, z] = [grid_position.x, grid_position.y, grid_position.z];
        let on_face = match face.sign() {
            cubemath::Sign::Neg => grid_position[face.axis().int()] == 0,
            cubemath::Sign::Pos => grid_position[face.axis().int()] == n - 1,
        };
        if !on_face {
            return None;
        }
        let (row, col) = match face {
            Face::Right => (n - 1 - y, z),
            Face::Left => (n - 1 - y, n - 1 - z),
            Face::Bottom => (z, n - 1 - x),
            Face::Top => (n - 1 - z, n - 1 - x),
            Face::Front => (n - 1 - y, n - 1 - x),
            Face::Back => (n - 1 - y, x),
        };
        Some((usize::try_from(row).ok()?, usize::try_from(col).ok()?))
            .filter(|&(r, c)| r < size && c < size)
    }

    /// Returns the color at `row` and `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[row * self.size + col]
    }
    /// Sets the color at `row` and `col`, returning the previous color.
    pub(crate) fn set(&mut self, row: usize, col: usize, color: Color) -> Option<Color> {
        self.cells[row * self.size + col].replace(color)
    }

    /// Returns every cell, row by row.
    pub fn cells(&self) -> &[Option<Color>] {
        &self.cells
    }
    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Returns the color of every cell, if they all have the same one.
    pub fn uniform_color(&self) -> Option<Color> {
        let first = (*self.cells.first()?)?;
        self.cells
            .iter()
            .all(|&c| c == Some(first))
            .then_some(first)
    }
}
impl fmt::Display for FaceGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(color) => write!(f, "{color}")?,
                    None => write!(f, "?")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Every face of the puzzle.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Net {
    /// One grid per face, in [`Face`] order.
    pub faces: Vec<FaceGrid>,
}
impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, grid) in self.faces.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", grid.face)?;
            write!(f, "{grid}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cell_of() {
        let p = Vector3::new(0, 2, 0);
        assert_eq!(FaceGrid::cell_of(Face::Front, p, 3), Some((0, 2)));
        assert_eq!(FaceGrid::cell_of(Face::Right, p, 3), Some((0, 0)));
        assert_eq!(FaceGrid::cell_of(Face::Top, p, 3), Some((2, 2)));
        assert_eq!(FaceGrid::cell_of(Face::Back, p, 3), None);
        assert_eq!(FaceGrid::cell_of(Face::Left, p, 3), None);
        assert_eq!(FaceGrid::cell_of(Face::Bottom, p, 3), None);
    }

    #[test]
    fn test_display() {
        let mut grid = FaceGrid::new(Face::Top, 2);
        grid.set(0, 0, Color::White);
        grid.set(0, 1, Color::White);
        grid.set(1, 0, Color::Red);
        assert_eq!(grid.to_string(), "W W\nR ?\n");
        assert_eq!(grid.uniform_color(), None);
        grid.set(1, 0, Color::White);
        grid.set(1, 1, Color::White);
        assert_eq!(grid.uniform_color(), Some(Color::White));
    }
}
