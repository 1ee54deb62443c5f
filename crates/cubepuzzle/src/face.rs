//! Axes, faces, and sticker colors of a cube.

use std::fmt;

use bitflags::bitflags;
use cgmath::{Point3, Vector3};
use cubemath::Sign;
use serde::Serialize;
use strum::IntoEnumIterator;

/// A 3-dimensional axis.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum::EnumIter,
)]
pub enum Axis {
    /// X axis.
    X = 0,
    /// Y axis (up).
    Y = 1,
    /// Z axis (away from the default camera).
    Z = 2,
}
impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}
impl Axis {
    /// Returns an integer index for this axis; X = 0, Y = 1, Z = 2.
    pub fn int(self) -> usize {
        self as usize
    }
    /// Returns the axis with index `i`, if there is one.
    pub fn from_int(i: usize) -> Option<Self> {
        Self::iter().nth(i)
    }
    /// Returns the unit vector along the positive axis.
    pub fn unit(self) -> Vector3<i32> {
        let mut v = Vector3::new(0, 0, 0);
        v[self.int()] = 1;
        v
    }
    /// Returns the axis and sign of an integer unit vector, or `None` if `v` is
    /// not a signed unit vector along an axis.
    pub fn of_unit_vector(v: Vector3<i32>) -> Option<(Self, Sign)> {
        let mut ret = None;
        for axis in Axis::iter() {
            match v[axis.int()] {
                0 => (),
                1 if ret.is_none() => ret = Some((axis, Sign::Pos)),
                -1 if ret.is_none() => ret = Some((axis, Sign::Neg)),
                _ => return None,
            }
        }
        ret
    }
}

/// Face of the cube, named by where it sits before any turns.
///
/// The low side of each axis is front (Z), right (X), or bottom (Y). The
/// default camera looks at the front face, from which the low X side appears on
/// the right.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum::EnumIter,
)]
pub enum Face {
    /// Low Z.
    Front,
    /// High Z.
    Back,
    /// Low X.
    Right,
    /// High X.
    Left,
    /// Low Y.
    Bottom,
    /// High Y.
    Top,
}
impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl Face {
    /// Returns the human-friendly name of the face.
    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "Front",
            Face::Back => "Back",
            Face::Right => "Right",
            Face::Left => "Left",
            Face::Bottom => "Bottom",
            Face::Top => "Top",
        }
    }
    /// Returns the one-bit mask for the face.
    pub fn mask(self) -> FaceMask {
        FaceMask::from_bits_truncate(1 << self as u8)
    }
    /// Returns the axis perpendicular to the face.
    pub fn axis(self) -> Axis {
        match self {
            Face::Front | Face::Back => Axis::Z,
            Face::Right | Face::Left => Axis::X,
            Face::Bottom | Face::Top => Axis::Y,
        }
    }
    /// Returns [`Sign::Neg`] for faces on the low side of their axis and
    /// [`Sign::Pos`] for faces on the high side.
    pub fn sign(self) -> Sign {
        match self {
            Face::Front | Face::Right | Face::Bottom => Sign::Neg,
            Face::Back | Face::Left | Face::Top => Sign::Pos,
        }
    }
    /// Returns the face on the given side of an axis.
    pub fn from_axis_sign(axis: Axis, sign: Sign) -> Self {
        match (axis, sign) {
            (Axis::X, Sign::Neg) => Face::Right,
            (Axis::X, Sign::Pos) => Face::Left,
            (Axis::Y, Sign::Neg) => Face::Bottom,
            (Axis::Y, Sign::Pos) => Face::Top,
            (Axis::Z, Sign::Neg) => Face::Front,
            (Axis::Z, Sign::Pos) => Face::Back,
        }
    }
    /// Returns the outward unit normal of the face.
    pub fn normal(self) -> Vector3<i32> {
        self.axis().unit() * self.sign().to_num::<i32>()
    }
    /// Returns the face that an outward normal points at, if it is a signed unit
    /// vector along an axis.
    pub fn from_normal(normal: Vector3<i32>) -> Option<Self> {
        let (axis, sign) = Axis::of_unit_vector(normal)?;
        Some(Self::from_axis_sign(axis, sign))
    }

    /// Returns the sticker position of the face in a cubelet's local 3×3×3
    /// frame, where the cubelet's center is at `(1, 1, 1)`.
    pub fn canonical_sticker_position(self) -> Vector3<i32> {
        Vector3::new(1, 1, 1) + self.normal()
    }
    /// Returns the face whose sticker sits at `pos` in a cubelet's local 3×3×3
    /// frame.
    pub fn from_sticker_position(pos: Vector3<i32>) -> Option<Self> {
        Self::from_normal(pos - Vector3::new(1, 1, 1))
    }

    /// Returns the color that this face has on a solved puzzle.
    pub fn home_color(self) -> Color {
        match self {
            Face::Front => Color::Red,
            Face::Back => Color::Orange,
            Face::Right => Color::Blue,
            Face::Left => Color::Green,
            Face::Bottom => Color::Yellow,
            Face::Top => Color::White,
        }
    }

    /// Returns the corners of the face of a cubelet with edge length `scale`,
    /// in the cubelet's local frame (which spans `0..scale` on each axis).
    ///
    /// Corners are listed so that they wind clockwise on screen when the face
    /// is seen from outside the cubelet.
    pub fn local_quad_corners(self, scale: f32) -> [Point3<f32>; 4] {
        let s = scale;
        let p = Point3::new;
        match self {
            Face::Front => [p(0., 0., 0.), p(s, 0., 0.), p(s, s, 0.), p(0., s, 0.)],
            Face::Back => [p(0., 0., s), p(0., s, s), p(s, s, s), p(s, 0., s)],
            Face::Right => [p(0., 0., 0.), p(0., s, 0.), p(0., s, s), p(0., 0., s)],
            Face::Left => [p(s, 0., 0.), p(s, 0., s), p(s, s, s), p(s, s, 0.)],
            Face::Bottom => [p(0., 0., 0.), p(0., 0., s), p(s, 0., s), p(s, 0., 0.)],
            Face::Top => [p(0., s, 0.), p(s, s, 0.), p(s, s, s), p(0., s, s)],
        }
    }
}

bitflags! {
    /// Set of faces of the cube that a cubelet touches.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct FaceMask: u8 {
        /// Low Z.
        const FRONT = 1 << 0;
        /// High Z.
        const BACK = 1 << 1;
        /// Low X.
        const RIGHT = 1 << 2;
        /// High X.
        const LEFT = 1 << 3;
        /// Low Y.
        const BOTTOM = 1 << 4;
        /// High Y.
        const TOP = 1 << 5;
    }
}

impl fmt::Display for FaceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let mut first = true;
        for face in self.faces() {
            if !first {
                write!(f, "+")?;
            }
            first = false;
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

/// Every face mask that occurs on a cube of size at least 2, in ascending
/// order. A mask's position in this list is its face code.
const POSSIBLE_FACE_MASKS: [u8; 26] = [
    1, 2, 4, 5, 6, 8, 9, 10, 16, 17, 18, 20, 21, 22, 24, 25, 26, 32, 33, 34, 36, 37, 38, 40, 41, 42,
];

impl FaceMask {
    /// Returns the faces in the mask, in bit order.
    pub fn faces(self) -> impl Iterator<Item = Face> {
        Face::iter().filter(move |face| self.contains(face.mask()))
    }

    /// Returns an index from 0 to 25 that identifies the mask among those that
    /// occur on a cube, or `None` if the mask is empty or contains opposite
    /// faces.
    pub fn face_code(self) -> Option<u8> {
        POSSIBLE_FACE_MASKS
            .iter()
            .position(|&m| m == self.bits())
            .map(|i| i as u8)
    }

    /// Returns the mask for a cell of an `n`×`n`×`n` grid.
    pub fn for_grid_position(pos: Vector3<i32>, n: usize) -> Self {
        let last = n as i32 - 1;
        let mut mask = FaceMask::empty();
        for axis in Axis::iter() {
            let coord = pos[axis.int()];
            if coord == 0 {
                mask |= Face::from_axis_sign(axis, Sign::Neg).mask();
            }
            if coord == last {
                mask |= Face::from_axis_sign(axis, Sign::Pos).mask();
            }
        }
        mask
    }
}

/// Sticker color.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[allow(missing_docs)]
    Red,
    #[allow(missing_docs)]
    Orange,
    #[allow(missing_docs)]
    Blue,
    #[allow(missing_docs)]
    Green,
    #[allow(missing_docs)]
    Yellow,
    #[allow(missing_docs)]
    White,
}
impl Color {
    /// Returns a single uppercase letter for the color.
    pub fn initial(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::White => 'W',
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_face_bits_match_mask_constants() {
        assert_eq!(Face::Front.mask(), FaceMask::FRONT);
        assert_eq!(Face::Back.mask(), FaceMask::BACK);
        assert_eq!(Face::Right.mask(), FaceMask::RIGHT);
        assert_eq!(Face::Left.mask(), FaceMask::LEFT);
        assert_eq!(Face::Bottom.mask(), FaceMask::BOTTOM);
        assert_eq!(Face::Top.mask(), FaceMask::TOP);
    }

    #[test]
    fn test_face_codes() {
        assert_eq!(FaceMask::FRONT.face_code(), Some(0));
        assert_eq!((FaceMask::FRONT | FaceMask::RIGHT).face_code(), Some(3));
        assert_eq!(
            (FaceMask::BACK | FaceMask::LEFT | FaceMask::TOP).face_code(),
            Some(25),
        );
        assert_eq!(FaceMask::empty().face_code(), None);
        assert_eq!((FaceMask::FRONT | FaceMask::BACK).face_code(), None);
        assert_eq!(FaceMask::all().face_code(), None);
    }

    #[test]
    fn test_every_boundary_cell_has_a_face_code() {
        for n in 2..=5 {
            let mut codes = std::collections::BTreeSet::new();
            for x in 0..n as i32 {
                for y in 0..n as i32 {
                    for z in 0..n as i32 {
                        let mask = FaceMask::for_grid_position(Vector3::new(x, y, z), n);
                        if !mask.is_empty() {
                            codes.insert(mask.face_code().expect("boundary cell"));
                        }
                    }
                }
            }
            let expected = if n == 2 { 8 } else { 26 };
            assert_eq!(codes.len(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_sticker_positions() {
        assert_eq!(Face::Front.canonical_sticker_position(), Vector3::new(1, 1, 0));
        assert_eq!(Face::Back.canonical_sticker_position(), Vector3::new(1, 1, 2));
        assert_eq!(Face::Right.canonical_sticker_position(), Vector3::new(0, 1, 1));
        assert_eq!(Face::Left.canonical_sticker_position(), Vector3::new(2, 1, 1));
        assert_eq!(Face::Bottom.canonical_sticker_position(), Vector3::new(1, 0, 1));
        assert_eq!(Face::Top.canonical_sticker_position(), Vector3::new(1, 2, 1));
        for face in Face::iter() {
            let pos = face.canonical_sticker_position();
            assert_eq!(Face::from_sticker_position(pos), Some(face));
        }
        assert_eq!(Face::from_sticker_position(Vector3::new(1, 1, 1)), None);
        assert_eq!(Face::from_sticker_position(Vector3::new(0, 0, 1)), None);
    }

    #[test]
    fn test_mask_display() {
        let mask = FaceMask::FRONT | FaceMask::TOP;
        assert_eq!(mask.to_string(), "Front+Top");
        assert_eq!(mask.faces().collect::<Vec<_>>(), vec![Face::Front, Face::Top]);
    }
}
