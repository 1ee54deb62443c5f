//! State of a single cubelet.
//!
//! A cubelet has two positions: its logical cell in the grid, which changes
//! the moment a turn is issued, and its continuous world transform, which
//! catches up over the following frames.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use cgmath::{Array, EuclideanSpace, Matrix3, Matrix4, Point3, Rad, SquareMatrix, Vector3, Zero};
use cubemath::approx_cmp::snap_to_zero;
use cubeprefs::AnimationPreferences;
use smallvec::SmallVec;

use crate::{Axis, Color, Face, FaceMask, PuzzleError};

/// Shared geometric layout of the cubelets in a puzzle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubeletLayout {
    /// Number of cubelets along each edge.
    pub size: usize,
    /// Edge length of a cubelet.
    pub face_scale: f32,
    /// Empty space between adjacent cubelets.
    pub face_gap: f32,
}
impl CubeletLayout {
    /// Returns the distance between the origins of adjacent cubelets.
    pub fn spacing(&self) -> f32 {
        self.face_scale + self.face_gap
    }
    /// Returns the center of the grid, in grid coordinates.
    pub fn grid_center(&self) -> f32 {
        (self.size as f32 - 1.0) / 2.0
    }
    /// Returns the center of the whole puzzle in world space.
    pub fn world_center(&self) -> Point3<f32> {
        let c = (self.spacing() * self.size as f32 - self.face_gap) / 2.0;
        Point3::new(c, c, c)
    }
    /// Returns the world-space position of the local origin of the cubelet in
    /// the cell `grid_position`, before any turns.
    pub fn origin_of(&self, grid_position: Vector3<i32>) -> Point3<f32> {
        Point3::from_vec(grid_position.cast::<f32>().unwrap_or_else(Vector3::zero) * self.spacing())
    }
}

/// Colored face of a cubelet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sticker {
    /// Color of the sticker.
    pub color: Color,
    /// Face of the cubelet that the sticker is attached to.
    pub face: Face,
    /// Position in a 3×3×3 frame around the cubelet (center at `(1, 1, 1)`)
    /// after all committed turns.
    pub position: Vector3<i32>,
}
impl Sticker {
    /// Returns the face of the puzzle that the sticker currently faces.
    pub fn facing(&self) -> Option<Face> {
        Face::from_sticker_position(self.position)
    }
}

/// One of the small cubes that make up the puzzle.
#[derive(Debug, Clone)]
pub struct Cubelet {
    layout: CubeletLayout,

    grid_position: Vector3<i32>,
    /// Cell as of the last committed turn, matching `stickers`.
    settled_position: Vector3<i32>,
    original_offset: Vector3<f32>,
    continuous_position: Point3<f32>,

    /// Composition of all committed turns.
    orientation: Matrix3<f32>,
    /// Per-axis angle of the in-flight turn that is already displayed.
    current_rotation: Vector3<f32>,
    /// Per-axis angle of the in-flight turn that is not yet displayed.
    pending_turn: Vector3<f32>,

    face_mask: FaceMask,
    face_code: u8,
    stickers: SmallVec<[Sticker; 3]>,
}

impl Cubelet {
    /// Constructs a solved cubelet in the cell `grid_position`, with stickers on
    /// every face in `face_mask`.
    pub fn new(
        grid_position: Vector3<i32>,
        layout: CubeletLayout,
        face_mask: FaceMask,
    ) -> Result<Self, PuzzleError> {
        let face_code = face_mask
            .face_code()
            .ok_or(PuzzleError::InvalidFaceMask(face_mask))?;

        let origin = layout.origin_of(grid_position);
        let stickers = face_mask
            .faces()
            .map(|face| Sticker {
                color: face.home_color(),
                face,
                position: face.canonical_sticker_position(),
            })
            .collect();

        Ok(Self {
            layout,

            grid_position,
            settled_position: grid_position,
            original_offset: origin - layout.world_center(),
            continuous_position: origin,

            orientation: Matrix3::identity(),
            current_rotation: Vector3::zero(),
            pending_turn: Vector3::zero(),

            face_mask,
            face_code,
            stickers,
        })
    }

    /// Returns the cell that the cubelet occupies, including turns that are
    /// still animating.
    pub fn grid_position(&self) -> Vector3<i32> {
        self.grid_position
    }
    /// Returns the cell that the cubelet occupied when its last turn
    /// committed. Sticker positions are relative to this cell.
    pub fn settled_position(&self) -> Vector3<i32> {
        self.settled_position
    }
    /// Returns the displayed world-space position of the cubelet's local
    /// origin.
    pub fn continuous_position(&self) -> Point3<f32> {
        self.continuous_position
    }
    /// Returns the composition of all committed turns.
    pub fn orientation(&self) -> Matrix3<f32> {
        self.orientation
    }
    /// Returns the per-axis angle remaining in the in-flight turn.
    pub fn pending_turn(&self) -> Vector3<f32> {
        self.pending_turn
    }
    /// Returns the faces of the puzzle that the cubelet touched when it was
    /// constructed.
    pub fn face_mask(&self) -> FaceMask {
        self.face_mask
    }
    /// Returns an index from 0 to 25 for [`Self::face_mask()`], used to bucket
    /// cubelets that share a mesh.
    pub fn face_code(&self) -> u8 {
        self.face_code
    }
    /// Returns the cubelet's stickers.
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }
    /// Returns the edge length of the cubelet.
    pub fn scale(&self) -> f32 {
        self.layout.face_scale
    }

    /// Returns whether the cubelet is partway through a turn.
    pub fn is_animating(&self) -> bool {
        self.pending_turn != Vector3::zero()
    }

    /// Returns whether the cubelet occupies the slice `index` along `axis`.
    pub fn is_in_slice(&self, axis: Axis, index: usize) -> bool {
        usize::try_from(self.grid_position[axis.int()]).is_ok_and(|i| i == index)
    }

    /// Returns the displayed rotation of the cubelet.
    pub fn visual_rotation(&self) -> Matrix3<f32> {
        euler_rotation(self.current_rotation) * self.orientation
    }

    /// Returns the transform from the cubelet's local frame to world space.
    pub fn world_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.continuous_position.to_vec())
            * Matrix4::from(self.visual_rotation())
    }

    /// Returns the current world-space direction of a vector given in the
    /// cubelet's local frame, ignoring any in-flight turn.
    pub fn local_to_grid_direction(&self, local: Vector3<i32>) -> Vector3<i32> {
        rotate_direction(self.orientation, local)
    }

    /// Turns the cubelet by `turns` quarter turns around `axis`.
    ///
    /// `turns` is reduced to the range `-1..=2` first, so any whole number of
    /// revolutions is a no-op. The grid position is updated immediately, rotating around the center of
    /// the cubelet's own slice. The visual rotation is added to the pending
    /// turn and plays out in [`Self::advance()`].
    pub fn apply_logical_turn(&mut self, axis: Axis, turns: i32) {
        let turns = (turns + 1).rem_euclid(4) - 1;
        let angle = turns as f32 * FRAC_PI_2;
        let rot = axis_rotation(axis, angle);

        let mut center = Vector3::from_value(self.layout.grid_center());
        center[axis.int()] = self.grid_position[axis.int()] as f32;
        let pos = self.grid_position.cast::<f32>().unwrap_or(center);
        self.grid_position = round_vector(center + rot * (pos - center));

        self.pending_turn[axis.int()] += angle;
    }

    /// Advances the animation by `elapsed` and returns whether the in-flight
    /// turn finished.
    pub fn advance(&mut self, elapsed: Duration, prefs: &AnimationPreferences) -> bool {
        if !self.is_animating() {
            return false;
        }

        let max_step = prefs.rotation_speed * elapsed.as_secs_f32();
        for i in 0..3 {
            let step = self.pending_turn[i].clamp(-max_step, max_step);
            self.current_rotation[i] += step;
            self.pending_turn[i] = snap_to_zero(self.pending_turn[i] - step, prefs.settle_epsilon);
        }

        if self.is_animating() {
            self.continuous_position = self.layout.world_center()
                + self.visual_rotation() * self.original_offset;
            false
        } else {
            self.commit();
            true
        }
    }

    /// Folds the finished turn into the committed orientation.
    fn commit(&mut self) {
        // Every turn is a multiple of 90 degrees, so the result is a signed
        // permutation matrix. Rounding discards the error left by the settle
        // epsilon.
        self.orientation = round_matrix(self.visual_rotation());
        self.current_rotation = Vector3::zero();

        self.continuous_position =
            self.layout.world_center() + self.orientation * self.original_offset;

        let orientation = self.orientation;
        for sticker in &mut self.stickers {
            let offset = sticker.face.normal();
            sticker.position = Vector3::new(1, 1, 1) + rotate_direction(orientation, offset);
        }
        self.settled_position = self.grid_position;
        log::trace!(
            "cubelet committed turn; now at {:?} with stickers {:?}",
            self.grid_position,
            self.stickers.iter().map(|s| s.position).collect::<Vec<_>>(),
        );
    }
}

/// Returns the rotation by `angle` radians around `axis`.
pub fn axis_rotation(axis: Axis, angle: f32) -> Matrix3<f32> {
    match axis {
        Axis::X => Matrix3::from_angle_x(Rad(angle)),
        Axis::Y => Matrix3::from_angle_y(Rad(angle)),
        Axis::Z => Matrix3::from_angle_z(Rad(angle)),
    }
}

/// Returns the rotation by per-axis angles, applied Z first, then X, then Y.
pub fn euler_rotation(angles: Vector3<f32>) -> Matrix3<f32> {
    Matrix3::from_angle_y(Rad(angles.y))
        * Matrix3::from_angle_x(Rad(angles.x))
        * Matrix3::from_angle_z(Rad(angles.z))
}

fn rotate_direction(orientation: Matrix3<f32>, local: Vector3<i32>) -> Vector3<i32> {
    round_vector(orientation * local.cast::<f32>().unwrap_or_else(Vector3::zero))
}

fn round_vector(v: Vector3<f32>) -> Vector3<i32> {
    v.map(|x| x.round() as i32)
}

fn round_matrix(m: Matrix3<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(
        m.x.map(f32::round),
        m.y.map(f32::round),
        m.z.map(f32::round),
    )
}

#[cfg(test)]
mod tests {
    use cgmath::Transform;
    use cubemath::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn layout(size: usize) -> CubeletLayout {
        CubeletLayout {
            size,
            face_scale: 1.7,
            face_gap: 0.05,
        }
    }

    fn cubelet(pos: [i32; 3], size: usize) -> Cubelet {
        let pos = Vector3::from(pos);
        Cubelet::new(pos, layout(size), FaceMask::for_grid_position(pos, size)).unwrap()
    }

    fn settle(c: &mut Cubelet) {
        let prefs = AnimationPreferences::default();
        for _ in 0..1000 {
            if !c.is_animating() {
                return;
            }
            c.advance(Duration::from_millis(16), &prefs);
        }
        panic!("cubelet never settled");
    }

    fn sticker_positions(c: &Cubelet) -> Vec<Vector3<i32>> {
        c.stickers().iter().map(|s| s.position).collect()
    }

    /// Returns the world-space center of the cubelet's body.
    fn world_center_of(c: &Cubelet) -> Point3<f32> {
        let h = c.scale() / 2.0;
        c.world_transform().transform_point(Point3::new(h, h, h))
    }

    #[test]
    fn test_layout() {
        let l = layout(3);
        assert_approx_eq!(l.world_center().x, 2.6);
        assert_eq!(l.grid_center(), 1.0);
        assert_approx_eq!(l.origin_of(Vector3::new(1, 2, 0)).to_vec(), Vector3::new(1.75, 3.5, 0.0));
    }

    #[test]
    fn test_construction() {
        let c = cubelet([0, 2, 0], 3);
        assert_eq!(c.face_mask(), FaceMask::FRONT | FaceMask::RIGHT | FaceMask::TOP);
        assert_eq!(c.face_code(), 21);
        assert_eq!(
            c.stickers().iter().map(|s| s.color).collect::<Vec<_>>(),
            vec![Color::Red, Color::Blue, Color::White],
        );
        assert!(!c.is_animating());

        let bad = Cubelet::new(Vector3::new(1, 1, 1), layout(3), FaceMask::empty());
        assert_eq!(bad.unwrap_err(), PuzzleError::InvalidFaceMask(FaceMask::empty()));
    }

    #[test]
    fn test_logical_turn_updates_grid_immediately() {
        let mut c = cubelet([0, 0, 0], 3);
        c.apply_logical_turn(Axis::Z, 1);
        // Counterclockwise around +Z: (-1, -1) relative to center -> (1, -1).
        assert_eq!(c.grid_position(), Vector3::new(2, 0, 0));
        assert!(c.is_animating());
        assert_approx_eq!(c.pending_turn(), Vector3::new(0.0, 0.0, FRAC_PI_2));
        // Stickers do not move until the animation commits.
        assert_eq!(
            sticker_positions(&c),
            vec![Vector3::new(1, 1, 0), Vector3::new(0, 1, 1), Vector3::new(1, 0, 1)],
        );
    }

    #[test]
    fn test_animation_is_rate_limited() {
        let prefs = AnimationPreferences {
            rotation_speed: 5.0,
            ..Default::default()
        };
        let mut c = cubelet([2, 2, 2], 3);
        c.apply_logical_turn(Axis::X, -1);

        // 0.5 radians per step; a quarter turn is about 1.57 radians.
        let dt = Duration::from_millis(100);
        assert!(!c.advance(dt, &prefs));
        assert!(!c.advance(dt, &prefs));
        assert!(!c.advance(dt, &prefs));
        assert!(c.is_animating());
        assert!(c.advance(dt, &prefs));
        assert!(!c.is_animating());
        assert!(!c.advance(dt, &prefs));
    }

    #[test]
    fn test_stickers_follow_commit() {
        let mut c = cubelet([0, 0, 0], 3);
        c.apply_logical_turn(Axis::Z, 1);
        settle(&mut c);
        // Front stays front; right (-X) goes to bottom (-Y); bottom goes to left (+X).
        assert_eq!(
            sticker_positions(&c),
            vec![Vector3::new(1, 1, 0), Vector3::new(1, 0, 1), Vector3::new(2, 1, 1)],
        );
        assert_eq!(
            c.stickers().iter().map(|s| s.facing()).collect::<Vec<_>>(),
            vec![Some(Face::Front), Some(Face::Bottom), Some(Face::Left)],
        );
    }

    #[test]
    fn test_half_turn() {
        let mut c = cubelet([0, 1, 0], 3);
        c.apply_logical_turn(Axis::Y, 2);
        assert_eq!(c.grid_position(), Vector3::new(2, 1, 2));
        settle(&mut c);
        assert_eq!(
            c.stickers().iter().map(|s| s.facing()).collect::<Vec<_>>(),
            vec![Some(Face::Back), Some(Face::Left)],
        );
    }

    #[test]
    fn test_whole_revolutions_are_dropped() {
        let mut reference = cubelet([0, 0, 0], 9);
        reference.apply_logical_turn(Axis::Z, 1);

        for turns in [5, -3, 4_000_001] {
            let mut c = cubelet([0, 0, 0], 9);
            c.apply_logical_turn(Axis::Z, turns);
            assert_eq!(c.grid_position(), reference.grid_position(), "{turns} turns");
            assert_approx_eq!(c.pending_turn(), reference.pending_turn());
        }

        let mut c = cubelet([3, 0, 8], 9);
        c.apply_logical_turn(Axis::Y, -4_000_000);
        assert_eq!(c.grid_position(), Vector3::new(3, 0, 8));
        assert!(!c.is_animating());
    }

    #[test]
    fn test_settled_position_follows_commit() {
        let mut c = cubelet([0, 0, 0], 3);
        c.apply_logical_turn(Axis::Z, 1);
        assert_eq!(c.settled_position(), Vector3::new(0, 0, 0));
        settle(&mut c);
        assert_eq!(c.settled_position(), Vector3::new(2, 0, 0));
        assert_eq!(c.settled_position(), c.grid_position());
    }

    proptest! {
        #[test]
        fn proptest_four_quarter_turns_are_identity(
            size in 2_usize..=5,
            pos in prop::array::uniform3(0_i32..5),
            axis in 0_usize..3,
            dir in prop::bool::ANY,
        ) {
            let pos = pos.map(|x| x % size as i32);
            let mask = FaceMask::for_grid_position(Vector3::from(pos), size);
            prop_assume!(!mask.is_empty());

            let mut c = cubelet(pos, size);
            let axis = Axis::from_int(axis).unwrap();
            let turns = if dir { 1 } else { -1 };
            let original_stickers = sticker_positions(&c);
            let original_transform = c.world_transform();

            for _ in 0..4 {
                c.apply_logical_turn(axis, turns);
                settle(&mut c);
            }

            prop_assert_eq!(c.grid_position(), Vector3::from(pos));
            prop_assert_eq!(sticker_positions(&c), original_stickers);
            prop_assert_eq!(c.orientation(), Matrix3::identity());
            for i in 0..4 {
                assert_approx_eq!(c.world_transform()[i].truncate(), original_transform[i].truncate(), epsilon = 0.0001);
            }
        }

        #[test]
        fn proptest_settled_body_matches_grid(
            size in 2_usize..=4,
            turns in prop::collection::vec((0_usize..3, -1_i32..=2), 1..8),
        ) {
            // Start from a corner, which exists at every size.
            let mut c = cubelet([0, 0, 0], size);
            let l = layout(size);
            for (axis, t) in turns {
                c.apply_logical_turn(Axis::from_int(axis).unwrap(), t);
                settle(&mut c);

                let expected = l.origin_of(c.grid_position()) + Vector3::from_value(l.face_scale / 2.0);
                assert_approx_eq!(world_center_of(&c).to_vec(), expected.to_vec(), epsilon = 0.001);
            }
        }
    }
}
