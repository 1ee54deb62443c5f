//! Resolving a cursor position to a face of a cubelet.
//!
//! Each visible face of each resting cubelet is projected to the screen and
//! tested for containment. The first hit in cubelet order wins. Faces seen
//! from behind can be ignored, which leaves only the outer shell facing the
//! camera; those quads never overlap, so no depth sort is needed.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point2, Point3, Vector2, Vector3};
use cubemath::{DEGENERATE_EPSILON, Quad, Viewport, Winding, WindingErrors, project_point};
use cubeprefs::InteractionPreferences;
use float_ord::FloatOrd;
use serde::Serialize;

use crate::{Axis, Camera, Cube, Cubelet, Face, PerfStats, RotationCommand, TickOutcome};

/// Screen-space hints for which way a selected face can be dragged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TurnIndicators {
    /// Projected center of the face.
    pub origin: Point2<f32>,
    /// Screen-space direction of one edge of the face.
    pub up: Vector2<f32>,
    /// Screen-space direction of the other edge of the face, clockwise from
    /// `up`.
    pub right: Vector2<f32>,

    /// World axis direction that `up` points along.
    up_direction: Vector3<i32>,
    /// World axis direction that `right` points along.
    right_direction: Vector3<i32>,
}

/// Face of a cubelet under the cursor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Selection {
    /// Index of the cubelet in [`Cube::cubelets()`].
    pub cubelet: usize,
    /// Face of the cubelet, in its local frame.
    pub face: Face,
    /// Projected corners of the face.
    pub quad: Quad,
    /// Direction in which the projected corners wind.
    pub winding: Winding,
    /// Drag direction hints.
    pub indicators: TurnIndicators,

    camera_version: u64,
}

/// Turn requested by dragging a selected face.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct DragTurn {
    /// Axis of the turn.
    pub axis: Axis,
    /// Slice containing the selected cubelet.
    pub index: usize,
    /// Quarter turns counterclockwise around the positive axis.
    pub physical_turns: i32,
}
impl DragTurn {
    /// Adds the turn to the back of the puzzle's queue.
    pub fn enqueue_on(self, cube: &mut Cube) {
        cube.enqueue_physical(self.axis, self.index, self.physical_turns);
    }
}

impl Selection {
    /// Returns the position of the selected cubelet's slice along `axis`.
    pub fn slice_index(&self, cube: &Cube, axis: Axis) -> Option<usize> {
        let cubelet = cube.cubelets().get(self.cubelet)?;
        usize::try_from(cubelet.grid_position()[axis.int()]).ok()
    }

    /// Returns a command that turns the selected cubelet's slice along `axis`.
    pub fn slice_command(&self, cube: &Cube, axis: Axis, turns: i32) -> Option<RotationCommand> {
        let index = self.slice_index(cube, axis)?;
        RotationCommand::new(axis, index, turns, cube.size()).ok()
    }

    /// Returns the turn that moves the selected face in the direction of
    /// `drag` (in pixels), or `None` if the drag is shorter than `threshold`.
    ///
    /// The drag is snapped to whichever edge of the face it is most aligned
    /// with on screen. The turn is around the axis perpendicular to both that
    /// edge and the face.
    pub fn drag_turn(&self, cube: &Cube, drag: Vector2<f32>, threshold: f32) -> Option<DragTurn> {
        if drag.magnitude() < threshold {
            return None;
        }
        let ind = &self.indicators;
        let (screen_dir, world_dir) = [(ind.up, ind.up_direction), (ind.right, ind.right_direction)]
            .into_iter()
            .filter(|(v, _)| v.magnitude2() > DEGENERATE_EPSILON)
            .max_by_key(|(v, _)| FloatOrd(v.normalize().dot(drag).abs()))?;
        let drag_dir = match screen_dir.dot(drag) >= 0.0 {
            true => world_dir,
            false => -world_dir,
        };

        let cubelet = cube.cubelets().get(self.cubelet)?;
        let normal = cubelet.local_to_grid_direction(self.face.normal());
        let (axis, sign) = Axis::of_unit_vector(normal.cross(drag_dir))?;
        let index = usize::try_from(cubelet.grid_position()[axis.int()]).ok()?;
        Some(DragTurn {
            axis,
            index,
            physical_turns: sign.to_num(),
        })
    }
}

/// Finds the cubelet face under the cursor, caching the last result.
#[derive(Debug, Default, Clone)]
pub struct SelectionPicker {
    selection: Option<Selection>,
    cull_back_faces: bool,
}
impl SelectionPicker {
    /// Constructs a picker with nothing selected.
    pub fn new(prefs: &InteractionPreferences) -> Self {
        Self {
            selection: None,
            cull_back_faces: prefs.cull_back_faces,
        }
    }

    /// Returns the current selection.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }
    /// Deselects.
    pub fn clear(&mut self) {
        self.selection = None;
    }
    /// Deselects if a turn started, since it moved the geometry.
    pub fn on_tick(&mut self, outcome: &TickOutcome) {
        if outcome.dispatched.is_some() {
            self.clear();
        }
    }

    /// Selects the face under `cursor` (in pixels) and returns it.
    ///
    /// While the cursor stays inside the previous selection's quad and the
    /// camera has not changed, the previous selection is reused.
    pub fn pick(
        &mut self,
        cursor: Point2<f32>,
        cube: &Cube,
        camera: &Camera,
        perf: &mut PerfStats,
    ) -> Option<&Selection> {
        perf.count("selection.requests");

        let cache_is_valid = self.selection.as_ref().is_some_and(|s| {
            s.camera_version == camera.version()
                && s.quad.contains(cursor)
                && cube.cubelets().get(s.cubelet).is_some_and(|c| !c.is_animating())
        });
        if cache_is_valid {
            perf.count("selection.cache_hits");
            return self.selection.as_ref();
        }

        let _timer = perf.time("selection");
        self.selection = self.find(cursor, cube, camera);
        if let Some(s) = &self.selection {
            log::trace!("selected {} of cubelet {} ({})", s.face, s.cubelet, s.winding);
        }
        self.selection.as_ref()
    }

    fn find(&self, cursor: Point2<f32>, cube: &Cube, camera: &Camera) -> Option<Selection> {
        let view_projection = camera.view_projection();
        for (i, cubelet) in cube.cubelets().iter().enumerate() {
            if cubelet.is_animating() {
                continue;
            }
            let wvp = view_projection * cubelet.world_transform();
            for face in cubelet.face_mask().faces() {
                let hit = self.hit_test(cursor, cubelet, face, &wvp, camera.viewport());
                if let Some((quad, winding, indicators)) = hit {
                    return Some(Selection {
                        cubelet: i,
                        face,
                        quad,
                        winding,
                        indicators,
                        camera_version: camera.version(),
                    });
                }
            }
        }
        None
    }

    fn hit_test(
        &self,
        cursor: Point2<f32>,
        cubelet: &Cubelet,
        face: Face,
        wvp: &Matrix4<f32>,
        viewport: &Viewport,
    ) -> Option<(Quad, Winding, TurnIndicators)> {
        let corners = face.local_quad_corners(cubelet.scale());
        let [a, b, c, d] = corners.map(|p| project_point(p, wvp, viewport));
        let quad = Quad([a?, b?, c?, d?]);
        if quad.is_degenerate() || !quad.contains(cursor) {
            return None;
        }

        let winding = WindingErrors::of(&quad).best()?;
        if self.cull_back_faces && winding == Winding::CounterClockwise {
            return None;
        }

        let indicators = turn_indicators(cubelet, face, &corners, wvp, viewport, winding)?;
        Some((quad, winding, indicators))
    }
}

fn turn_indicators(
    cubelet: &Cubelet,
    face: Face,
    corners: &[Point3<f32>; 4],
    wvp: &Matrix4<f32>,
    viewport: &Viewport,
    winding: Winding,
) -> Option<TurnIndicators> {
    let half = cubelet.scale() / 2.0;
    let center = Point3::centroid(corners);

    let [c0, c1, _, c3] = face.local_quad_corners(1.0);
    let right_local = (c1 - c0).map(|x| x.round() as i32);
    let up_local = (c3 - c0).map(|x| x.round() as i32);

    let project_dir = |dir: Vector3<i32>| -> Option<Vector2<f32>> {
        let tip = center + dir.cast::<f32>()? * half;
        Some(project_point(tip, wvp, viewport)? - project_point(center, wvp, viewport)?)
    };

    let mut up = (project_dir(up_local)?, cubelet.local_to_grid_direction(up_local));
    let mut right = (project_dir(right_local)?, cubelet.local_to_grid_direction(right_local));
    if winding == Winding::CounterClockwise {
        std::mem::swap(&mut up, &mut right);
    }

    Some(TurnIndicators {
        origin: project_point(center, wvp, viewport)?,
        up: up.0,
        right: right.0,
        up_direction: up.1,
        right_direction: right.1,
    })
}
