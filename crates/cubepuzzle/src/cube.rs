//! The puzzle and the engine that turns it.

use std::time::Duration;

use cgmath::{Matrix4, Point3, Vector3};
use cubemath::Sign;
use cubeprefs::{AnimationPreferences, ConcurrencyMode, MIN_PUZZLE_SIZE, PuzzlePreferences};
use rand::Rng;
use strum::IntoEnumIterator;

use crate::{
    Axis, Camera, CommandQueue, Cubelet, CubeletLayout, Face, FaceGrid, FaceMask, Net,
    PuzzleError, RotationCommand,
};

/// What happened during one call to [`Cube::tick()`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Command that started this tick, if any.
    pub dispatched: Option<RotationCommand>,
    /// Whether the puzzle came to rest with nothing left in the queue.
    ///
    /// This is set on exactly one tick after each run of rotations.
    pub rotation_finished: bool,
}

/// N×N×N twisty cube.
///
/// The cube owns its cubelets and a queue of rotation commands. Commands are
/// dispatched from [`Cube::tick()`] one at a time, in order, and each one
/// updates the logical state at once and then animates.
#[derive(Debug, Clone)]
pub struct Cube {
    layout: CubeletLayout,
    cubelets: Vec<Cubelet>,
    queue: CommandQueue,
    animation: AnimationPreferences,

    /// View matrix last seen by [`Cube::sync_camera()`], with the camera
    /// version it came from.
    render_view: Option<(u64, Matrix4<f32>)>,
}

impl Cube {
    /// Constructs a solved puzzle.
    pub fn new(
        puzzle: &PuzzlePreferences,
        animation: &AnimationPreferences,
    ) -> Result<Self, PuzzleError> {
        let n = puzzle.size;
        if n < MIN_PUZZLE_SIZE {
            return Err(PuzzleError::InvalidSize(n));
        }
        let layout = CubeletLayout {
            size: n,
            face_scale: puzzle.face_scale,
            face_gap: puzzle.face_gap,
        };

        let mut cubelets = Vec::with_capacity(n.pow(3) - (n - 2).pow(3));
        for z in 0..n as i32 {
            for y in 0..n as i32 {
                for x in 0..n as i32 {
                    let pos = Vector3::new(x, y, z);
                    let mask = FaceMask::for_grid_position(pos, n);
                    if !mask.is_empty() {
                        cubelets.push(Cubelet::new(pos, layout, mask)?);
                    }
                }
            }
        }
        log::debug!("constructed {n}x{n}x{n} cube with {} cubelets", cubelets.len());

        Ok(Self {
            layout,
            cubelets,
            queue: CommandQueue::new(),
            animation: animation.clone(),

            render_view: None,
        })
    }

    /// Constructs a solved puzzle of size `size` with default geometry and
    /// animation settings.
    pub fn with_size(size: usize) -> Result<Self, PuzzleError> {
        let puzzle = PuzzlePreferences {
            size,
            ..Default::default()
        };
        Self::new(&puzzle, &AnimationPreferences::default())
    }

    /// Returns the number of cubelets along each edge.
    pub fn size(&self) -> usize {
        self.layout.size
    }
    /// Returns the geometric layout of the cubelets.
    pub fn layout(&self) -> &CubeletLayout {
        &self.layout
    }
    /// Returns the center of the puzzle in world space.
    pub fn world_center(&self) -> Point3<f32> {
        self.layout.world_center()
    }
    /// Returns all cubelets. Indices are stable for the life of the puzzle.
    pub fn cubelets(&self) -> &[Cubelet] {
        &self.cubelets
    }
    /// Returns the world transform of every cubelet, in cubelet order.
    pub fn world_transforms(&self) -> impl Iterator<Item = Matrix4<f32>> {
        self.cubelets.iter().map(|c| c.world_transform())
    }

    /// Returns the animation settings.
    pub fn animation_prefs(&self) -> &AnimationPreferences {
        &self.animation
    }
    /// Replaces the animation settings.
    pub fn set_animation_prefs(&mut self, animation: AnimationPreferences) {
        self.animation = animation;
    }

    /// Returns the number of commands waiting to be dispatched.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
    /// Returns the commands waiting to be dispatched, front first.
    pub fn pending(&self) -> impl Iterator<Item = &RotationCommand> {
        self.queue.iter()
    }
    /// Returns whether any cubelet is partway through a turn.
    pub fn is_animating(&self) -> bool {
        self.cubelets.iter().any(|c| c.is_animating())
    }
    /// Returns whether nothing is animating and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && !self.is_animating()
    }

    /// Adds a turn to the back of the queue.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the size of the puzzle.
    pub fn enqueue(&mut self, axis: Axis, index: usize, turns: i32) {
        match RotationCommand::new(axis, index, turns, self.size()) {
            Ok(command) => self.queue.push(command),
            Err(e) => panic!("malformed rotation command: {e}"),
        }
    }
    /// Adds a command to the back of the queue.
    ///
    /// # Panics
    ///
    /// Panics if the command's slice is out of range for this puzzle.
    pub fn enqueue_command(&mut self, command: RotationCommand) {
        self.enqueue(command.axis, command.index, command.turns);
    }
    /// Adds a turn given as a slice vector (see
    /// [`RotationCommand::from_slice_vector()`]) to the back of the queue.
    ///
    /// # Panics
    ///
    /// Panics if the slice vector does not select exactly one slice.
    pub fn enqueue_slice_vector(&mut self, slice: [i32; 3], turns: i32) {
        match RotationCommand::from_slice_vector(slice, turns, self.size()) {
            Ok(command) => self.queue.push(command),
            Err(e) => panic!("malformed rotation command: {e}"),
        }
    }
    /// Adds a turn to the back of the queue, where positive `turns` are
    /// counterclockwise around the positive `axis` regardless of which side of
    /// the puzzle the slice is on.
    pub fn enqueue_physical(&mut self, axis: Axis, index: usize, turns: i32) {
        self.enqueue(axis, index, turns * self.slice_sign(index));
    }

    /// Returns [`Sign::Neg`] for slices on the high side of the puzzle, whose
    /// turn direction is mirrored so that positive turns are clockwise as seen
    /// from the nearest face. The middle slice of an odd puzzle is mirrored
    /// too.
    pub fn slice_sign(&self, index: usize) -> Sign {
        if 2 * index + 1 >= self.size() {
            Sign::Neg
        } else {
            Sign::Pos
        }
    }
    /// Returns the number of quarter turns counterclockwise around the positive
    /// axis that `command` performs.
    pub fn physical_turns(&self, command: &RotationCommand) -> i32 {
        command.turns * self.slice_sign(command.index)
    }

    /// Enqueues a random turn and returns it.
    ///
    /// The axis and slice are uniform; the turn is a quarter turn in either
    /// direction or a half turn, with equal probability.
    pub fn random_rotation<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RotationCommand {
        let axis = Axis::from_int(rng.random_range(0..3)).unwrap_or(Axis::X);
        let index = rng.random_range(0..self.size());
        let turns = match rng.random_range(0..3) {
            0 => -1,
            1 => 1,
            _ => 2,
        };
        let command = RotationCommand { axis, index, turns };
        self.queue.push(command);
        command
    }
    /// Enqueues `count` random turns and returns them.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Vec<RotationCommand> {
        (0..count).map(|_| self.random_rotation(rng)).collect()
    }
    /// Enqueues turns of every slice along `axis`, rotating the whole puzzle by
    /// `turns` counterclockwise quarter turns around the positive axis.
    pub fn rotate_whole(&mut self, axis: Axis, turns: i32) {
        for index in 0..self.size() {
            self.enqueue_physical(axis, index, turns);
        }
    }

    /// Advances the puzzle by one frame.
    ///
    /// If the command at the front of the queue may start, it is dispatched:
    /// every cubelet in its slice moves to its new cell immediately and begins
    /// animating. Then every cubelet's animation advances by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        let was_animating = self.is_animating();

        let mut dispatched = None;
        if let Some(&command) = self.queue.front() {
            if self.is_blocked(&command) {
                log::trace!("waiting to dispatch {command}");
            } else {
                let turns = self.physical_turns(&command);
                log::debug!("dispatching {command} ({turns:+} around +{})", command.axis);
                for cubelet in &mut self.cubelets {
                    if cubelet.is_in_slice(command.axis, command.index) {
                        cubelet.apply_logical_turn(command.axis, turns);
                    }
                }
                self.queue.pop();
                dispatched = Some(command);
            }
        }

        for cubelet in &mut self.cubelets {
            cubelet.advance(elapsed, &self.animation);
        }

        let rotation_finished = (was_animating || dispatched.is_some())
            && !self.is_animating()
            && self.queue.is_empty();
        if rotation_finished {
            log::debug!("rotation finished");
        }

        TickOutcome {
            dispatched,
            rotation_finished,
        }
    }

    /// Returns whether `command` must wait for an earlier turn to finish.
    fn is_blocked(&self, command: &RotationCommand) -> bool {
        match self.animation.concurrency {
            ConcurrencyMode::Serial => self.is_animating(),
            ConcurrencyMode::IndependentSlices => self
                .cubelets
                .iter()
                .any(|c| c.is_animating() && c.is_in_slice(command.axis, command.index)),
        }
    }

    /// Returns the colors on one face of the puzzle.
    ///
    /// Each cubelet is placed in the cell it held when its last turn
    /// committed, so a turn shows up here once its animation finishes. Until
    /// then the face shows the puzzle as it was before the turn.
    pub fn face_colors(&self, face: Face) -> FaceGrid {
        let n = self.size();
        let mut grid = FaceGrid::new(face, n);
        for cubelet in &self.cubelets {
            let Some((row, col)) = FaceGrid::cell_of(face, cubelet.settled_position(), n) else {
                continue;
            };
            for sticker in cubelet.stickers() {
                if sticker.facing() == Some(face) && grid.set(row, col, sticker.color).is_some() {
                    debug_panic!("two stickers on {face} at row {row}, column {col}");
                }
            }
        }
        grid
    }
    /// Returns the colors on every face of the puzzle.
    pub fn net(&self) -> Net {
        Net {
            faces: Face::iter().map(|face| self.face_colors(face)).collect(),
        }
    }
    /// Returns whether every face is a single color.
    pub fn is_solved(&self) -> bool {
        Face::iter().all(|face| self.face_colors(face).uniform_color().is_some())
    }

    /// Refreshes the cached view matrix if the camera changed since the last
    /// call. Returns whether it changed.
    pub fn sync_camera(&mut self, camera: &Camera) -> bool {
        if self
            .render_view
            .is_some_and(|(version, _)| version == camera.version())
        {
            return false;
        }
        log::trace!("camera changed (version {})", camera.version());
        self.render_view = Some((camera.version(), camera.view()));
        true
    }
    /// Returns the view matrix from the last call to [`Cube::sync_camera()`].
    pub fn render_view(&self) -> Option<Matrix4<f32>> {
        self.render_view.map(|(_, view)| view)
    }
}
