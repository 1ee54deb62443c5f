//! Camera context shared by the picker and the renderer.

use std::f32::consts::FRAC_PI_4;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use cubemath::Viewport;

/// Vertical field of view.
pub const DEFAULT_FOV: Rad<f32> = Rad(FRAC_PI_4);
/// Distance to the near clipping plane.
pub const DEFAULT_NEAR: f32 = 1.0;
/// Distance to the far clipping plane.
pub const DEFAULT_FAR: f32 = 1000.0;

/// Direction from the target to the eye of the default camera, chosen so that
/// the front, right, and top faces are visible.
const DEFAULT_VIEW_DIRECTION: [f32; 3] = [-0.45, 0.5, -1.0];

/// View and projection parameters.
///
/// Every change increments [`Camera::version()`], so that anything caching
/// matrices derived from the camera can tell when to refresh them.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,

    fov: Rad<f32>,
    near: f32,
    far: f32,

    viewport: Viewport,

    version: u64,
}

impl Camera {
    /// Constructs a camera at `eye` looking at `target` with +Y up.
    pub fn new(eye: Point3<f32>, target: Point3<f32>, viewport: Viewport) -> Self {
        Self {
            eye,
            target,
            up: Vector3::unit_y(),

            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,

            viewport,

            version: 0,
        }
    }

    /// Constructs a camera looking at `target` from `distance` away, from the
    /// default viewing direction.
    pub fn orbiting(target: Point3<f32>, distance: f32, viewport: Viewport) -> Self {
        let eye = target + Vector3::from(DEFAULT_VIEW_DIRECTION).normalize() * distance;
        Self::new(eye, target, viewport)
    }

    /// Returns a number that changes whenever the camera changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the position of the camera.
    pub fn eye(&self) -> Point3<f32> {
        self.eye
    }
    /// Returns the point that the camera looks at.
    pub fn target(&self) -> Point3<f32> {
        self.target
    }
    /// Returns the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Moves the camera.
    pub fn look_at(&mut self, eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) {
        self.eye = eye;
        self.target = target;
        self.up = up;
        self.version += 1;
    }
    /// Resizes the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.version += 1;
    }
    /// Sets the vertical field of view.
    pub fn set_fov(&mut self, fov: Rad<f32>) {
        self.fov = fov;
        self.version += 1;
    }

    /// Returns the world-to-view matrix.
    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }
    /// Returns the view-to-clip matrix.
    pub fn projection(&self) -> Matrix4<f32> {
        perspective(self.fov, self.viewport.aspect_ratio(), self.near, self.far)
    }
    /// Returns the world-to-clip matrix.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::EuclideanSpace;
    use cubemath::{assert_approx_eq, project_point};

    use super::*;

    #[test]
    fn test_target_projects_to_viewport_center() {
        let target = Point3::new(2.6, 2.6, 2.6);
        let camera = Camera::orbiting(target, 20.0, Viewport::with_size(800.0, 600.0));
        let p = project_point(target, &camera.view_projection(), camera.viewport());
        assert_approx_eq!(p.unwrap(), cgmath::Point2::new(400.0, 300.0), epsilon = 0.01);
        assert_approx_eq!((camera.eye() - target).magnitude(), 20.0, epsilon = 0.001);
        assert_approx_eq!(camera.target().to_vec(), target.to_vec());
    }

    #[test]
    fn test_changes_bump_version() {
        let mut camera = Camera::new(
            Point3::new(0.0, 0.0, -50.0),
            Point3::new(0.0, 0.0, 0.0),
            Viewport::with_size(100.0, 100.0),
        );
        assert_eq!(camera.version(), 0);
        camera.set_viewport(Viewport::with_size(200.0, 100.0));
        camera.set_fov(Rad(1.0));
        camera.look_at(Point3::new(0.0, 0.0, 50.0), Point3::new(0.0, 0.0, 0.0), Vector3::unit_y());
        assert_eq!(camera.version(), 3);
    }
}
