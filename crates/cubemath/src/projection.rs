//! Projection of 3D points into viewport pixel space.

use cgmath::{Matrix4, Point2, Point3};

use crate::{EPSILON, Float};

/// Rectangular region of the render target, in pixels.
///
/// Pixel coordinates have their origin at the top left, with Y increasing
/// downward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    /// X coordinate of the left edge.
    pub x: Float,
    /// Y coordinate of the top edge.
    pub y: Float,
    /// Width in pixels.
    pub width: Float,
    /// Height in pixels.
    pub height: Float,
}
impl Viewport {
    /// Constructs a viewport with its top left corner at the origin.
    pub fn with_size(width: Float, height: Float) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Returns the ratio of width to height.
    pub fn aspect_ratio(&self) -> Float {
        self.width / self.height
    }

    /// Maps normalized device coordinates to pixel space.
    pub fn ndc_to_pixel(&self, ndc_x: Float, ndc_y: Float) -> Point2<Float> {
        Point2::new(
            self.x + (ndc_x + 1.0) * 0.5 * self.width,
            self.y + (1.0 - ndc_y) * 0.5 * self.height,
        )
    }
}

/// Projects `point` through the combined `world_view_projection` matrix and
/// into viewport pixel space.
///
/// Returns `None` if the point is at or behind the camera plane.
pub fn project_point(
    point: Point3<Float>,
    world_view_projection: &Matrix4<Float>,
    viewport: &Viewport,
) -> Option<Point2<Float>> {
    let clip = world_view_projection * point.to_homogeneous();
    if clip.w <= EPSILON || !clip.w.is_finite() {
        return None;
    }
    Some(viewport.ndc_to_pixel(clip.x / clip.w, clip.y / clip.w))
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, SquareMatrix, perspective};

    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_identity_projection() {
        let viewport = Viewport::with_size(800.0, 600.0);
        let m = Matrix4::identity();

        let center = project_point(Point3::new(0.0, 0.0, 0.0), &m, &viewport);
        assert_approx_eq!(center.unwrap(), Point2::new(400.0, 300.0));

        // +Y in clip space is up on the screen.
        let top_right = project_point(Point3::new(1.0, 1.0, 0.0), &m, &viewport);
        assert_approx_eq!(top_right.unwrap(), Point2::new(800.0, 0.0));
    }

    #[test]
    fn test_point_behind_camera() {
        let viewport = Viewport::with_size(100.0, 100.0);
        let proj = perspective(Deg(90.0), 1.0, 0.1, 100.0);

        assert!(project_point(Point3::new(0.0, 0.0, -5.0), &proj, &viewport).is_some());
        assert!(project_point(Point3::new(0.0, 0.0, 5.0), &proj, &viewport).is_none());
        assert!(project_point(Point3::new(0.0, 0.0, 0.0), &proj, &viewport).is_none());
    }
}
