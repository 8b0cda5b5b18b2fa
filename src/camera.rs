//! Perspective camera used to turn a fingertip into a world-space pointer.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Perspective camera looking at the swarm.
///
/// The default matches the scene the swarm is tuned for: a 45° vertical
/// field of view from `z = 400`, looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera with default positioning.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 400.0),
            target: Vec3::ZERO,
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection with an OpenGL-style `[-1, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Transform a point in normalized device coordinates back to world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let world = self.view_proj().inverse() * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        world.truncate() / world.w
    }

    /// Cast a ray from the camera through `(ndc_x, ndc_y)` and intersect it
    /// with the plane `z = plane_z`.
    ///
    /// Returns `None` when the ray runs parallel to the plane or the
    /// intersection is not finite.
    pub fn ray_to_plane_z(&self, ndc_x: f32, ndc_y: f32, plane_z: f32) -> Option<Vec3> {
        let through = self.unproject(Vec3::new(ndc_x, ndc_y, 0.5));
        let dir = (through - self.position).normalize_or_zero();
        if dir.z.abs() < 1e-6 {
            return None;
        }
        let distance = (plane_z - self.position.z) / dir.z;
        let hit = self.position + dir * distance;
        hit.is_finite().then_some(hit)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
