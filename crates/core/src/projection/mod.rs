pub use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Rotation of `angle_degrees` around `axis`, counter-clockwise when looking
/// down the axis towards the origin. A zero axis yields the identity.
pub fn rotation(angle_degrees: f32, axis: [f32; 3]) -> Mat4 {
    match Vec3::from(axis).try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, angle_degrees.to_radians()),
        None => Mat4::IDENTITY,
    }
}

/// Right-handed perspective projection (OpenGL clip-space convention: the
/// near plane maps to -1 and the far plane to +1 in NDC depth). The result
/// is column-major, the layout `load_matrix` expects.
///
/// Preconditions are only checked in debug builds:
/// `fov_y_degrees` in (0, 180), `aspect > 0` and `0 < z_near < z_far`.
pub fn perspective(fov_y_degrees: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    debug_assert!(
        fov_y_degrees > 0.0 && fov_y_degrees < 180.0,
        "vertical field of view must be within (0, 180) degrees"
    );
    debug_assert!(aspect > 0.0, "aspect ratio must be positive");
    debug_assert!(
        z_near > 0.0 && z_near < z_far,
        "clip planes must satisfy 0 < near < far"
    );

    let f = 1.0 / (fov_y_degrees * 0.5).to_radians().tan();

    let mut m = [0.0; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (z_far + z_near) / (z_near - z_far);
    m[11] = -1.0;
    m[14] = (2.0 * z_far * z_near) / (z_near - z_far);
    Mat4::from_cols_array(&m)
}

/// Fixed camera every visualization is rendered through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// How far the camera sits back along the view direction.
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            distance: 3.0,
        }
    }
}

impl Camera {
    /// Projection for a framebuffer of the given pixel size. A degenerate
    /// framebuffer (minimized window) falls back to a square aspect.
    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        perspective(self.fov_y_degrees, aspect, self.z_near, self.z_far)
    }

    /// Modelview placing the scene origin `distance` units in front of the
    /// camera.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }
}
