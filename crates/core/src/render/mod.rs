//! Fixed-function style drawing surface handed to visualizations.
//!
//! [`GraphicsContext`] is the minimal surface a visualization may assume:
//! clearing, a viewport, projection/modelview matrix slots and immediate
//! mode primitive submission. [`SoftwareContext`] implements it on the CPU so
//! the desktop host can blit the result into a window surface and tests can
//! inspect pixels directly.

mod raster;

use serde::{Deserialize, Serialize};

use crate::projection::Mat4;

pub use raster::SoftwareContext;

/// Linear RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Packs the colour as `0x00RRGGBB`, the pixel format window surfaces
    /// expect.
    pub fn to_argb_u32(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::rgb(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: Color,
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: Color) -> Self {
        Self { position, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent segments, one per vertex pair.
    Lines,
    /// Connected segments through every vertex.
    LineStrip,
    /// Independent triangles, one per vertex triple.
    Triangles,
}

/// Which matrix slot `load_*`, `translate` and `rotate` operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    Projection,
    #[default]
    ModelView,
}

/// Drawing surface that is current for the duration of a frame.
pub trait GraphicsContext {
    /// Clears the colour buffer to `color` and resets the depth buffer.
    fn clear(&mut self, color: Color);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_matrix_mode(&mut self, mode: MatrixMode);

    fn load_identity(&mut self);

    fn load_matrix(&mut self, matrix: &Mat4);

    /// Post-multiplies the active matrix by a translation.
    fn translate(&mut self, x: f32, y: f32, z: f32);

    /// Post-multiplies the active matrix by a rotation.
    fn rotate(&mut self, angle_degrees: f32, axis: [f32; 3]);

    fn draw(&mut self, primitive: Primitive, vertices: &[Vertex]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_colours_as_rgb_words() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_argb_u32(), 0x00FF_0000);
        assert_eq!(Color::rgb(0.0, 1.0, 0.0).to_argb_u32(), 0x0000_FF00);
        assert_eq!(Color::rgb(2.0, -1.0, 1.0).to_argb_u32(), 0x00FF_00FF);
    }

    #[test]
    fn lerp_blends_channels() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((mid.g - 0.5).abs() < f32::EPSILON);
    }
}
