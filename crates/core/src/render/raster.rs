use crate::projection::{rotation, Mat4, Vec3, Vec4};

use super::{Color, GraphicsContext, MatrixMode, Primitive, Vertex};

/// Vertices that still sit this close to the eye (in clip `w`) after near
/// plane clipping are rejected.
const MIN_CLIP_W: f32 = 1e-5;

/// Vertex in clip space, before the perspective divide.
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Vec4,
    color: Color,
}

impl ClipVertex {
    /// Signed distance to the near plane `z = -w`; negative means behind it.
    fn near_distance(&self) -> f32 {
        self.position.z + self.position.w
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            color: self.color.lerp(other.color, t),
        }
    }
}

/// Clips a convex polygon against the near plane (Sutherland-Hodgman).
fn clip_polygon_near(polygon: &[ClipVertex]) -> Vec<ClipVertex> {
    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (dc, dn) = (current.near_distance(), next.near_distance());
        if dc >= 0.0 {
            clipped.push(current);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            clipped.push(current.lerp(next, dc / (dc - dn)));
        }
    }
    clipped
}

fn clip_segment_near(a: ClipVertex, b: ClipVertex) -> Option<(ClipVertex, ClipVertex)> {
    let (da, db) = (a.near_distance(), b.near_distance());
    match (da >= 0.0, db >= 0.0) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (true, false) => Some((a, a.lerp(b, da / (da - db)))),
        (false, true) => Some((a.lerp(b, da / (da - db)), b)),
    }
}

/// Vertex after projection: pixel coordinates plus depth in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: Color,
}

impl ScreenVertex {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            depth: self.depth + (other.depth - self.depth) * t,
            color: self.color.lerp(other.color, t),
        }
    }
}

/// CPU implementation of [`GraphicsContext`] with a colour and a depth
/// buffer. Rows are stored top to bottom, matching window surfaces.
#[derive(Debug, Clone)]
pub struct SoftwareContext {
    width: u32,
    height: u32,
    color: Vec<u32>,
    depth: Vec<f32>,
    mode: MatrixMode,
    projection: Mat4,
    model_view: Mat4,
}

impl SoftwareContext {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![0; len],
            depth: vec![1.0; len],
            mode: MatrixMode::default(),
            projection: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Packed `0x00RRGGBB` pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.color
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.color[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn model_view(&self) -> &Mat4 {
        &self.model_view
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    fn active(&mut self) -> &mut Mat4 {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.model_view,
        }
    }

    fn to_clip(mvp: &Mat4, vertex: &Vertex) -> ClipVertex {
        ClipVertex {
            position: mvp.mul_vec4(Vec3::from(vertex.position).extend(1.0)),
            color: vertex.color,
        }
    }

    fn to_screen(&self, vertex: &ClipVertex) -> Option<ScreenVertex> {
        let clip = vertex.position;
        if clip.w <= MIN_CLIP_W {
            return None;
        }

        let inv_w = 1.0 / clip.w;
        let (nx, ny, nz) = (clip.x * inv_w, clip.y * inv_w, clip.z * inv_w);

        Some(ScreenVertex {
            x: (nx + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ny) * 0.5 * self.height as f32,
            depth: (nz + 1.0) * 0.5,
            color: vertex.color,
        })
    }

    /// Parameter range of `a -> b` inside the target rectangle (Liang-Barsky).
    fn clip_to_target(&self, a: &ScreenVertex, b: &ScreenVertex) -> Option<(f32, f32)> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (width, height) = (self.width as f32, self.height as f32);
        let bounds = [
            (-dx, a.x),
            (dx, width - a.x),
            (-dy, a.y),
            (dy, height - a.y),
        ];

        let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
        for (p, q) in bounds {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
        (t0 <= t1).then_some((t0, t1))
    }

    fn plot(&mut self, x: i64, y: i64, depth: f32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        if !(0.0..=1.0).contains(&depth) {
            return;
        }

        let index = self.index(x as usize, y as usize);
        if depth <= self.depth[index] {
            self.depth[index] = depth;
            self.color[index] = color.to_argb_u32();
        }
    }

    fn draw_line(&mut self, a: ScreenVertex, b: ScreenVertex) {
        let Some((t0, t1)) = self.clip_to_target(&a, &b) else {
            return;
        };
        let (a, b) = (a.lerp(b, t0), a.lerp(b, t1));

        // One extra step keeps consecutive samples less than a pixel apart.
        let span = (b.x - a.x).abs().max((b.y - a.y).abs());
        let steps = span.ceil() as u32 + 1;

        for step in 0..=steps {
            let p = a.lerp(b, step as f32 / steps as f32);
            self.plot(p.x.floor() as i64, p.y.floor() as i64, p.depth, p.color);
        }
    }

    fn draw_triangle(&mut self, v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex) {
        let area = edge(&v0, &v1, v2.x, v2.y);
        if area.abs() <= f32::EPSILON {
            return;
        }

        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32) as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32) as i64;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(&v1, &v2, px, py) / area;
                let w1 = edge(&v2, &v0, px, py) / area;
                let w2 = edge(&v0, &v1, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let color = Color::rgb(
                    w0 * v0.color.r + w1 * v1.color.r + w2 * v2.color.r,
                    w0 * v0.color.g + w1 * v1.color.g + w2 * v2.color.g,
                    w0 * v0.color.b + w1 * v1.color.b + w2 * v2.color.b,
                );
                self.plot(x, y, depth, color);
            }
        }
    }

    fn draw_clipped_line(&mut self, a: ClipVertex, b: ClipVertex) {
        let Some((a, b)) = clip_segment_near(a, b) else {
            return;
        };
        if let (Some(a), Some(b)) = (self.to_screen(&a), self.to_screen(&b)) {
            self.draw_line(a, b);
        }
    }

    /// Clips against the near plane and fans the remaining polygon.
    fn draw_clipped_triangle(&mut self, tri: &[ClipVertex]) {
        let polygon = clip_polygon_near(tri);
        let Some(screen) = polygon
            .iter()
            .map(|v| self.to_screen(v))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };

        for i in 1..screen.len().saturating_sub(1) {
            self.draw_triangle(screen[0], screen[i], screen[i + 1]);
        }
    }
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

impl GraphicsContext for SoftwareContext {
    fn clear(&mut self, color: Color) {
        self.color.fill(color.to_argb_u32());
        self.depth.fill(1.0);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let len = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.color = vec![0; len];
        self.depth = vec![1.0; len];
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    fn load_identity(&mut self) {
        *self.active() = Mat4::IDENTITY;
    }

    fn load_matrix(&mut self, matrix: &Mat4) {
        *self.active() = *matrix;
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        let active = self.active();
        *active = *active * Mat4::from_translation(Vec3::new(x, y, z));
    }

    fn rotate(&mut self, angle_degrees: f32, axis: [f32; 3]) {
        let active = self.active();
        *active = *active * rotation(angle_degrees, axis);
    }

    fn draw(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let mvp = self.projection * self.model_view;
        let clip: Vec<ClipVertex> = vertices.iter().map(|v| Self::to_clip(&mvp, v)).collect();

        match primitive {
            Primitive::Lines => {
                for pair in clip.chunks_exact(2) {
                    self.draw_clipped_line(pair[0], pair[1]);
                }
            }
            Primitive::LineStrip => {
                for pair in clip.windows(2) {
                    self.draw_clipped_line(pair[0], pair[1]);
                }
            }
            Primitive::Triangles => {
                for tri in clip.chunks_exact(3) {
                    self.draw_clipped_triangle(tri);
                }
            }
        }
    }
}
