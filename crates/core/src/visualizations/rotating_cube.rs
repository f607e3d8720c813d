use std::collections::BTreeMap;

use crate::registry::{metadata, Visualization, DESCRIPTION_KEY, NAME_KEY};
use crate::render::{Color, GraphicsContext, Primitive, Vertex};

const DEGREES_PER_FRAME: f32 = 1.0;
const AXIS: [f32; 3] = [1.0, 1.0, 0.0];

/// Corner indices of each face, counter-clockwise seen from outside.
const FACES: [([usize; 4], Color); 6] = [
    ([4, 5, 6, 7], Color::rgb(1.0, 0.0, 0.0)),
    ([1, 0, 3, 2], Color::rgb(0.0, 1.0, 0.0)),
    ([0, 4, 7, 3], Color::rgb(0.0, 0.0, 1.0)),
    ([5, 1, 2, 6], Color::rgb(1.0, 1.0, 0.0)),
    ([7, 6, 2, 3], Color::rgb(0.0, 1.0, 1.0)),
    ([0, 1, 5, 4], Color::rgb(1.0, 0.0, 1.0)),
];

const CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// Unit cube with one solid colour per face, spinning around a tilted axis.
#[derive(Debug, Default)]
pub struct RotatingCube {
    angle: f32,
}

impl RotatingCube {
    pub fn info() -> BTreeMap<String, String> {
        metadata([
            (NAME_KEY, "Rotating Cube"),
            (DESCRIPTION_KEY, "A colour-faced cube spinning about a diagonal axis"),
        ])
    }

    fn triangles() -> Vec<Vertex> {
        FACES
            .iter()
            .flat_map(|(quad, color)| {
                [0, 1, 2, 0, 2, 3].map(|corner| Vertex::new(CORNERS[quad[corner]], *color))
            })
            .collect()
    }
}

impl Visualization for RotatingCube {
    fn render_frame(&mut self, gfx: &mut dyn GraphicsContext) {
        gfx.rotate(self.angle, AXIS);
        gfx.draw(Primitive::Triangles, &Self::triangles());
        self.angle = (self.angle + DEGREES_PER_FRAME) % 360.0;
    }
}
