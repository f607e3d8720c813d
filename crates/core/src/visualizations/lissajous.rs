use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::registry::{metadata, Visualization, DESCRIPTION_KEY, NAME_KEY};
use crate::render::{Color, GraphicsContext, Primitive, Vertex};

const SAMPLES: usize = 512;
const PHASE_STEP: f32 = 0.01;

/// 3D Lissajous figure with frequencies 3:2:5 whose x phase drifts over time.
#[derive(Debug, Default)]
pub struct LissajousCurve {
    phase: f32,
}

impl LissajousCurve {
    pub fn info() -> BTreeMap<String, String> {
        metadata([
            (NAME_KEY, "Lissajous Curve"),
            (DESCRIPTION_KEY, "A drifting three dimensional Lissajous figure"),
        ])
    }

    fn points(&self) -> Vec<Vertex> {
        let start = Color::rgb(0.2, 0.6, 1.0);
        let end = Color::rgb(1.0, 0.4, 0.8);

        (0..=SAMPLES)
            .map(|i| {
                let t = i as f32 / SAMPLES as f32;
                let s = t * TAU;
                let position = [
                    (3.0 * s + self.phase).sin(),
                    (2.0 * s).sin(),
                    (5.0 * s).sin() * 0.5,
                ];
                Vertex::new(position, start.lerp(end, t))
            })
            .collect()
    }
}

impl Visualization for LissajousCurve {
    fn render_frame(&mut self, gfx: &mut dyn GraphicsContext) {
        gfx.draw(Primitive::LineStrip, &self.points());
        self.phase = (self.phase + PHASE_STEP) % TAU;
    }
}
