//! Line segments whose endpoints wander through one-dimensional noise.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x4A90E2),
    Color::hex(0x50C9CE),
    Color::hex(0x7FDBFF),
    Color::hex(0xB3E5FC),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("line_count", 150.0, 249.0),
    ParamSpec::float("noise_scale", 0.01, 0.015),
    ParamSpec::float("time_speed", 0.008, 0.013),
    ParamSpec::float("fade_speed", 20.0, 30.0),
    ParamSpec::int("alpha", 80.0, 129.0),
    ParamSpec::float("stroke_weight", 1.0, 1.5),
]);

#[derive(Default)]
pub struct DynamicVectorFlow {
    t: f32,
}

impl Sketch for DynamicVectorFlow {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Fade(params.get("fade_speed"))
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {
        self.t = 0.0;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let lines = p.count("line_count");
        let scale = p.get("noise_scale");
        let weight = p.get("stroke_weight");
        let size = frame.size();
        let t = self.t;
        let noise = frame.noise;

        for i in 0..lines {
            let u = i as f32 * scale;
            let from = Vec2::new(noise.get2(u, t), noise.get2(u + 100.0, t)) * size;
            let to = Vec2::new(noise.get2(u, t + 5.0), noise.get2(u + 105.0, t + 5.0)) * size;
            // Monochrome lines shimmer with a travelling sine
            let shimmer = 100.0 + 155.0 * (t * 2.0 + i as f32 * 0.02).sin();
            let ink = frame.stroke(i as f32 / lines as f32, shimmer, weight + 0.5, weight);
            frame.canvas.line(from, to, ink);
        }

        self.t += p.get("time_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.fade(25.0);
    for i in 0..200 {
        let u = i as f32 * 0.01;
        let from = vec2(noise(u, t), noise(u + 100.0, t)) * c.size();
        let to = vec2(noise(u, t + 5.0), noise(u + 105.0, t + 5.0)) * c.size();
        c.line(from, to, white(100.0 + 155.0 * (t * 2.0 + i as f32 * 0.02).sin()));
    }
    t += 0.01;
}"#
    }
}
