//! Short strokes on a grid, each pointing along a drifting noise field.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Band, Frame, Modulation, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xFFFFD0),
    Color::hex(0xF3CCFF),
    Color::hex(0xD09CFA),
    Color::hex(0xA555EC),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("grid_spacing", 10.0, 19.0),
    ParamSpec::float("noise_scale", 0.005, 0.02),
    ParamSpec::float("time_speed", 0.005, 0.02),
    ParamSpec::int("angle_multiplier", 1.0, 2.0),
    ParamSpec::float("line_length", 8.0, 13.0),
    ParamSpec::int("alpha", 80.0, 129.0),
]);

static MODULATIONS: [Modulation; 3] = [
    Modulation::new("line_length", Band::Bass, 1.2),
    Modulation::new("angle_multiplier", Band::Mid, 0.8),
    Modulation::new("time_speed", Band::Treble, 2.0),
];

#[derive(Default)]
pub struct AbstractFluid {
    t: f32,
}

impl Sketch for AbstractFluid {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn modulations(&self) -> &'static [Modulation] {
        &MODULATIONS
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, _params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Clear(Color::BLACK)
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {
        self.t = 0.0;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let spacing = p.get("grid_spacing").max(1.0);
        let scale = p.get("noise_scale");
        let multiplier = p.get("angle_multiplier");
        let length = p.get("line_length");
        let size = frame.size();

        let mut y = 0.0;
        while y < size {
            let ink = frame.stroke(y / size, p.get("alpha"), 1.5, 1.0);
            let mut x = 0.0;
            while x < size {
                let angle = frame.noise.get3(x * scale, y * scale, self.t) * TAU * multiplier;
                let from = Vec2::new(x, y);
                frame
                    .canvas
                    .line(from, from + Vec2::from_angle(angle) * length, ink);
                x += spacing;
            }
            y += spacing;
        }

        self.t += p.get("time_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.clear(BLACK);
    for x in (0..c.width()).step_by(15) {
        for y in (0..c.height()).step_by(15) {
            let angle = noise(x as f32 * 0.01, y as f32 * 0.01, t) * TAU * 2.0;
            let from = vec2(x as f32, y as f32);
            c.line(from, from + Vec2::from_angle(angle) * 10.0, white(100.0));
        }
    }
    t += 0.01;
}"#
    }
}
