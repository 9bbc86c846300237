//! Lissajous particles painted onto a canvas that is never cleared.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xFF6B6B),
    Color::hex(0xFF8E53),
    Color::hex(0xFFB84D),
    Color::hex(0xFFA07A),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("a", 2.0, 4.0),
    ParamSpec::int("b", 2.0, 4.0),
    ParamSpec::int("particle_count", 150.0, 249.0),
    ParamSpec::int("radius", 100.0, 149.0),
    ParamSpec::float("particle_size", 2.0, 4.0),
    ParamSpec::float("time_speed", 0.008, 0.013),
    // Fraction of full opacity
    ParamSpec::float("alpha", 0.2, 0.4),
]);

#[derive(Default)]
pub struct Shuriken {
    t: f32,
}

impl Sketch for Shuriken {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, _params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Persist
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {
        self.t = 0.0;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let (a, b) = (p.get("a"), p.get("b"));
        let count = p.count("particle_count").max(1);
        let radius = p.get("radius");
        let dot = p.get("particle_size");
        let opacity = p.get("alpha") * 255.0;

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for i in 0..count {
            let fi = i as f32;
            let at = Vec2::new(
                (a * self.t + fi / 100.0).sin(),
                (b * self.t + fi / 20.0).cos(),
            ) * radius;
            let share = fi / count as f32;
            let color = match frame.palette {
                Some(gradient) => gradient.sample(share).with_alpha(opacity),
                // Later particles are more opaque
                None => Color::WHITE.with_alpha(share * opacity),
            };
            frame.canvas.fill_circle(at, dot, color);
        }

        self.t += p.get("time_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for i in 0..200 {
        let fi = i as f32;
        let at = vec2((3.0 * t + fi / 100.0).sin(), (3.0 * t + fi / 20.0).cos()) * 120.0;
        c.fill_circle(at, 3.0, white(fi / 200.0 * 80.0));
    }
    t += 0.01;
}"#
    }
}
