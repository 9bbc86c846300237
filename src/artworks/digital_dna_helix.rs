//! Rungs of a double helix whose width swings with a sine wave.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Band, Frame, Modulation, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x96A78D),
    Color::hex(0xB6CEB4),
    Color::hex(0xD9E9CF),
    Color::hex(0xF0F0F0),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::float("wave_speed", 0.03, 0.06),
    ParamSpec::int("amplitude", 60.0, 99.0),
    ParamSpec::int("line_spacing", 6.0, 9.0),
    ParamSpec::float("time_increment", 1.5, 2.5),
    ParamSpec::float("circle_size", 2.0, 4.0),
    ParamSpec::int("alpha", 200.0, 299.0),
]);

static MODULATIONS: [Modulation; 3] = [
    Modulation::new("amplitude", Band::Bass, 1.5),
    Modulation::new("wave_speed", Band::Mid, 0.8),
    Modulation::new("time_increment", Band::Treble, 2.0),
];

/// Half height of the helix in pixels
const HALF_SPAN: i32 = 180;

#[derive(Default)]
pub struct DigitalDnaHelix {
    t: f32,
}

impl Sketch for DigitalDnaHelix {
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
        let amplitude = p.get("amplitude");
        let wave_speed = p.get("wave_speed");
        let spacing = p.count("line_spacing").max(1);
        let circle = p.get("circle_size");

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for i in (-HALF_SPAN..HALF_SPAN).step_by(spacing) {
            let y = i as f32;
            let x = ((y + self.t) * wave_speed).sin() * amplitude;
            let (left, right) = (Vec2::new(x, y), Vec2::new(-x, y));
            let ink = frame.stroke(y.abs() / HALF_SPAN as f32, p.get("alpha"), 1.5, 1.0);

            frame.canvas.line(left, right, ink);
            if frame.colored() {
                frame.canvas.fill_circle(left, circle, ink.color);
                frame.canvas.fill_circle(right, circle, ink.color);
            } else {
                frame.canvas.stroke_circle(left, circle, ink);
                frame.canvas.stroke_circle(right, circle, ink);
            }
        }

        self.t += p.get("time_increment");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.clear(BLACK);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for i in (-180..180).step_by(8) {
        let y = i as f32;
        let x = ((y + t) * 0.05).sin() * 80.0;
        c.line(vec2(x, y), vec2(-x, y), WHITE);
        c.stroke_circle(vec2(x, y), 3.0, WHITE);
        c.stroke_circle(vec2(-x, y), 3.0, WHITE);
    }
    t += 2.0;
}"#
    }
}
