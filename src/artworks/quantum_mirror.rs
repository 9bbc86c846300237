//! Random dots in a rotating disc, mirrored across the vertical axis.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xE3FDFD),
    Color::hex(0xCBF1F5),
    Color::hex(0xA6E3E9),
    Color::hex(0x71C9CE),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("particle_count", 150.0, 249.0),
    ParamSpec::int("max_radius", 150.0, 199.0),
    ParamSpec::float("rotation_speed", 0.008, 0.013),
    ParamSpec::float("particle_size", 1.5, 3.0),
    // Fraction of full opacity
    ParamSpec::float("fade_speed", 0.15, 0.25),
    ParamSpec::int("alpha", 150.0, 249.0),
]);

/// Stateless: every frame is a fresh scatter
#[derive(Default)]
pub struct QuantumMirror;

impl Sketch for QuantumMirror {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Fade(params.get("fade_speed") * 255.0)
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {}

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let max_radius = p.get("max_radius");
        let spin = frame.frame_count as f32 * p.get("rotation_speed");
        let dot = p.get("particle_size");

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for _ in 0..p.count("particle_count") {
            let angle = frame.random(0.0, std::f32::consts::TAU);
            let r = frame.random(0.0, max_radius);
            let at = Vec2::from_angle(angle + spin) * r;
            let t = r / max_radius;
            let color = match frame.palette {
                Some(gradient) => gradient.sample(t),
                // Brighter toward the middle
                None => Color::gray(255.0 - t * 155.0, p.get("alpha")),
            };
            frame.canvas.fill_circle(at, dot, color);
            frame.canvas.fill_circle(Vec2::new(-at.x, at.y), dot, color);
        }
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas, frame: u64) {
    c.fade(50.0);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for _ in 0..200 {
        let r = random(0.0, 180.0);
        let at = Vec2::from_angle(random(0.0, TAU) + frame as f32 * 0.01) * r;
        c.fill_circle(at, 2.0, white(200.0));
        c.fill_circle(vec2(-at.x, at.y), 2.0, white(200.0));
    }
}"#
    }
}
