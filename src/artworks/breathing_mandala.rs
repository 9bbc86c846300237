//! Nested polygons that swell and relax while turning in alternate directions.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::canvas::Ink;
use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x364F6B),
    Color::hex(0x3FC1C9),
    Color::hex(0xF5F5F5),
    Color::hex(0xFC5185),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("layers", 6.0, 9.0),
    ParamSpec::int("sides", 6.0, 9.0),
    ParamSpec::float("breath_speed", 0.015, 0.03),
    ParamSpec::int("min_size", 30.0, 49.0),
    ParamSpec::int("max_size", 80.0, 119.0),
    ParamSpec::float("rotation_speed", 0.002, 0.005),
    ParamSpec::int("alpha", 100.0, 199.0),
]);

/// How far a layer grows at full breath
const BREATH_DEPTH: f32 = 0.3;

#[derive(Default)]
pub struct BreathingMandala {
    t: f32,
}

fn vertices(radius: f32, sides: usize) -> Vec<Vec2> {
    let step = TAU / sides as f32;
    (0..sides)
        .map(|i| Vec2::from_angle(step * i as f32) * radius)
        .collect()
}

impl Sketch for BreathingMandala {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
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
        let layers = p.count("layers").max(1);
        let sides = p.count("sides").max(3);
        let (min_size, max_size) = (p.get("min_size"), p.get("max_size"));
        let alpha = p.get("alpha");
        let breath = 1.0 + ((self.t.sin() * 0.5 + 0.5) * BREATH_DEPTH);
        let layer_size = |layer: usize| {
            (min_size + (max_size - min_size) * layer as f32 / layers as f32) * breath
        };

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for layer in 0..layers {
            let t = layer as f32 / (layers - 1).max(1) as f32;
            let ink = frame.stroke(t, alpha, 2.0, 1.0);
            let direction = if layer % 2 == 0 { 1.0 } else { -1.0 };

            frame.canvas.push();
            frame
                .canvas
                .rotate(self.t * p.get("rotation_speed") * direction);
            let ring = vertices(layer_size(layer), sides);
            frame.canvas.polygon(&ring, ink);

            if layer + 1 < layers {
                let spoke = Ink::new(ink.color.with_alpha(alpha * 0.3), ink.weight);
                let next = vertices(layer_size(layer + 1), sides);
                for (from, to) in ring.iter().zip(&next) {
                    frame.canvas.line(*from, *to, spoke);
                }
            }
            frame.canvas.pop();
        }

        self.t += p.get("breath_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.clear(BLACK);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    let breath = t.sin() * 0.5 + 0.5;
    for layer in 0..8 {
        let size = map(layer as f32, 0.0, 8.0, 40.0, 100.0) * (1.0 + breath * 0.3);
        c.push();
        c.rotate(t * 0.003 * if layer % 2 == 0 { 1.0 } else { -1.0 });
        c.regular_polygon(Vec2::ZERO, size, 8, white(150.0));
        c.pop();
    }
    t += 0.02;
}"#
    }
}
