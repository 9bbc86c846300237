//! Concentric rings whose radii ripple until neighbours interfere.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x667EEA),
    Color::hex(0x764BA2),
    Color::hex(0xF093FB),
    Color::hex(0x4FACFE),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("rings", 3.0, 14.0).default_value(7.0),
    ParamSpec::int("base_radius", 10.0, 39.0).default_value(20.0),
    ParamSpec::int("radius_spacing", 10.0, 34.0).default_value(20.0),
    ParamSpec::int("wave_amplitude", 50.0, 299.0).default_value(100.0),
    ParamSpec::int("wave_frequency", 2.0, 19.0).default_value(5.0),
    ParamSpec::float("time_speed", 0.01, 0.05).default_value(0.02),
    ParamSpec::int("stroke_alpha", 80.0, 179.0).default_value(150.0),
    ParamSpec::float("stroke_weight", 0.5, 2.0).default_value(1.2),
]);

const ANGLE_STEP: f32 = 0.1;

#[derive(Default)]
pub struct HarmonicInterference {
    t: f32,
}

impl Sketch for HarmonicInterference {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, _params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Fade(30.0)
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {
        self.t = 0.0;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let rings = p.count("rings");
        let frequency = p.get("wave_frequency");
        let weight = p.get("stroke_weight");
        let t = self.t;
        let steps = (TAU / ANGLE_STEP).ceil() as usize;

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for i in 0..rings {
            let radius = p.get("base_radius") + i as f32 * p.get("radius_spacing");
            let wave = (t + i as f32 * 0.1).sin() * p.get("wave_amplitude");
            let ring: Vec<Vec2> = (0..steps)
                .map(|step| {
                    let a = step as f32 * ANGLE_STEP;
                    Vec2::from_angle(a) * (radius + wave * (a * frequency + t).sin())
                })
                .collect();
            let ink = frame.stroke(
                i as f32 / rings as f32,
                p.get("stroke_alpha"),
                weight + 0.5,
                weight,
            );
            frame.canvas.polygon(&ring, ink);
        }

        self.t += p.get("time_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.fade(30.0);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for i in 0..8 {
        let radius = 20.0 + i as f32 * 20.0;
        let wave = (t + i as f32 * 0.1).sin() * 100.0;
        let ring: Vec<Vec2> = (0..63)
            .map(|s| {
                let a = s as f32 * 0.1;
                Vec2::from_angle(a) * (radius + wave * (a * 5.0 + t).sin())
            })
            .collect();
        c.polygon(&ring, white(150.0));
    }
    t += 0.02;
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_curated() {
        let mut rng = rand::rng();
        let config = SCHEMA.generate_default(&mut rng);
        assert_eq!(config.get("rings"), 7.0);
        assert_eq!(config.get("wave_frequency"), 5.0);
        assert_eq!(config.get("stroke_weight"), 1.2);
    }
}
