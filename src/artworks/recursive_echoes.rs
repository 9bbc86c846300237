//! Expanding ripple trains that fade as they approach the rim.

use glam::Vec2;

use crate::canvas::Ink;
use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xBAD7DF),
    Color::hex(0xFFE2E2),
    Color::hex(0xF6F6F6),
    Color::hex(0x99DDCC),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("spawn_interval", 20.0, 39.0),
    ParamSpec::int("max_waves", 8.0, 12.0),
    ParamSpec::float("wave_speed", 1.5, 2.5),
    ParamSpec::float("stroke_weight", 1.0, 2.5),
    ParamSpec::float("fade_speed", 2.0, 5.0),
    ParamSpec::int("ripple_count", 3.0, 4.0),
    ParamSpec::int("ripple_spacing", 15.0, 24.0),
]);

/// Waves die at this fraction of the canvas size
const REACH: f32 = 0.7;

#[derive(Debug, Clone, Copy)]
struct Wave {
    radius: f32,
    alpha: f32,
}

#[derive(Default)]
pub struct RecursiveEchoes {
    waves: Vec<Wave>,
    max_radius: f32,
}

impl Sketch for RecursiveEchoes {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Fade(params.get("fade_speed"))
    }

    fn setup(&mut self, stage: &mut Stage<'_>) {
        self.max_radius = stage.size * REACH;
        self.waves.clear();
    }

    fn resize(&mut self, stage: &mut Stage<'_>) {
        self.max_radius = stage.size * REACH;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let interval = p.count("spawn_interval").max(1) as u64;
        if frame.frame_count % interval == 0 && self.waves.len() < p.count("max_waves") {
            self.waves.push(Wave {
                radius: 0.0,
                alpha: 255.0,
            });
        }

        let ripples = p.count("ripple_count").max(1);
        let spacing = p.get("ripple_spacing");
        let weight = p.get("stroke_weight");
        let center = frame.center();

        for wave in &mut self.waves {
            for r in 0..ripples {
                let radius = wave.radius - r as f32 * spacing;
                if radius <= 0.0 {
                    continue;
                }
                let alpha = wave.alpha * (1.0 - r as f32 / ripples as f32);
                let ink = match frame.palette {
                    Some(gradient) => Ink::new(
                        gradient.sample(radius / self.max_radius).with_alpha(alpha),
                        weight + 1.0,
                    ),
                    None => Ink::white(alpha, weight),
                };
                frame.canvas.stroke_circle(center, radius * 2.0, ink);
            }

            wave.radius += p.get("wave_speed");
            wave.alpha = 255.0 * (1.0 - wave.radius / self.max_radius);
        }

        let max_radius = self.max_radius;
        self.waves.retain(|wave| wave.radius <= max_radius);
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas, frame: u64) {
    c.fade(3.0);
    if frame % 30 == 0 && waves.len() < 10 {
        waves.push(Wave { radius: 0.0, alpha: 255.0 });
    }
    let center = Vec2::splat(c.size() / 2.0);
    for w in &mut waves {
        for r in 0..3 {
            let radius = w.radius - r as f32 * 20.0;
            if radius > 0.0 {
                c.stroke_circle(center, radius * 2.0, white(w.alpha * (1.0 - r as f32 / 3.0)));
            }
        }
        w.radius += 2.0;
        w.alpha = map(w.radius, 0.0, max_radius, 255.0, 0.0);
    }
    waves.retain(|w| w.radius <= max_radius);
}"#
    }
}
