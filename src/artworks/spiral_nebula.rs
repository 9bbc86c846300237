//! Particles drifting outward along logarithmic-looking spiral arms.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xFFF5E4),
    Color::hex(0xFFE3E1),
    Color::hex(0xFFD1D1),
    Color::hex(0xFF9494),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("particle_count", 300.0, 699.0),
    ParamSpec::int("spiral_arms", 3.0, 5.0),
    ParamSpec::float("spiral_tightness", 0.15, 0.25),
    ParamSpec::float("rotation_speed", 0.003, 0.008),
    ParamSpec::float("particle_speed", 0.2, 0.5),
    ParamSpec::float("fade_speed", 25.0, 40.0),
    ParamSpec::int("alpha", 100.0, 179.0),
    ParamSpec::float("particle_size", 1.0, 2.0),
]);

/// Radius particles restart from
const INNER_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Particle {
    angle: f32,
    radius: f32,
    arm: usize,
}

#[derive(Default)]
pub struct SpiralNebula {
    particles: Vec<Particle>,
}

impl Sketch for SpiralNebula {
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
        let arms = stage.config.count("spiral_arms").max(1);
        let count = stage.config.count("particle_count");
        let outer = stage.size / 2.0;
        self.particles = (0..count)
            .map(|_| Particle {
                angle: stage.random(0.0, TAU),
                radius: stage.random(INNER_RADIUS, outer),
                arm: (stage.random(0.0, arms as f32) as usize).min(arms - 1),
            })
            .collect();
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let arms = p.count("spiral_arms").max(1) as f32;
        let tightness = p.get("spiral_tightness");
        let speed = p.get("particle_speed");
        let rotation = p.get("rotation_speed");
        let dot = p.get("particle_size");
        let outer = frame.size() / 2.0;

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for particle in &mut self.particles {
            let arm_offset = TAU / arms * particle.arm as f32;
            let theta = particle.angle + arm_offset + particle.radius * tightness;
            let at = Vec2::from_angle(theta) * particle.radius;

            let t = particle.radius / outer;
            let color = match frame.palette {
                Some(gradient) => gradient.sample(t),
                None => Color::gray(255.0 - t * 175.0, p.get("alpha")),
            };
            frame.canvas.fill_circle(at, dot, color);

            particle.radius += speed;
            particle.angle += rotation;
            if particle.radius > outer {
                particle.radius = INNER_RADIUS;
                particle.angle = frame.random(0.0, TAU);
            }
        }
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas) {
    c.fade(30.0);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for p in &mut particles {
        let arm = TAU / 4.0 * p.arm as f32;
        let at = Vec2::from_angle(p.angle + arm + p.radius * 0.2) * p.radius;
        c.fill_circle(at, 1.5, white(150.0));
        p.radius += 0.3;
        p.angle += 0.005;
        if p.radius > c.size() / 2.0 {
            p.radius = 10.0;
        }
    }
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_particles_recycle_at_the_rim() {
        let mut sketch = SpiralNebula::default();
        run_frames(&mut sketch, 60, 200, true);
        assert!(sketch
            .particles
            .iter()
            .all(|p| p.radius >= INNER_RADIUS && p.radius <= 30.0));
        assert!(sketch.particles.iter().all(|p| p.arm < 5));
    }
}
