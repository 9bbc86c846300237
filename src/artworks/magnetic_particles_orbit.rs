//! Particles steered by a static noise field around the canvas center.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xF08787),
    Color::hex(0xFFC7A7),
    Color::hex(0xFEE2AD),
    Color::hex(0xF8FAB4),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("particle_count", 300.0, 599.0),
    ParamSpec::float("noise_scale", 0.003, 0.006),
    ParamSpec::int("angle_multiplier", 3.0, 5.0),
    ParamSpec::float("fade_speed", 30.0, 50.0),
    ParamSpec::int("alpha", 80.0, 129.0),
    ParamSpec::float("speed", 0.5, 1.0),
]);

/// Positions are relative to the canvas center
#[derive(Default)]
pub struct MagneticParticlesOrbit {
    particles: Vec<Vec2>,
}

impl MagneticParticlesOrbit {
    fn scatter(&mut self, stage: &mut Stage<'_>) {
        let half = stage.size / 2.0;
        let count = stage.config.count("particle_count");
        self.particles = (0..count)
            .map(|_| Vec2::new(stage.random(-half, half), stage.random(-half, half)))
            .collect();
    }
}

impl Sketch for MagneticParticlesOrbit {
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
        self.scatter(stage);
    }

    fn resize(&mut self, stage: &mut Stage<'_>) {
        self.scatter(stage);
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let scale = p.get("noise_scale");
        let multiplier = p.get("angle_multiplier");
        let speed = p.get("speed");
        let half = frame.size() / 2.0;

        let center = frame.center();
        frame.canvas.translate(center.x, center.y);
        for i in 0..self.particles.len() {
            let mut particle = self.particles[i];
            let angle = frame.noise.get2(particle.x * scale, particle.y * scale) * TAU * multiplier;
            particle += Vec2::from_angle(angle) * speed;
            if particle.length() > half {
                particle = Vec2::new(frame.random(-half, half), frame.random(-half, half));
            }
            self.particles[i] = particle;

            let ink = frame.stroke(particle.length() / half, p.get("alpha"), 2.0, 1.0);
            frame.canvas.point(particle, ink);
        }
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas) {
    c.fade(40.0);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for p in &mut particles {
        let angle = noise(p.x * 0.005, p.y * 0.005) * TAU * 4.0;
        *p += Vec2::from_angle(angle);
        if p.length() > c.size() / 2.0 {
            *p = random_point_in_square(c.size() / 2.0);
        }
        c.point(*p, white(100.0));
    }
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_particles_stay_inside_radius() {
        let mut sketch = MagneticParticlesOrbit::default();
        run_frames(&mut sketch, 80, 50, true);
        let limit = 40.0 * std::f32::consts::SQRT_2;
        assert!(sketch.particles.iter().all(|p| p.length() <= limit));
        assert!((300..=599).contains(&sketch.particles.len()));
    }
}
