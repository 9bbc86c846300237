//! Particles falling into an inverse-square pull toward the center.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 1] = [Color::hex(0x892CDC)];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("particle_count", 200.0, 399.0),
    ParamSpec::float("force_multiplier", 20.0, 30.0),
    ParamSpec::float("force_divisor", 80.0, 130.0),
    ParamSpec::float("fade_speed", 25.0, 35.0),
    ParamSpec::int("alpha", 70.0, 109.0),
]);

#[derive(Default)]
pub struct ParticleWarpField {
    particles: Vec<Vec2>,
}

impl ParticleWarpField {
    fn scatter(&mut self, stage: &mut Stage<'_>) {
        let size = stage.size;
        let count = stage.config.count("particle_count");
        self.particles = (0..count)
            .map(|_| Vec2::new(stage.random(0.0, size), stage.random(0.0, size)))
            .collect();
    }
}

impl Sketch for ParticleWarpField {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE).with_steps(1)
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
        let pull = p.get("force_divisor") * p.get("force_multiplier");
        let size = frame.size();
        let center = frame.center();
        let ink = frame.stroke(0.0, p.get("alpha"), 2.0, 1.0);

        for particle in &mut self.particles {
            let offset = center - *particle;
            // Clamp so a particle sitting on the center does not divide by zero
            let dist_sq = offset.length_squared().max(1.0);
            *particle += offset.normalize_or_zero() * (pull / dist_sq);
            frame.canvas.point(*particle, ink);

            let outside =
                particle.x < 0.0 || particle.x > size || particle.y < 0.0 || particle.y > size;
            if outside {
                *particle = Vec2::new(frame.random(0.0, size), frame.random(0.0, size));
            }
        }
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas) {
    c.fade(30.0);
    let center = Vec2::splat(c.size() / 2.0);
    for p in &mut particles {
        let offset = center - *p;
        let force = 100.0 / offset.length_squared();
        *p += offset.normalize() * force * 30.0;
        c.point(*p, white(80.0));
        if !c.contains(*p) {
            *p = random_point(c.size());
        }
    }
}"#
    }
}
