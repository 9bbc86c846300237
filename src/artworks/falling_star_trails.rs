//! Streaks of light spawned along the top edge, falling at random speeds.

use glam::Vec2;

use crate::canvas::Ink;
use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

/// Background, then star color
static BASE: [Color; 2] = [Color::hex(0x000000), Color::hex(0xB6F500)];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("spawn_interval", 2.0, 3.0),
    ParamSpec::float("min_speed", 1.5, 2.5),
    ParamSpec::float("max_speed", 4.0, 6.0),
    ParamSpec::int("trail_length", 8.0, 12.0),
    ParamSpec::float("alpha", 200.0, 250.0),
    ParamSpec::float("fade_speed", 30.0, 50.0),
]);

#[derive(Debug, Clone, Copy)]
struct Star {
    position: Vec2,
    speed: f32,
}

#[derive(Default)]
pub struct FallingStarTrails {
    stars: Vec<Star>,
}

impl FallingStarTrails {
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }
}

impl Sketch for FallingStarTrails {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE).with_steps(BASE.len())
    }

    fn backdrop(&self, params: &ArtworkConfig, palette: Option<&Gradient>) -> Backdrop {
        match palette {
            Some(gradient) => Backdrop::Clear(gradient.first()),
            None => Backdrop::Fade(params.get("fade_speed")),
        }
    }

    fn setup(&mut self, _stage: &mut Stage<'_>) {
        self.stars.clear();
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let interval = p.count("spawn_interval").max(1) as u64;
        if frame.frame_count % interval == 0 {
            let x = frame.random(0.0, frame.size());
            let speed = frame.random(p.get("min_speed"), p.get("max_speed"));
            self.stars.push(Star {
                position: Vec2::new(x, 0.0),
                speed,
            });
        }

        let ink = match frame.palette {
            Some(gradient) => Ink::new(gradient.last(), 2.0),
            None => Ink::white(p.get("alpha"), 1.0),
        };
        let trail = Vec2::new(0.0, p.get("trail_length"));
        for star in &mut self.stars {
            frame.canvas.line(star.position, star.position + trail, ink);
            star.position.y += star.speed;
        }

        let height = frame.size();
        self.stars.retain(|star| star.position.y < height);
    }

    fn source_text(&self) -> &'static str {
        r#"let mut stars = Vec::new();
fn draw(c: &mut Canvas, frame: u64) {
    c.fade(50.0);
    if frame % 3 == 0 {
        stars.push(Star { x: random(0.0, c.size()), y: 0.0, speed: random(2.0, 6.0) });
    }
    for s in &mut stars {
        c.line(vec2(s.x, s.y), vec2(s.x, s.y + 10.0), WHITE);
        s.y += s.speed;
    }
    stars.retain(|s| s.y < c.size());
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_stars_leave_through_the_bottom() {
        let mut sketch = FallingStarTrails::default();
        run_frames(&mut sketch, 40, 300, false);
        assert!(sketch.star_count() > 0);

        // A 40px canvas is crossed in at most 40 / 1.5 frames
        assert!(sketch.stars.iter().all(|s| s.position.y < 40.0));
        assert!(sketch.star_count() <= 40 / 2);
    }

    #[test]
    fn test_color_mode_clears_to_background() {
        let sketch = FallingStarTrails::default();
        let gradient = sketch.palette().resolve(true).unwrap();
        let config = ArtworkConfig::default();
        assert_eq!(
            sketch.backdrop(&config, Some(&gradient)),
            Backdrop::Clear(Color::BLACK)
        );
        assert_eq!(gradient.last(), Color::hex(0xB6F500));
    }
}
