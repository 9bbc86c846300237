//! Offset hexagon lattice; cells pulse and spin by distance from center.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x11998E),
    Color::hex(0x38EF7D),
    Color::hex(0x00F260),
    Color::hex(0x0575E6),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("cols", 5.0, 10.0),
    ParamSpec::int("rows", 5.0, 10.0),
    ParamSpec::int("spacing", 12.0, 39.0),
    ParamSpec::int("base_size", 8.0, 22.0),
    ParamSpec::int("size_amplitude", 5.0, 29.0),
    ParamSpec::float("time_speed", 0.01, 0.05),
    ParamSpec::int("stroke_alpha", 130.0, 229.0),
    ParamSpec::float("stroke_weight", 0.5, 1.5),
]);

/// sin(60deg), the row pitch of a hex lattice
const ROW_PITCH: f32 = 0.866;

/// Cell center for lattice coordinate (`i`, `j`); odd rows shift half a cell
fn cell_center(i: i32, j: i32, spacing: f32) -> Vec2 {
    // `%` keeps the sign, so negative odd rows shift left
    let shift = (j % 2) as f32 * spacing / 2.0;
    Vec2::new(i as f32 * spacing + shift, j as f32 * spacing * ROW_PITCH)
}

#[derive(Default)]
pub struct MorphingHexagrid {
    t: f32,
}

impl Sketch for MorphingHexagrid {
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
        let cols = p.count("cols") as i32;
        let rows = p.count("rows") as i32;
        let spacing = p.get("spacing");
        let weight = p.get("stroke_weight");
        let half = frame.size() / 2.0;
        let t = self.t;

        frame.canvas.translate(half, half);
        for i in -cols..cols {
            for j in -rows..rows {
                let at = cell_center(i, j, spacing);
                let dist = at.length();
                let size = p.get("base_size") + (t + dist * 0.05).sin() * p.get("size_amplitude");
                let ink = frame.stroke(dist / half, p.get("stroke_alpha"), weight + 0.5, weight);

                frame.canvas.push();
                frame.canvas.translate(at.x, at.y);
                frame.canvas.rotate(t + dist * 0.01);
                frame.canvas.regular_polygon(Vec2::ZERO, size, 6, ink);
                frame.canvas.pop();
            }
        }

        self.t += p.get("time_speed");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut t = 0.0;
fn draw(c: &mut Canvas) {
    c.clear(BLACK);
    c.translate(c.size() / 2.0, c.size() / 2.0);
    for i in -8..8 {
        for j in -8..8 {
            let at = vec2(i as f32 * 20.0 + (j % 2) as f32 * 10.0, j as f32 * 20.0 * 0.866);
            let dist = at.length();
            c.push();
            c.translate(at.x, at.y);
            c.rotate(t + dist * 0.01);
            c.regular_polygon(Vec2::ZERO, 15.0 + (t + dist * 0.05).sin() * 10.0, 6, white(200.0));
            c.pop();
        }
    }
    t += 0.02;
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_odd_rows_are_offset() {
        assert_eq!(cell_center(0, 0, 20.0), Vec2::ZERO);
        assert_eq!(cell_center(1, 1, 20.0).x, 30.0);
        assert_eq!(cell_center(1, -1, 20.0).x, 10.0);
    }

    #[test]
    fn test_draws_every_cell() {
        let mut sketch = MorphingHexagrid::default();
        let canvas = run_frames(&mut sketch, 100, 1, false);
        // at least a 10x10 lattice plus the clear
        assert!(canvas.draw_calls() >= 101);
    }
}
