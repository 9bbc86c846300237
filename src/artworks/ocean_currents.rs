//! Horizontal wave lines displaced by a slowly evolving noise volume.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Band, Frame, Modulation, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xF38181),
    Color::hex(0xFCE38A),
    Color::hex(0xEAFFD0),
    Color::hex(0x95E1D3),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("scale", 15.0, 24.0),
    ParamSpec::float("noise_scale", 0.08, 0.13),
    ParamSpec::float("z_increment", 0.008, 0.013),
    ParamSpec::float("wave_amplitude", 8.0, 13.0),
    ParamSpec::int("angle_multiplier", 3.0, 5.0),
    ParamSpec::float("fade_speed", 8.0, 13.0),
    ParamSpec::int("alpha", 60.0, 119.0),
]);

static MODULATIONS: [Modulation; 3] = [
    Modulation::new("wave_amplitude", Band::Bass, 2.0),
    Modulation::new("angle_multiplier", Band::Mid, 0.8),
    Modulation::new("z_increment", Band::Treble, 1.5),
];

#[derive(Default)]
pub struct OceanCurrents {
    cols: usize,
    rows: usize,
    zoff: f32,
}

impl OceanCurrents {
    fn measure(&mut self, stage: &Stage<'_>) {
        let scale = stage.config.get("scale").max(1.0);
        self.cols = (stage.size / scale).floor() as usize;
        self.rows = self.cols;
    }
}

impl Sketch for OceanCurrents {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn modulations(&self) -> &'static [Modulation] {
        &MODULATIONS
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE)
    }

    fn backdrop(&self, params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Fade(params.get("fade_speed"))
    }

    fn setup(&mut self, stage: &mut Stage<'_>) {
        self.measure(stage);
        self.zoff = 0.0;
    }

    fn resize(&mut self, stage: &mut Stage<'_>) {
        self.measure(stage);
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let scale = p.get("scale");
        let step = p.get("noise_scale");
        let amplitude = p.get("wave_amplitude");
        let multiplier = p.get("angle_multiplier");

        let mut points = Vec::with_capacity(self.cols + 1);
        for row in 0..self.rows {
            let yoff = row as f32 * step;
            points.clear();
            for col in 0..=self.cols {
                let xoff = col as f32 * step;
                let angle = frame.noise.get3(xoff, yoff, self.zoff) * TAU * multiplier;
                let wave = angle.sin() * amplitude;
                points.push(Vec2::new(col as f32 * scale, row as f32 * scale + wave));
            }
            let ink = frame.stroke(row as f32 / self.rows as f32, p.get("alpha"), 2.0, 1.0);
            frame.canvas.polyline(&points, false, ink);
        }

        self.zoff += p.get("z_increment");
    }

    fn source_text(&self) -> &'static str {
        r#"let mut zoff = 0.0;
fn draw(c: &mut Canvas) {
    c.fade(10.0);
    let cols = (c.size() / 20.0) as usize;
    for row in 0..cols {
        let line: Vec<Vec2> = (0..=cols)
            .map(|col| {
                let angle = noise(col as f32 * 0.1, row as f32 * 0.1, zoff) * TAU * 4.0;
                vec2(col as f32 * 20.0, row as f32 * 20.0 + angle.sin() * 10.0)
            })
            .collect();
        c.polyline(&line, false, white(80.0));
    }
    zoff += 0.01;
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_grid_follows_canvas_size() {
        let mut sketch = OceanCurrents::default();
        run_frames(&mut sketch, 100, 3, false);
        // scale is 15..=24, so 4..=6 cells across 100px
        assert!((4..=6).contains(&sketch.cols));
        assert_eq!(sketch.cols, sketch.rows);
        assert!(sketch.zoff > 0.0);
    }
}
