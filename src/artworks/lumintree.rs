//! Recursive binary tree whose branching angle sways over time.
//!
//! The tree's structure is fixed; only the sway speed is tunable, so
//! randomizing adjusts it in place without restarting the animation.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::canvas::{Canvas, Ink};
use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, RandomizePolicy, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0x80A1BA),
    Color::hex(0xB4DEBD),
    Color::hex(0xC2E2FA),
    Color::hex(0xFFF7DD),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::fixed("trunk_length", 85.0),
    ParamSpec::fixed("branch_ratio", 0.67),
    ParamSpec::fixed("min_branch_length", 4.0),
    ParamSpec::fixed("min_angle", PI / 16.0),
    ParamSpec::fixed("max_angle", FRAC_PI_2),
    ParamSpec::fixed("stroke_weight", 1.0),
    ParamSpec::fixed("alpha", 200.0),
    ParamSpec::float("sway_speed", 0.008, 0.013),
]);

const GRADIENT_STEPS: usize = 10;

/// Linear remap of `value` from `[a, b]` onto `[c, d]`
fn remap(value: f32, (a, b): (f32, f32), (c, d): (f32, f32)) -> f32 {
    if b == a {
        return c;
    }
    c + (value - a) / (b - a) * (d - c)
}

/// Shape of the tree for one frame
struct Branching<'a> {
    trunk: f32,
    ratio: f32,
    min_length: f32,
    max_weight: f32,
    angle: f32,
    max_depth: usize,
    palette: Option<&'a Gradient>,
    alpha: f32,
}

impl Branching<'_> {
    fn branch(&self, canvas: &mut Canvas, len: f32, depth: usize) {
        let weight = remap(len, (self.min_length, self.trunk), (1.0, self.max_weight));
        let color = match self.palette {
            Some(gradient) => gradient.sample(depth as f32 / self.max_depth.max(1) as f32),
            None => Color::WHITE.with_alpha(self.alpha),
        };
        canvas.line(Vec2::ZERO, Vec2::new(0.0, -len), Ink::new(color, weight));
        canvas.translate(0.0, -len);

        if len > self.min_length {
            for side in [1.0, -1.0] {
                canvas.push();
                canvas.rotate(self.angle * side);
                self.branch(canvas, len * self.ratio, depth + 1);
                canvas.pop();
            }
        }
    }
}

/// Number of halvings before a branch drops under `min_length`
fn depth_of(trunk: f32, ratio: f32, min_length: f32) -> usize {
    if ratio <= 0.0 || ratio >= 1.0 {
        return 0;
    }
    let mut len = trunk;
    let mut depth = 0;
    while len > min_length {
        depth += 1;
        len *= ratio;
    }
    depth
}

#[derive(Default)]
pub struct LuminTree {
    max_depth: usize,
}

impl Sketch for LuminTree {
    fn schema(&self) -> &'static ConfigSchema {
        &SCHEMA
    }

    fn palette(&self) -> PaletteResolver {
        PaletteResolver::new(&BASE).with_steps(GRADIENT_STEPS)
    }

    fn backdrop(&self, _params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
        Backdrop::Clear(Color::BLACK)
    }

    fn randomize_policy(&self) -> RandomizePolicy {
        RandomizePolicy::InPlace(&["sway_speed"])
    }

    fn setup(&mut self, stage: &mut Stage<'_>) {
        let c = stage.config;
        self.max_depth = depth_of(
            c.get("trunk_length"),
            c.get("branch_ratio"),
            c.get("min_branch_length"),
        );
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let sway = (frame.frame_count as f32 * p.get("sway_speed")).sin();
        let tree = Branching {
            trunk: p.get("trunk_length"),
            ratio: p.get("branch_ratio"),
            min_length: p.get("min_branch_length"),
            max_weight: p.get("stroke_weight") * 3.0,
            angle: remap(
                sway,
                (-1.0, 1.0),
                (p.get("max_angle"), p.get("min_angle")),
            ),
            max_depth: self.max_depth,
            palette: frame.palette,
            alpha: p.get("alpha"),
        };
        if tree.max_depth == 0 {
            return;
        }

        let size = frame.size();
        frame.canvas.translate(size / 2.0, size);
        tree.branch(frame.canvas, tree.trunk, 0);
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas, frame: u64) {
    c.clear(BLACK);
    c.translate(c.size() / 2.0, c.size());
    let angle = map((frame as f32 * 0.01).sin(), -1.0, 1.0, PI / 2.0, PI / 16.0);
    branch(c, 100.0, angle);
}

fn branch(c: &mut Canvas, len: f32, angle: f32) {
    c.line(Vec2::ZERO, vec2(0.0, -len), white(255.0));
    c.translate(0.0, -len);
    if len > 4.0 {
        for side in [1.0, -1.0] {
            c.push();
            c.rotate(angle * side);
            branch(c, len * 0.67, angle);
            c.pop();
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
    fn test_depth_follows_branch_ratio() {
        assert_eq!(depth_of(85.0, 0.67, 4.0), 8);
        assert_eq!(depth_of(3.0, 0.67, 4.0), 0);
        assert_eq!(depth_of(85.0, 1.5, 4.0), 0);
    }

    #[test]
    fn test_draws_full_tree_each_frame() {
        let mut sketch = LuminTree::default();
        let canvas = run_frames(&mut sketch, 200, 2, true);
        assert_eq!(sketch.max_depth, 8);
        // 2^(depth + 1) - 1 segments per frame plus one clear
        assert!(canvas.draw_calls() >= 2 * 511);
    }

    #[test]
    fn test_structure_is_fixed() {
        let mut rng = rand::rng();
        let config = SCHEMA.generate_random(&mut rng);
        assert_eq!(config.get("trunk_length"), 85.0);
        assert_eq!(config.get("branch_ratio"), 0.67);
        assert!((0.008..=0.013).contains(&config.get("sway_speed")));
    }
}
