//! Drifting nodes joined by links that fade with distance.

use glam::Vec2;

use crate::palette::{Color, Gradient, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema, ParamSpec};
use crate::sketch::{Backdrop, Frame, Sketch, Stage};

static BASE: [Color; 4] = [
    Color::hex(0xA3DC9A),
    Color::hex(0xDEE791),
    Color::hex(0xFFF9BD),
    Color::hex(0xFFD6BA),
];

static SCHEMA: ConfigSchema = ConfigSchema::new(&[
    ParamSpec::int("node_count", 60.0, 99.0),
    ParamSpec::float("node_speed", 0.5, 1.0),
    ParamSpec::float("min_radius", 2.0, 4.0),
    ParamSpec::float("max_radius", 4.0, 7.0),
    ParamSpec::float("connection_distance", 70.0, 110.0),
    ParamSpec::float("fade_speed", 40.0, 60.0),
    ParamSpec::int("node_alpha", 150.0, 249.0),
    ParamSpec::int("line_alpha", 30.0, 79.0),
]);

#[derive(Debug, Clone, Copy)]
struct Node {
    position: Vec2,
    velocity: Vec2,
    diameter: f32,
}

#[derive(Default)]
pub struct NeuralPulseGrid {
    nodes: Vec<Node>,
}

impl Sketch for NeuralPulseGrid {
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
        let config = stage.config;
        let speed = config.get("node_speed");
        let size = stage.size;
        self.nodes = (0..config.count("node_count"))
            .map(|_| Node {
                position: Vec2::new(stage.random(0.0, size), stage.random(0.0, size)),
                velocity: Vec2::new(stage.random(-speed, speed), stage.random(-speed, speed)),
                diameter: stage.random(config.get("min_radius"), config.get("max_radius")),
            })
            .collect();
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let p = frame.params;
        let size = frame.size();
        let reach = p.get("connection_distance");
        let line_alpha = p.get("line_alpha");

        for i in 0..self.nodes.len() {
            let node = &mut self.nodes[i];
            node.position += node.velocity;
            if node.position.x < 0.0 || node.position.x > size {
                node.velocity.x = -node.velocity.x;
            }
            if node.position.y < 0.0 || node.position.y > size {
                node.velocity.y = -node.velocity.y;
            }

            let from = self.nodes[i].position;
            for other in &self.nodes[i + 1..] {
                let d = from.distance(other.position);
                if d < reach {
                    let alpha = line_alpha * (1.0 - d / reach);
                    let ink = frame.ink(from.y / size, alpha, 1.5, 1.0);
                    frame.canvas.line(from, other.position, ink);
                }
            }
        }

        for node in &self.nodes {
            let color = match frame.palette {
                Some(gradient) => gradient.sample(node.position.y / size),
                None => Color::WHITE.with_alpha(p.get("node_alpha")),
            };
            frame.canvas.fill_circle(node.position, node.diameter, color);
        }
    }

    fn source_text(&self) -> &'static str {
        r#"fn draw(c: &mut Canvas) {
    c.fade(50.0);
    for i in 0..nodes.len() {
        nodes[i].step_and_bounce(c.size());
        for j in i + 1..nodes.len() {
            let d = nodes[i].pos.distance(nodes[j].pos);
            if d < 100.0 {
                c.line(nodes[i].pos, nodes[j].pos, white(map(d, 0.0, 100.0, 50.0, 0.0)));
            }
        }
    }
    for n in &nodes {
        c.fill_circle(n.pos, n.r, white(200.0));
    }
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::testing::run_frames;

    #[test]
    fn test_nodes_bounce_back_inside() {
        let mut sketch = NeuralPulseGrid::default();
        run_frames(&mut sketch, 60, 400, false);
        // One step past an edge at most before the velocity flips
        assert!(sketch
            .nodes
            .iter()
            .all(|n| n.position.x > -2.0 && n.position.x < 62.0));
    }
}
