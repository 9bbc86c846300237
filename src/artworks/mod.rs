//! The built-in artworks, in gallery order.

mod abstract_fluid;
mod breathing_mandala;
mod digital_dna_helix;
mod dynamic_vector_flow;
mod falling_star_trails;
mod harmonic_interference;
mod lumintree;
mod magnetic_particles_orbit;
mod morphing_hexagrid;
mod neural_pulse_grid;
mod ocean_currents;
mod particle_warp_field;
mod quantum_mirror;
mod recursive_echoes;
mod shuriken;
mod spiral_nebula;

pub use abstract_fluid::AbstractFluid;
pub use breathing_mandala::BreathingMandala;
pub use digital_dna_helix::DigitalDnaHelix;
pub use dynamic_vector_flow::DynamicVectorFlow;
pub use falling_star_trails::FallingStarTrails;
pub use harmonic_interference::HarmonicInterference;
pub use lumintree::LuminTree;
pub use magnetic_particles_orbit::MagneticParticlesOrbit;
pub use morphing_hexagrid::MorphingHexagrid;
pub use neural_pulse_grid::NeuralPulseGrid;
pub use ocean_currents::OceanCurrents;
pub use particle_warp_field::ParticleWarpField;
pub use quantum_mirror::QuantumMirror;
pub use recursive_echoes::RecursiveEchoes;
pub use shuriken::Shuriken;
pub use spiral_nebula::SpiralNebula;

use futures::FutureExt;

use crate::error::Result;
use crate::gallery::{ArtworkDescriptor, Registry, SketchFuture};
use crate::sketch::Sketch;

/// Loader shared by every built-in: the sketch is compiled in, so it resolves at once
fn load<S: Sketch + Default + 'static>() -> SketchFuture {
    async { Ok(Box::new(S::default()) as Box<dyn Sketch>) }.boxed_local()
}

pub static ARTWORKS: [ArtworkDescriptor; 16] = [
    ArtworkDescriptor {
        id: "falling-star-trails",
        title: "Falling Star Trails",
        description: "Mesmerizing streams of light cascade downward, creating an ethereal meteor shower effect that never ends.",
        loader: load::<FallingStarTrails>,
    },
    ArtworkDescriptor {
        id: "abstract-fluid",
        title: "Abstract Fluid",
        description: "Flow fields guided by Perlin noise create an ever-shifting landscape of organic movement and energy.",
        loader: load::<AbstractFluid>,
    },
    ArtworkDescriptor {
        id: "magnetic-particles-orbit",
        title: "Magnetic Particles Orbit",
        description: "Hundreds of particles dance through a noise field, creating hypnotic patterns reminiscent of cosmic forces.",
        loader: load::<MagneticParticlesOrbit>,
    },
    ArtworkDescriptor {
        id: "digital-dna-helix",
        title: "Digital DNA Helix",
        description: "A wave-driven double helix rotates endlessly, evoking the elegant structure of life itself.",
        loader: load::<DigitalDnaHelix>,
    },
    ArtworkDescriptor {
        id: "particle-warp-field",
        title: "Particle Warp Field",
        description: "Particles accelerate toward a gravitational center, warping space and time in their spiraling trajectories.",
        loader: load::<ParticleWarpField>,
    },
    ArtworkDescriptor {
        id: "neural-pulse-grid",
        title: "Neural Pulse Grid",
        description: "A living network of interconnected nodes pulses with energy, resembling synaptic connections in a digital brain.",
        loader: load::<NeuralPulseGrid>,
    },
    ArtworkDescriptor {
        id: "quantum-mirror",
        title: "Quantum Mirror",
        description: "Particles explode outward in perfect symmetry, creating a kaleidoscopic dance of light and shadow.",
        loader: load::<QuantumMirror>,
    },
    ArtworkDescriptor {
        id: "ocean-currents",
        title: "Ocean Currents",
        description: "Flowing wave patterns ebb and surge across the canvas, capturing the eternal rhythm of the sea.",
        loader: load::<OceanCurrents>,
    },
    ArtworkDescriptor {
        id: "spiral-nebula",
        title: "Spiral Nebula",
        description: "Countless particles spiral outward in graceful arms, mimicking the birth of stars in distant galaxies.",
        loader: load::<SpiralNebula>,
    },
    ArtworkDescriptor {
        id: "breathing-mandala",
        title: "Breathing Mandala",
        description: "Geometric forms pulse and rotate in harmonious synchronicity, creating a meditative living pattern.",
        loader: load::<BreathingMandala>,
    },
    ArtworkDescriptor {
        id: "recursive-echoes",
        title: "Recursive Echoes",
        description: "Concentric waves ripple outward from an invisible source, each echo fading into the void like memories.",
        loader: load::<RecursiveEchoes>,
    },
    ArtworkDescriptor {
        id: "dynamic-vector-flow",
        title: "Dynamic Vector Flow",
        description: "Countless threads of light weave through noise-driven pathways, creating a tapestry of perpetual motion.",
        loader: load::<DynamicVectorFlow>,
    },
    ArtworkDescriptor {
        id: "shuriken",
        title: "Shuriken",
        description: "Particles trace parametric paths in spinning formations, drawing ancient symbols of balance and energy.",
        loader: load::<Shuriken>,
    },
    ArtworkDescriptor {
        id: "lumintree",
        title: "LuminTree",
        description: "A luminous fractal tree sways with the breath of invisible wind, its branches reaching toward infinite recursion.",
        loader: load::<LuminTree>,
    },
    ArtworkDescriptor {
        id: "harmonic-interference",
        title: "Harmonic Interference",
        description: "Waves collide and merge, generating intricate moiré patterns that shimmer like ripples on a cosmic pond.",
        loader: load::<HarmonicInterference>,
    },
    ArtworkDescriptor {
        id: "morphing-hexagrid",
        title: "Morphing Hexagrid",
        description: "A crystalline lattice breathes and rotates, each hexagonal cell pulsing with synchronized mathematical life.",
        loader: load::<MorphingHexagrid>,
    },
];

/// Validated registry of every built-in artwork
pub fn builtin_registry() -> Result<Registry> {
    Registry::new(ARTWORKS.to_vec())
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::canvas::Canvas;
    use crate::noise::NoiseField;
    use crate::sketch::{Backdrop, Frame, Sketch, Stage};

    /// Drive `sketch` for `frames` frames on a fresh canvas with a random config
    pub fn run_frames(sketch: &mut dyn Sketch, size: u32, frames: u64, color: bool) -> Canvas {
        let mut rng = StdRng::seed_from_u64(7);
        let config = sketch.schema().generate_random(&mut rng);
        let palette = sketch.palette().resolve(color);
        let noise = NoiseField::new(1);
        let mut canvas = Canvas::new(size).unwrap();
        sketch.setup(&mut Stage {
            size: size as f32,
            config: &config,
            rng: &mut rng,
        });

        for frame_count in 0..frames {
            canvas.reset_transform();
            match sketch.backdrop(&config, palette.as_ref()) {
                Backdrop::Clear(color) => canvas.clear(color),
                Backdrop::Fade(alpha) => canvas.fade(alpha),
                Backdrop::Persist => {}
            }
            let mut frame = Frame {
                canvas: &mut canvas,
                params: &config,
                palette: palette.as_ref(),
                rng: &mut rng,
                noise: &noise,
                frame_count,
            };
            sketch.draw(&mut frame);
        }
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::testing::run_frames;
    use super::*;

    fn load_all() -> Vec<(&'static str, Box<dyn Sketch>)> {
        ARTWORKS
            .iter()
            .map(|d| (d.id, futures::executor::block_on((d.loader)()).unwrap()))
            .collect()
    }

    #[test]
    fn test_registry_is_valid_and_ordered() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), 16);
        assert_eq!(registry.descriptors()[0].id, "falling-star-trails");
        assert_eq!(registry.descriptors()[15].id, "morphing-hexagrid");
    }

    #[test]
    fn test_random_configs_stay_in_documented_ranges() {
        let mut rng = rand::rng();
        for (id, sketch) in load_all() {
            for _ in 0..200 {
                let config = sketch.schema().generate_random(&mut rng);
                if let Err(err) = sketch.schema().validate(&config) {
                    panic!("{}: {}", id, err);
                }
            }
            let config = sketch.schema().generate_default(&mut rng);
            assert!(sketch.schema().validate(&config).is_ok(), "{} default", id);
        }
    }

    #[test]
    fn test_every_artwork_draws_in_both_modes() {
        for (id, mut sketch) in load_all() {
            for color in [false, true] {
                let canvas = run_frames(sketch.as_mut(), 64, 30, color);
                assert!(canvas.draw_calls() > 30, "{} drew nothing (color {})", id, color);
            }
        }
    }

    #[test]
    fn test_modulated_fields_exist_in_schema() {
        for (id, sketch) in load_all() {
            for m in sketch.modulations() {
                assert!(sketch.schema().field(m.field).is_some(), "{}: {}", id, m.field);
            }
            assert!(!sketch.source_text().is_empty(), "{} has no source", id);
        }
    }
}
