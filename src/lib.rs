//! Fractal Garden library - a gallery of audio-reactive generative artworks

pub mod artworks;
pub mod audio;
pub mod canvas;
pub mod cli;
pub mod context;
pub mod error;
pub mod gallery;
pub mod noise;
pub mod palette;
pub mod params;
pub mod recording;
pub mod scheduler;
pub mod sketch;
pub mod viewer;

pub use error::{GalleryError, Result};
