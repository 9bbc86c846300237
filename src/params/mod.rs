//! Parameter definitions with documented units and ranges.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, Hz, milliseconds, etc.)
//! - Documented ranges and meanings
//! - Validation where a bad value would break a divisor or an index

mod audio;
mod gallery;
mod render;
mod schema;

// Re-export all types
pub use audio::AnalyserConfig;
pub use gallery::GalleryConfig;
pub use render::{RecordingConfig, RenderConfig};
pub use schema::{ArtworkConfig, ConfigSchema, ParamKind, ParamSpec};
