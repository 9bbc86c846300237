//! Gallery layout and orchestration parameters.

use std::time::Duration;

/// Gallery layout and visibility configuration
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Margin added around the viewport for the lazy-load test (pixels)
    pub root_margin_px: f32,

    /// Fraction of a card that must overlap the extended viewport to count as intersecting
    pub intersection_threshold: f32,

    /// How long audio stays paused before a randomize executes
    pub randomize_audio_pause: Duration,

    /// Number of card columns
    pub columns: u32,

    /// Square canvas edge inside each card (pixels)
    pub canvas_size_px: u32,

    /// Space between cards and around the grid (pixels)
    pub gap_px: u32,

    /// Card title strip above the canvas (pixels)
    pub header_px: u32,

    /// Button strip below the canvas (pixels)
    pub footer_px: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 50.0,
            intersection_threshold: 0.1,
            randomize_audio_pause: Duration::from_millis(100),
            columns: 3,
            canvas_size_px: 360,
            gap_px: 24,
            header_px: 32,
            footer_px: 40,
        }
    }
}
