//! Headless recording: a fixed-step clock drives the gallery and every
//! composed frame is written as a PNG.

use std::fs;
use std::time::Duration;

use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::error::{GalleryError, Result};
use crate::gallery::Gallery;
use crate::params::RecordingConfig;

/// Render `config.total_frames()` frames of `gallery` at `viewport` size.
/// Returns the number of frames written.
pub fn record(
    gallery: &mut Gallery,
    config: &RecordingConfig,
    viewport: (u32, u32),
) -> Result<usize> {
    if config.fps == 0 {
        return Err(GalleryError::InvalidConfig(
            "recording fps must be positive".into(),
        ));
    }
    fs::create_dir_all(config.frames_dir())?;

    gallery.resize(viewport.0, viewport.1);
    let mut target = Canvas::with_dimensions(viewport.0, viewport.1)?;
    let step = Duration::from_secs_f64(1.0 / config.fps as f64);
    let total = config.total_frames();
    info!(
        frames = total,
        fps = config.fps,
        dir = %config.frames_dir().display(),
        "recording started"
    );

    for frame in 0..total {
        gallery.scheduler().tick(step * (frame as u32 + 1));
        gallery.observe();
        gallery.compose(&mut target);
        target.to_rgba_image()?.save(config.frame_path(frame))?;

        if (frame + 1) % config.fps as usize == 0 {
            debug!(frame = frame + 1, total, "recording progress");
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::artworks::ARTWORKS;
    use crate::context::GalleryContext;
    use crate::gallery::Registry;
    use crate::params::GalleryConfig;
    use crate::scheduler::FrameScheduler;

    fn small_gallery() -> Gallery {
        let config = GalleryConfig {
            columns: 2,
            canvas_size_px: 48,
            gap_px: 8,
            header_px: 8,
            footer_px: 8,
            ..GalleryConfig::default()
        };
        Gallery::new(
            Registry::new(ARTWORKS[..4].to_vec()).unwrap(),
            config,
            FrameScheduler::new(),
            Rc::new(GalleryContext::new(true)),
            (120, 80),
        )
    }

    #[test]
    fn test_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RecordingConfig::new(0.5);
        config.fps = 6;
        config.output_dir = dir.path().to_path_buf();

        let mut gallery = small_gallery();
        let written = record(&mut gallery, &config, (120, 80)).unwrap();
        assert_eq!(written, 3);
        for frame in 0..3 {
            assert!(config.frame_path(frame).exists());
        }
        assert!(!gallery.active_ids().is_empty());
        assert_eq!(gallery.scheduler().frame(), 3);

        let image = image::open(config.frame_path(2)).unwrap();
        assert_eq!((image.width(), image.height()), (120, 80));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RecordingConfig::new(1.0);
        config.fps = 0;
        config.output_dir = dir.path().to_path_buf();
        let mut gallery = small_gallery();
        assert!(matches!(
            record(&mut gallery, &config, (120, 80)),
            Err(GalleryError::InvalidConfig(_))
        ));
    }
}
