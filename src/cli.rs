//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{GalleryConfig, RecordingConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "fractal-garden")]
#[command(about = "Gallery of generative, audio-reactive artworks", long_about = None)]
pub struct Args {
    /// Audio track driving the artworks (WAV)
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Start music playback immediately
    #[arg(long)]
    pub play: bool,

    /// Start in color mode
    #[arg(long)]
    pub color: bool,

    /// Record the gallery headlessly (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Recording frame rate
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// Recording output directory
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1200")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "900")]
    pub height: u32,

    /// Gallery columns
    #[arg(long, value_name = "N", default_value = "3")]
    pub columns: u32,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
        }
    }

    pub fn gallery_config(&self) -> GalleryConfig {
        GalleryConfig {
            columns: self.columns.max(1),
            ..GalleryConfig::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| RecordingConfig {
            fps: self.fps,
            output_dir: self.output.clone(),
            ..RecordingConfig::new(duration)
        })
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["fractal-garden"]).unwrap();
        assert!(args.audio.is_none());
        assert!(!args.play && !args.color);
        assert!(args.recording_config().is_none());
        assert_eq!(args.viewport(), (1200, 900));
        assert_eq!(args.gallery_config().columns, 3);
    }

    #[test]
    fn test_recording_flags() {
        let args = Args::try_parse_from([
            "fractal-garden",
            "--record",
            "2",
            "--fps",
            "30",
            "--output",
            "out",
            "--columns",
            "0",
        ])
        .unwrap();
        let config = args.recording_config().unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.total_frames(), 60);
        assert_eq!(config.frames_dir(), PathBuf::from("out").join("frames"));
        assert_eq!(args.gallery_config().columns, 1);
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(Args::try_parse_from(["fractal-garden", "--record", "soon"]).is_err());
    }
}
