//! Decoded background track.

use std::path::Path;

use crate::error::{GalleryError, Result};

/// Mono PCM track held in memory and played on loop
#[derive(Debug, Clone)]
pub struct AudioTrack {
    samples: Vec<f32>,
    sample_rate_hz: u32,
}

impl AudioTrack {
    /// Decode a WAV file, mixing all channels down to mono
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let reader =
            hound::WavReader::open(path).map_err(|e| GalleryError::asset_load(&display, e))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| GalleryError::asset_load(&display, e))?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| GalleryError::asset_load(&display, e))?
            }
        };

        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
        if samples.is_empty() {
            return Err(GalleryError::asset_load(display, "track contains no samples"));
        }

        Ok(Self {
            samples,
            sample_rate_hz: spec.sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz.max(1) as f32
    }

    /// Sample at a looping position
    pub fn sample_at(&self, position: usize) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples[position % self.samples.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, frames: &[[i16; 2]]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in &frame[..channels as usize] {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_mixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.wav");
        write_wav(&path, 2, &[[16384, 0], [-16384, -16384]]);

        let track = AudioTrack::open(&path).unwrap();
        assert_eq!(track.sample_rate_hz(), 8000);
        assert_eq!(track.samples().len(), 2);
        assert!((track.samples()[0] - 0.25).abs() < 1e-4);
        assert!((track.samples()[1] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_missing_file_is_asset_load_error() {
        let err = AudioTrack::open("/definitely/not/here.wav").unwrap_err();
        assert!(matches!(err, GalleryError::AssetLoad { .. }));
    }

    #[test]
    fn test_sample_at_loops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, &[[8192, 0], [16384, 0], [-8192, 0]]);

        let track = AudioTrack::open(&path).unwrap();
        assert!((track.sample_at(4) - 0.5).abs() < 1e-4);
        assert!((track.duration_secs() - 3.0 / 8000.0).abs() < 1e-6);
    }
}
