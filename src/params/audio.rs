//! Audio analysis configuration.

use std::ops::Range;

use crate::error::{GalleryError, Result};

/// Frequency analysis configuration with band-to-bin mappings
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Audio sample rate (Hz), replaced by the decoded track's rate on open
    pub sample_rate_hz: u32,

    /// FFT window size (must be power of 2)
    /// 256 samples = 128 frequency bins
    pub fft_size: usize,

    /// Bass bins (~0-860 Hz at 44.1 kHz)
    pub bass_bins: Range<usize>,

    /// Mid bins (~860-3400 Hz at 44.1 kHz)
    pub mid_bins: Range<usize>,

    /// Treble bins (~3400-6900 Hz at 44.1 kHz)
    pub treble_bins: Range<usize>,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Blend factor with the previous spectrum (0 = none, <1)
    pub smoothing: f32,

    /// Playback gain (0-1)
    pub volume: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 256,
            bass_bins: 0..5,
            mid_bins: 5..20,
            treble_bins: 20..40,
            min_decibels: -100.0,
            max_decibels: -30.0,
            smoothing: 0.8,
            volume: 0.7,
        }
    }
}

impl AnalyserConfig {
    /// Number of usable frequency bins (half the FFT size)
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Lower edge frequency (Hz) of a bin
    pub fn bin_to_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, bands inside the spectrum, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2 {
            return Err(GalleryError::InvalidConfig(format!(
                "FFT size must be a power of 2, got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(GalleryError::InvalidConfig(
                "sample rate must be > 0".to_string(),
            ));
        }
        let bins = self.frequency_bin_count();
        for (name, band) in [
            ("bass", &self.bass_bins),
            ("mid", &self.mid_bins),
            ("treble", &self.treble_bins),
        ] {
            if band.is_empty() || band.end > bins {
                return Err(GalleryError::InvalidConfig(format!(
                    "{} bins {:?} must be non-empty and within 0..{}",
                    name, band, bins
                )));
            }
        }
        if self.min_decibels >= self.max_decibels {
            return Err(GalleryError::InvalidConfig(format!(
                "decibel window {}..{} is empty",
                self.min_decibels, self.max_decibels
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(GalleryError::InvalidConfig(format!(
                "smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frequency_bin_count(), 128);
    }

    #[test]
    fn test_bin_to_hz() {
        let config = AnalyserConfig::default();

        // At 44100 Hz sample rate and 256 FFT size:
        // Bin resolution = 44100 / 256 ≈ 172.27 Hz per bin
        assert_eq!(config.bin_to_hz(0), 0.0);
        assert!((config.bin_to_hz(1) - 172.27).abs() < 0.01);
        assert!((config.bin_to_hz(5) - 861.33).abs() < 0.01);
    }

    #[test]
    fn test_band_ranges_are_ordered() {
        let config = AnalyserConfig::default();
        assert_eq!(config.bass_bins.end, config.mid_bins.start);
        assert_eq!(config.mid_bins.end, config.treble_bins.start);
        assert!(config.treble_bins.end <= config.frequency_bin_count());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let config = AnalyserConfig {
            fft_size: 300,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyserConfig {
            fft_size: 32, // 16 bins, treble band no longer fits
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
