//! Audio playback and frequency analysis.
//!
//! The output stream plays a looping track on the audio thread and copies
//! every sample it emits into a [`SampleTap`]. Analysis runs on the frame
//! loop: the [`AudioController`] pulls the most recent window from the tap,
//! runs the FFT and publishes one [`AudioSnapshot`] per frame.

mod controller;
mod fft;
mod system;
mod track;

pub use controller::{AudioController, AudioFeed};
#[cfg(test)]
pub(crate) use controller::testing;
pub use fft::{hann_window, FftAnalyser, SampleTap, SpectrumSource};
pub use system::{AudioOutput, CpalOutput};
pub use track::AudioTrack;

use crate::params::AnalyserConfig;

/// Normalized band energies for one frame, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioSnapshot {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    /// Mean of the three bands
    pub volume: f32,
}

impl AudioSnapshot {
    pub const SILENT: AudioSnapshot = AudioSnapshot {
        bass: 0.0,
        mid: 0.0,
        treble: 0.0,
        volume: 0.0,
    };

    /// Reduce byte-scaled frequency data to band averages divided by 255
    pub fn from_frequency_data(data: &[u8], config: &AnalyserConfig) -> Self {
        let band = |range: &std::ops::Range<usize>| {
            let end = range.end.min(data.len());
            let start = range.start.min(end);
            let bins = &data[start..end];
            if bins.is_empty() {
                return 0.0;
            }
            let sum: u32 = bins.iter().map(|&b| b as u32).sum();
            (sum as f32 / bins.len() as f32 / 255.0).clamp(0.0, 1.0)
        };

        let bass = band(&config.bass_bins);
        let mid = band(&config.mid_bins);
        let treble = band(&config.treble_bins);
        Self {
            bass,
            mid,
            treble,
            volume: ((bass + mid + treble) / 3.0).clamp(0.0, 1.0),
        }
    }

    pub fn is_silent(&self) -> bool {
        *self == Self::SILENT
    }
}
