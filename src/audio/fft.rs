//! FFT spectrum analysis over the samples the output stream has played.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::params::AnalyserConfig;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Ring of the most recent mono samples, written by the audio thread
#[derive(Clone)]
pub struct SampleTap {
    samples: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Append samples, discarding the oldest beyond capacity
    pub fn push(&self, samples: &[f32]) {
        let mut ring = self.samples.lock();
        for &sample in samples {
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(sample);
        }
    }

    /// Copy the newest `out.len()` samples into `out`, zero-padding at the front.
    /// Returns how many real samples were available.
    pub fn latest(&self, out: &mut [f32]) -> usize {
        let ring = self.samples.lock();
        let available = ring.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);
        for (slot, sample) in out[pad..].iter_mut().zip(ring.iter().skip(ring.len() - available)) {
            *slot = *sample;
        }
        available
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can report a byte-scaled magnitude spectrum
pub trait SpectrumSource {
    /// Fill `out` with magnitudes scaled into 0..=255
    fn byte_frequency_data(&mut self, out: &mut [u8]);

    fn frequency_bin_count(&self) -> usize;
}

/// Windowed FFT with temporal smoothing and decibel-to-byte mapping
pub struct FftAnalyser {
    config: AnalyserConfig,
    tap: SampleTap,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    smoothed: Vec<f32>,
}

impl FftAnalyser {
    pub fn new(config: AnalyserConfig, tap: SampleTap) -> Self {
        let size = config.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        let window = (0..size).map(|i| hann_window(i, size)).collect();
        Self {
            smoothed: vec![0.0; config.frequency_bin_count()],
            samples: vec![0.0; size],
            buffer: vec![Complex::new(0.0, 0.0); size],
            window,
            fft,
            tap,
            config,
        }
    }

    /// Recompute the smoothed spectrum from the newest window of samples
    fn analyse(&mut self) {
        self.tap.latest(&mut self.samples);
        for ((slot, sample), w) in self.buffer.iter_mut().zip(&self.samples).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let size = self.config.fft_size as f32;
        let smoothing = self.config.smoothing;
        for (bin, previous) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[bin].norm() / size;
            *previous = smoothing * *previous + (1.0 - smoothing) * magnitude;
        }
    }

    /// Byte value for a linear magnitude under the configured decibel window
    fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let span = self.config.max_decibels - self.config.min_decibels;
        let scaled = 255.0 * (db - self.config.min_decibels) / span;
        scaled.clamp(0.0, 255.0) as u8
    }
}

impl SpectrumSource for FftAnalyser {
    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        for (slot, bin) in out.iter_mut().zip(0..self.smoothed.len()) {
            *slot = self.to_byte(self.smoothed[bin]);
        }
        if out.len() > self.smoothed.len() {
            out[self.smoothed.len()..].fill(0);
        }
    }

    fn frequency_bin_count(&self) -> usize {
        self.config.frequency_bin_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 256;

        // Hann window should be 0 at edges, ~1 at center
        assert!(hann_window(0, size).abs() < 0.01);
        assert!(hann_window(size - 1, size).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_tap_keeps_newest_samples() {
        let tap = SampleTap::new(4);
        tap.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(tap.len(), 4);

        let mut out = [0.0; 3];
        assert_eq!(tap.latest(&mut out), 3);
        assert_eq!(out, [4.0, 5.0, 6.0]);

        let mut wide = [9.0; 6];
        assert_eq!(tap.latest(&mut wide), 4);
        assert_eq!(wide, [0.0, 0.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_silence_maps_to_zero() {
        let config = AnalyserConfig::default();
        let tap = SampleTap::new(config.fft_size);
        tap.push(&vec![0.0; config.fft_size]);
        let mut analyser = FftAnalyser::new(config.clone(), tap);

        let mut out = vec![7u8; config.frequency_bin_count()];
        analyser.byte_frequency_data(&mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bass_tone_lands_in_bass_bins() {
        let config = AnalyserConfig {
            smoothing: 0.0,
            ..Default::default()
        };
        let tap = SampleTap::new(config.fft_size);
        // Centered on bin 2 (~344 Hz at 44.1 kHz / 256)
        let hz = config.bin_to_hz(2);
        let tone: Vec<f32> = (0..config.fft_size)
            .map(|i| (2.0 * PI * hz * i as f32 / config.sample_rate_hz as f32).sin() * 0.8)
            .collect();
        tap.push(&tone);

        let mut analyser = FftAnalyser::new(config.clone(), tap);
        let mut out = vec![0u8; config.frequency_bin_count()];
        analyser.byte_frequency_data(&mut out);

        let peak = out
            .iter()
            .enumerate()
            .max_by_key(|(_, b)| **b)
            .map(|(i, _)| i)
            .unwrap();
        assert!(config.bass_bins.contains(&peak), "peak at bin {}", peak);
        assert!(out[2] > out[60]);
    }

    #[test]
    fn test_smoothing_decays_gradually() {
        let config = AnalyserConfig::default();
        let tap = SampleTap::new(config.fft_size);
        let hz = config.bin_to_hz(10);
        let tone: Vec<f32> = (0..config.fft_size)
            .map(|i| (2.0 * PI * hz * i as f32 / config.sample_rate_hz as f32).sin())
            .collect();
        tap.push(&tone);

        let mut analyser = FftAnalyser::new(config.clone(), tap.clone());
        let mut out = vec![0u8; config.frequency_bin_count()];
        for _ in 0..20 {
            analyser.byte_frequency_data(&mut out);
        }
        let loud = out[10];

        tap.push(&vec![0.0; config.fft_size]);
        analyser.byte_frequency_data(&mut out);
        assert!(out[10] > 0 && out[10] <= loud, "{} vs {}", out[10], loud);
    }
}
