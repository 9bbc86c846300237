//! Audio output device management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use super::fft::SampleTap;
use super::track::AudioTrack;
use crate::error::{GalleryError, Result};
use crate::params::AnalyserConfig;

/// Playback sink the controller drives
pub trait AudioOutput {
    /// True until the platform has granted playback (first user gesture)
    fn is_suspended(&self) -> bool;

    /// Leave the suspended state
    fn resume(&mut self) -> Result<()>;

    /// Begin (or continue) emitting the track
    fn start(&mut self) -> Result<()>;

    /// Emit silence; the play position is kept
    fn stop(&mut self) -> Result<()>;

    fn is_playing(&self) -> bool;
}

/// Mono samples handed to the tap per push; the buffer never grows past this
const MONO_BLOCK: usize = 1024;

/// Looping read position over a track, run on the audio thread
struct Playhead {
    track: AudioTrack,
    cursor: f64,
    /// Track samples advanced per output frame
    step: f64,
    volume: f32,
    mono: Vec<f32>,
}

impl Playhead {
    fn new(track: AudioTrack, step: f64, volume: f32) -> Self {
        Self {
            track,
            cursor: 0.0,
            step,
            volume,
            mono: Vec::with_capacity(MONO_BLOCK),
        }
    }

    /// Write the next interleaved frames into `data` and mirror them to `tap`
    fn fill(&mut self, data: &mut [f32], channels: usize, tap: &SampleTap) {
        let len = self.track.samples().len() as f64;
        for frame in data.chunks_mut(channels) {
            let sample = self.track.sample_at(self.cursor as usize) * self.volume;
            self.cursor += self.step;
            if self.cursor >= len {
                self.cursor -= len;
            }
            frame.fill(sample);

            if self.mono.len() == MONO_BLOCK {
                tap.push(&self.mono);
                self.mono.clear();
            }
            self.mono.push(sample);
        }
        tap.push(&self.mono);
        self.mono.clear();
    }
}

/// Looping track played through the default cpal output device
pub struct CpalOutput {
    /// Audio output stream (kept alive)
    stream: cpal::Stream,

    /// Shared with the audio callback; false renders silence
    playing: Arc<AtomicBool>,

    suspended: bool,
}

impl CpalOutput {
    /// Open the default device and build a paused stream for `track`
    pub fn new(track: AudioTrack, config: &AnalyserConfig, tap: SampleTap) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| GalleryError::ResourceUnavailable("no audio output device".into()))?;

        let supported = device
            .default_output_config()
            .map_err(|e| GalleryError::ResourceUnavailable(format!("audio config: {}", e)))?;

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate = supported.sample_rate().0,
            "audio output"
        );

        let stream_config: cpal::StreamConfig = supported.into();
        let channels = stream_config.channels.max(1) as usize;
        // Nearest-sample resampling from the track rate to the device rate
        let step = track.sample_rate_hz() as f64 / stream_config.sample_rate.0.max(1) as f64;
        let volume = config.volume.clamp(0.0, 1.0);

        let playing = Arc::new(AtomicBool::new(false));
        let playing_cb = Arc::clone(&playing);
        let mut playhead = Playhead::new(track, step, volume);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !playing_cb.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    playhead.fill(data, channels, &tap);
                },
                |err| error!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|e| GalleryError::ResourceUnavailable(format!("audio stream: {}", e)))?;

        // Held paused until the first play request
        stream
            .pause()
            .map_err(|e| GalleryError::ResourceUnavailable(format!("audio stream: {}", e)))?;

        Ok(Self {
            stream,
            playing,
            suspended: true,
        })
    }
}

impl AudioOutput for CpalOutput {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| GalleryError::ResourceUnavailable(format!("resume playback: {}", e)))?;
        self.suspended = false;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_track(dir: &std::path::Path) -> AudioTrack {
        let path = dir.join("ramp.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0i16, 8192, 16384, -8192] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        AudioTrack::open(&path).unwrap()
    }

    #[test]
    fn test_playhead_loops_and_feeds_tap() {
        let dir = tempfile::tempdir().unwrap();
        let mut playhead = Playhead::new(ramp_track(dir.path()), 1.0, 0.5);
        let tap = SampleTap::new(16);

        let mut data = [0.0f32; 12];
        playhead.fill(&mut data, 2, &tap);
        // six stereo frames: 0, .25, .5, -.25, then wrap to 0, .25 at half volume
        assert!((data[2] - 0.125).abs() < 1e-4);
        assert_eq!(data[2], data[3]);
        assert!((data[8] - 0.0).abs() < 1e-4);
        assert_eq!(tap.len(), 6);
    }

    #[test]
    fn test_playhead_buffer_never_grows() {
        let dir = tempfile::tempdir().unwrap();
        let mut playhead = Playhead::new(ramp_track(dir.path()), 1.0, 1.0);
        let tap = SampleTap::new(MONO_BLOCK * 4);

        let capacity = playhead.mono.capacity();
        let mut data = vec![0.0f32; MONO_BLOCK * 3 + 7];
        playhead.fill(&mut data, 1, &tap);
        assert_eq!(playhead.mono.capacity(), capacity);
        assert!(playhead.mono.is_empty());
        assert_eq!(tap.len(), MONO_BLOCK * 3 + 7);
    }
}
