//! Page-wide playback controller and the per-frame band snapshot.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use super::fft::{FftAnalyser, SampleTap, SpectrumSource};
use super::system::{AudioOutput, CpalOutput};
use super::track::AudioTrack;
use super::AudioSnapshot;
use crate::error::Result;
use crate::params::AnalyserConfig;
use crate::scheduler::{CallbackHandle, FrameScheduler};

/// What artworks and the gallery need from the audio side
pub trait AudioFeed {
    fn is_active(&self) -> bool;

    /// Latest band energies; all zero while inactive
    fn snapshot(&self) -> AudioSnapshot;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;
}

/// Owns the output stream and the analyser; publishes one snapshot per frame
pub struct AudioController {
    config: AnalyserConfig,
    output: RefCell<Box<dyn AudioOutput>>,
    spectrum: RefCell<Box<dyn SpectrumSource>>,
    /// Byte spectrum scratch buffer
    frequency_data: RefCell<Vec<u8>>,
    /// Replaced whole each update so readers never see a partial write
    snapshot: Cell<AudioSnapshot>,
    active: Cell<bool>,
    update_loop: RefCell<Option<CallbackHandle>>,
}

impl AudioController {
    /// Decode the track and open the default output device (paused)
    pub fn open(path: impl AsRef<Path>, mut config: AnalyserConfig) -> Result<Rc<Self>> {
        let track = AudioTrack::open(path)?;
        config.sample_rate_hz = track.sample_rate_hz();
        config.validate()?;
        info!(
            duration_secs = track.duration_secs(),
            sample_rate = config.sample_rate_hz,
            bass_hz = config.bin_to_hz(config.bass_bins.end),
            mid_hz = config.bin_to_hz(config.mid_bins.end),
            treble_hz = config.bin_to_hz(config.treble_bins.end),
            "audio track decoded"
        );

        let tap = SampleTap::new(config.fft_size * 4);
        let output = CpalOutput::new(track, &config, tap.clone())?;
        let analyser = FftAnalyser::new(config.clone(), tap);
        Ok(Self::with_parts(config, Box::new(output), Box::new(analyser)))
    }

    /// Assemble a controller from explicit parts
    pub fn with_parts(
        config: AnalyserConfig,
        output: Box<dyn AudioOutput>,
        spectrum: Box<dyn SpectrumSource>,
    ) -> Rc<Self> {
        let bins = config.frequency_bin_count();
        Rc::new(Self {
            config,
            output: RefCell::new(output),
            spectrum: RefCell::new(spectrum),
            frequency_data: RefCell::new(vec![0; bins]),
            snapshot: Cell::new(AudioSnapshot::SILENT),
            active: Cell::new(false),
            update_loop: RefCell::new(None),
        })
    }

    /// Run [`AudioController::update`] on every frame until the controller is dropped
    pub fn start_update_loop(self: &Rc<Self>, scheduler: &FrameScheduler) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = scheduler.request_frames("audio-analysis", move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.update();
            }
            Ok(())
        });
        if let Some(previous) = self.update_loop.replace(Some(handle)) {
            previous.cancel();
        }
    }

    /// Refresh the snapshot from the current spectrum (zeros while inactive)
    pub fn update(&self) {
        if !self.active.get() {
            self.snapshot.set(AudioSnapshot::SILENT);
            return;
        }
        let mut data = self.frequency_data.borrow_mut();
        self.spectrum.borrow_mut().byte_frequency_data(&mut data);
        self.snapshot
            .set(AudioSnapshot::from_frequency_data(&data, &self.config));
    }

    /// Start playback, resuming a suspended output first. No-op while active.
    pub fn play(&self) -> Result<()> {
        if self.active.get() {
            return Ok(());
        }
        let mut output = self.output.borrow_mut();
        if output.is_suspended() {
            output.resume()?;
        }
        output.start()?;
        self.active.set(true);
        info!("music playing");
        Ok(())
    }

    /// Stop playback and zero the snapshot. No-op while inactive.
    pub fn pause(&self) -> Result<()> {
        if !self.active.get() {
            return Ok(());
        }
        self.output.borrow_mut().stop()?;
        self.active.set(false);
        self.snapshot.set(AudioSnapshot::SILENT);
        info!("music paused");
        Ok(())
    }

    /// Flip playback; returns the new active state
    pub fn toggle(&self) -> Result<bool> {
        if self.active.get() {
            self.pause()?;
        } else {
            self.play()?;
        }
        debug!(active = self.active.get(), "music toggled");
        Ok(self.active.get())
    }

    pub fn audio_data(&self) -> AudioSnapshot {
        if self.active.get() {
            self.snapshot.get()
        } else {
            AudioSnapshot::SILENT
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }
}

impl AudioFeed for AudioController {
    fn is_active(&self) -> bool {
        AudioController::is_active(self)
    }

    fn snapshot(&self) -> AudioSnapshot {
        self.audio_data()
    }

    fn play(&self) -> Result<()> {
        AudioController::play(self)
    }

    fn pause(&self) -> Result<()> {
        AudioController::pause(self)
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        if let Some(handle) = self.update_loop.get_mut().take() {
            handle.cancel();
        }
    }
}
