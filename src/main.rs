//! Fractal Garden - a scrolling gallery of generative artworks
//!
//! Cards load lazily as they scroll into view; with a track loaded the
//! artworks pulse to its bass, mid and treble bands.

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fractal_garden::artworks;
use fractal_garden::audio::{AudioController, AudioFeed};
use fractal_garden::cli::Args;
use fractal_garden::context::GalleryContext;
use fractal_garden::gallery::Gallery;
use fractal_garden::params::AnalyserConfig;
use fractal_garden::scheduler::FrameScheduler;
use fractal_garden::{recording, viewer, Result};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fractal_garden=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "gallery failed to load");
            ExitCode::FAILURE
        }
    }
}

fn open_audio(args: &Args, scheduler: &FrameScheduler) -> Option<Rc<AudioController>> {
    let path = args.audio.as_ref()?;
    match AudioController::open(path, AnalyserConfig::default()) {
        Ok(controller) => {
            controller.start_update_loop(scheduler);
            info!(track = %path.display(), "audio ready");
            Some(controller)
        }
        Err(err) => {
            warn!(error = %err, "audio init failed, continuing without audio");
            None
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let registry = artworks::builtin_registry()?;
    let scheduler = FrameScheduler::new();
    let context = Rc::new(GalleryContext::new(args.color));
    let mut gallery = Gallery::new(
        registry,
        args.gallery_config(),
        scheduler.clone(),
        context,
        args.viewport(),
    );

    let audio = open_audio(args, &scheduler);
    if let Some(controller) = &audio {
        gallery.attach_audio(Some(Rc::clone(controller) as Rc<dyn AudioFeed>));
        if args.play {
            if let Err(err) = controller.play() {
                warn!(error = %err, "audio playback failed to start");
            }
        }
    }

    match args.recording_config() {
        Some(config) => {
            let written = recording::record(&mut gallery, &config, args.viewport());
            gallery.destroy();
            let written = written?;
            info!(frames = written, dir = %config.frames_dir().display(), "recording complete");
            Ok(())
        }
        None => viewer::run(gallery, audio, args.render_config()),
    }
}
