//! Artwork lifecycle shared by every sketch.
//!
//! A concrete artwork implements [`Sketch`] and only decides three things:
//! its parameter schema, the geometry it draws each frame, and which
//! parameters follow the audio bands. [`ArtworkInstance`] owns everything
//! else: the canvas, the palette cache, callback registration, resizing,
//! randomizing and teardown.
//!
//! Each frame runs the same pipeline:
//! 1. re-resolve the palette if the color mode flipped
//! 2. scale audio-modulated parameters while music plays
//! 3. clear, fade or keep the previous frame
//! 4. draw, advance and prune inside [`Sketch::draw`]

use std::borrow::Cow;
use std::cell::RefCell;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::audio::AudioSnapshot;
use crate::canvas::{Canvas, Ink};
use crate::context::GalleryContext;
use crate::error::{GalleryError, Result};
use crate::noise::NoiseField;
use crate::palette::{Color, Gradient, PaletteCache, PaletteResolver};
use crate::params::{ArtworkConfig, ConfigSchema};
use crate::scheduler::{CallbackHandle, FrameScheduler};

/// Frequency band a parameter can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Bass,
    Mid,
    Treble,
    Volume,
}

impl Band {
    pub fn level(self, snapshot: &AudioSnapshot) -> f32 {
        match self {
            Band::Bass => snapshot.bass,
            Band::Mid => snapshot.mid,
            Band::Treble => snapshot.treble,
            Band::Volume => snapshot.volume,
        }
    }
}

/// `field` is scaled by `1 + band * weight` while audio is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub field: &'static str,
    pub band: Band,
    pub weight: f32,
}

impl Modulation {
    pub const fn new(field: &'static str, band: Band, weight: f32) -> Self {
        Self {
            field,
            band,
            weight,
        }
    }
}

/// Copy of `base` with every modulated field scaled by its band
pub fn modulate(
    base: &ArtworkConfig,
    modulations: &[Modulation],
    snapshot: &AudioSnapshot,
) -> ArtworkConfig {
    let mut params = base.clone();
    for m in modulations {
        let scaled = base.get(m.field) * (1.0 + m.band.level(snapshot) * m.weight);
        params.set(m.field, scaled);
    }
    params
}

/// What happens to the previous frame before drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    /// Paint over everything
    Clear(Color),
    /// Black overlay at this alpha (0-255), leaving trails
    Fade(f32),
    /// Keep the accumulated image; cleared only on palette change or resize
    Persist,
}

/// How `randomize` applies a fresh configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RandomizePolicy {
    /// New random config, then destroy and re-init
    Rebuild,
    /// Redraw only these tunables; canvas and state are kept
    InPlace(&'static [&'static str]),
}

/// Inputs for (re)building size-dependent state
pub struct Stage<'a> {
    /// Canvas edge length in pixels
    pub size: f32,
    pub config: &'a ArtworkConfig,
    pub rng: &'a mut StdRng,
}

impl Stage<'_> {
    pub fn random(&mut self, min: f32, max: f32) -> f32 {
        random_in(self.rng, min, max)
    }
}

/// Everything a sketch sees while drawing one frame
pub struct Frame<'a> {
    pub canvas: &'a mut Canvas,
    /// Config after audio modulation
    pub params: &'a ArtworkConfig,
    /// `None` in monochrome mode
    pub palette: Option<&'a Gradient>,
    pub rng: &'a mut StdRng,
    pub noise: &'a NoiseField,
    /// Frames drawn since init
    pub frame_count: u64,
}

impl Frame<'_> {
    pub fn size(&self) -> f32 {
        self.canvas.size()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size() / 2.0)
    }

    pub fn colored(&self) -> bool {
        self.palette.is_some()
    }

    /// Gradient entry at `t` with `alpha`, or white at `alpha` in monochrome
    pub fn tint(&self, t: f32, alpha: f32) -> Color {
        match self.palette {
            Some(gradient) => gradient.sample(t).with_alpha(alpha),
            None => Color::WHITE.with_alpha(alpha),
        }
    }

    /// Stroke at `t`: palette color with `color_weight`, or white with `mono_weight`
    pub fn ink(&self, t: f32, alpha: f32, color_weight: f32, mono_weight: f32) -> Ink {
        let weight = if self.colored() {
            color_weight
        } else {
            mono_weight
        };
        Ink::new(self.tint(t, alpha), weight)
    }

    /// Opaque palette color at `t`, or white at `mono_alpha` in monochrome
    pub fn stroke(&self, t: f32, mono_alpha: f32, color_weight: f32, mono_weight: f32) -> Ink {
        match self.palette {
            Some(gradient) => Ink::new(gradient.sample(t), color_weight),
            None => Ink::white(mono_alpha, mono_weight),
        }
    }

    pub fn random(&mut self, min: f32, max: f32) -> f32 {
        random_in(self.rng, min, max)
    }
}

fn random_in(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// One artwork's content
pub trait Sketch {
    /// Parameter fields with their default and random ranges
    fn schema(&self) -> &'static ConfigSchema;

    /// Audio-following fields
    fn modulations(&self) -> &'static [Modulation] {
        &[]
    }

    fn palette(&self) -> PaletteResolver;

    fn backdrop(&self, params: &ArtworkConfig, palette: Option<&Gradient>) -> Backdrop;

    fn randomize_policy(&self) -> RandomizePolicy {
        RandomizePolicy::Rebuild
    }

    /// Reset time and collections for a fresh canvas
    fn setup(&mut self, stage: &mut Stage<'_>);

    /// Canvas size changed; rebuild derived state but keep time
    fn resize(&mut self, _stage: &mut Stage<'_>) {}

    /// Draw the current state, then advance time and prune expired entries
    fn draw(&mut self, frame: &mut Frame<'_>);

    /// Illustrative code sample shown in the details view
    fn source_text(&self) -> &'static str;
}

/// Where artworks find their host element's width
pub trait ContainerHost {
    /// Measured width in pixels, `None` if the container is not mounted
    fn container_width(&self, id: &str) -> Option<u32>;
}

/// Environment handed to an artwork at init
#[derive(Clone)]
pub struct Mount {
    pub scheduler: FrameScheduler,
    pub host: Rc<dyn ContainerHost>,
    pub context: Rc<GalleryContext>,
}

struct Inner {
    id: &'static str,
    sketch: Box<dyn Sketch>,
    config: ArtworkConfig,
    palette: PaletteCache,
    canvas: Option<Canvas>,
    rng: StdRng,
    noise: NoiseField,
    frame_count: u64,
    mount: Option<Mount>,
    handles: Vec<CallbackHandle>,
}

impl Inner {
    fn detach(&mut self) {
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
        self.canvas = None;
        self.mount = None;
    }

    fn stage_setup(&mut self, resize: bool) {
        let Some(size) = self.canvas.as_ref().map(Canvas::size) else {
            return;
        };
        let mut stage = Stage {
            size,
            config: &self.config,
            rng: &mut self.rng,
        };
        if resize {
            self.sketch.resize(&mut stage);
        } else {
            self.sketch.setup(&mut stage);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
    }
}

/// Live artwork bound to one container; clones share the same instance
#[derive(Clone)]
pub struct ArtworkInstance {
    inner: Rc<RefCell<Inner>>,
}

impl ArtworkInstance {
    /// Wrap `sketch` with a freshly generated default config
    pub fn new(sketch: Box<dyn Sketch>, id: &'static str) -> Self {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        let config = sketch.schema().generate_default(&mut rng);
        let palette = PaletteCache::new(sketch.palette());
        let noise = NoiseField::from_rng(&mut rng);
        Self {
            inner: Rc::new(RefCell::new(Inner {
                id,
                sketch,
                config,
                palette,
                canvas: None,
                rng,
                noise,
                frame_count: 0,
                mount: None,
                handles: Vec::new(),
            })),
        }
    }

    /// Allocate the canvas at the container's width and start drawing
    pub fn init(&self, mount: &Mount) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.mount.is_some() {
            warn!(artwork = inner.id, "init on an initialized artwork ignored");
            return Ok(());
        }
        let width = mount
            .host
            .container_width(inner.id)
            .ok_or_else(|| GalleryError::ContainerMissing(inner.id.to_string()))?;

        let mut canvas = Canvas::new(width)?;
        canvas.clear(Color::BLACK);
        inner.canvas = Some(canvas);
        inner.palette.invalidate();
        inner.palette.refresh(mount.context.color_mode());
        inner.frame_count = 0;
        inner.noise = NoiseField::from_rng(&mut inner.rng);
        inner.stage_setup(false);

        let id = inner.id;
        let weak = Rc::downgrade(&self.inner);
        let draw = mount.scheduler.request_frames(id, move |_| match Weak::upgrade(&weak) {
            Some(inner) => ArtworkInstance { inner }.guarded(Self::draw_frame),
            None => Ok(()),
        });
        let weak = Rc::downgrade(&self.inner);
        let resize = mount.scheduler.on_resize(id, move || match Weak::upgrade(&weak) {
            Some(inner) => ArtworkInstance { inner }.guarded(Self::handle_resize),
            None => Ok(()),
        });
        inner.handles = vec![draw, resize];
        inner.mount = Some(mount.clone());
        debug!(artwork = id, width, "artwork initialized");
        Ok(())
    }

    /// Run one scheduled step. An error or panic tears the whole instance
    /// down before being handed back to the scheduler.
    fn guarded(&self, step: fn(&Self) -> Result<()>) -> Result<()> {
        match catch_unwind(AssertUnwindSafe(|| step(self))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.disable();
                Err(err)
            }
            Err(payload) => {
                self.disable();
                resume_unwind(payload)
            }
        }
    }

    fn disable(&self) {
        warn!(artwork = self.id(), "artwork disabled after a render failure");
        self.destroy();
    }

    /// One pass of the per-frame pipeline
    pub fn draw_frame(&self) -> Result<()> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let Some(context) = inner.mount.as_ref().map(|m| Rc::clone(&m.context)) else {
            return Ok(());
        };

        let palette_changed = inner.palette.refresh(context.color_mode());

        let modulations = inner.sketch.modulations();
        let params = if !modulations.is_empty() && context.audio_active() {
            Cow::Owned(modulate(
                &inner.config,
                modulations,
                &context.audio_snapshot(),
            ))
        } else {
            Cow::Borrowed(&inner.config)
        };

        let Some(canvas) = inner.canvas.as_mut() else {
            return Ok(());
        };
        canvas.reset_transform();
        match inner.sketch.backdrop(&params, inner.palette.gradient()) {
            Backdrop::Clear(color) => canvas.clear(color),
            Backdrop::Fade(alpha) => canvas.fade(alpha),
            Backdrop::Persist if palette_changed => canvas.clear(Color::BLACK),
            Backdrop::Persist => {}
        }

        let mut frame = Frame {
            canvas,
            params: &params,
            palette: inner.palette.gradient(),
            rng: &mut inner.rng,
            noise: &inner.noise,
            frame_count: inner.frame_count,
        };
        inner.sketch.draw(&mut frame);
        inner.frame_count += 1;
        Ok(())
    }

    /// Re-measure the container; a missing container is ignored
    pub fn handle_resize(&self) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let Some(host) = inner.mount.as_ref().map(|m| Rc::clone(&m.host)) else {
            return Ok(());
        };
        let Some(width) = host.container_width(inner.id) else {
            debug!(artwork = inner.id, "resize without container ignored");
            return Ok(());
        };
        if let Some(canvas) = inner.canvas.as_mut() {
            canvas.resize(width)?;
            canvas.clear(Color::BLACK);
        }
        inner.stage_setup(true);
        Ok(())
    }

    /// Apply a fresh random configuration according to the sketch's policy
    pub fn randomize(&self) -> Result<()> {
        let policy = self.inner.borrow().sketch.randomize_policy();
        match policy {
            RandomizePolicy::InPlace(fields) => {
                let mut guard = self.inner.borrow_mut();
                let inner = &mut *guard;
                let schema = inner.sketch.schema();
                schema.randomize_fields(&mut inner.config, fields, &mut inner.rng)?;
                debug!(artwork = inner.id, ?fields, "artwork tuned in place");
                Ok(())
            }
            RandomizePolicy::Rebuild => {
                let mount = {
                    let mut guard = self.inner.borrow_mut();
                    let inner = &mut *guard;
                    inner.config = inner.sketch.schema().generate_random(&mut inner.rng);
                    debug!(artwork = inner.id, "artwork randomized");
                    inner.mount.clone()
                };
                if let Some(mount) = mount {
                    self.destroy();
                    self.init(&mount)?;
                }
                Ok(())
            }
        }
    }

    /// Detach callbacks and release the canvas; safe to repeat
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.mount.is_some() {
            debug!(artwork = inner.id, "artwork destroyed");
        }
        inner.detach();
    }

    pub fn id(&self) -> &'static str {
        self.inner.borrow().id
    }

    pub fn source_text(&self) -> &'static str {
        self.inner.borrow().sketch.source_text()
    }

    pub fn config(&self) -> ArtworkConfig {
        self.inner.borrow().config.clone()
    }

    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame_count
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().mount.is_some()
    }

    /// Gradient tables built over this instance's life
    pub fn palette_builds(&self) -> usize {
        self.inner.borrow().palette.build_count()
    }

    pub fn has_palette(&self) -> bool {
        self.inner.borrow().palette.gradient().is_some()
    }

    /// Read access to the live canvas, if initialized
    pub fn with_canvas<R>(&self, f: impl FnOnce(&Canvas) -> R) -> Option<R> {
        self.inner.borrow().canvas.as_ref().map(f)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    use crate::params::ParamSpec;

    /// Host double with settable widths
    #[derive(Default)]
    pub struct FakeHost {
        pub widths: RefCell<HashMap<String, u32>>,
    }

    impl FakeHost {
        pub fn with(id: &str, width: u32) -> Rc<Self> {
            let host = Self::default();
            host.widths.borrow_mut().insert(id.to_string(), width);
            Rc::new(host)
        }
    }

    impl ContainerHost for FakeHost {
        fn container_width(&self, id: &str) -> Option<u32> {
            self.widths.borrow().get(id).copied()
        }
    }

    pub static STUB_SCHEMA: ConfigSchema = ConfigSchema::new(&[
        ParamSpec::float("speed", 1.0, 2.0),
        ParamSpec::int("count", 3.0, 9.0).default_value(5.0),
    ]);

    pub static STUB_BASE: [Color; 2] = [Color::hex(0xFF0000), Color::hex(0x0000FF)];

    /// Counts hook calls and records the params it drew with
    #[derive(Default)]
    pub struct Stub {
        pub setups: Rc<Cell<u32>>,
        pub resizes: Rc<Cell<u32>>,
        pub draws: Rc<Cell<u32>>,
        pub last_speed: Rc<Cell<f32>>,
        pub policy: Option<RandomizePolicy>,
        pub modulated: bool,
        /// Panic on every draw
        pub faulty: bool,
    }

    static STUB_MODS: [Modulation; 1] = [Modulation::new("speed", Band::Bass, 2.0)];

    impl Sketch for Stub {
        fn schema(&self) -> &'static ConfigSchema {
            &STUB_SCHEMA
        }

        fn modulations(&self) -> &'static [Modulation] {
            if self.modulated {
                &STUB_MODS[..]
            } else {
                &[]
            }
        }

        fn palette(&self) -> PaletteResolver {
            PaletteResolver::new(&STUB_BASE)
        }

        fn backdrop(&self, _params: &ArtworkConfig, _palette: Option<&Gradient>) -> Backdrop {
            Backdrop::Clear(Color::BLACK)
        }

        fn randomize_policy(&self) -> RandomizePolicy {
            self.policy.unwrap_or(RandomizePolicy::Rebuild)
        }

        fn setup(&mut self, _stage: &mut Stage<'_>) {
            self.setups.set(self.setups.get() + 1);
        }

        fn resize(&mut self, _stage: &mut Stage<'_>) {
            self.resizes.set(self.resizes.get() + 1);
        }

        fn draw(&mut self, frame: &mut Frame<'_>) {
            if self.faulty {
                panic!("sketch fault");
            }
            self.draws.set(self.draws.get() + 1);
            self.last_speed.set(frame.params.get("speed"));
            let c = frame.center();
            let ink = frame.ink(0.5, 255.0, 2.0, 1.0);
            frame.canvas.line(c - 5.0, c + 5.0, ink);
        }

        fn source_text(&self) -> &'static str {
            "stub();"
        }
    }

    pub fn mount_for(host: Rc<FakeHost>, color: bool) -> (Mount, FrameScheduler) {
        let scheduler = FrameScheduler::new();
        let mount = Mount {
            scheduler: scheduler.clone(),
            host,
            context: Rc::new(GalleryContext::new(color)),
        };
        (mount, scheduler)
    }
}
