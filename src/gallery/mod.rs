//! Gallery orchestration.
//!
//! Cards move through `Unloaded -> Loading -> Active`, driven by the
//! visibility observer. Loads are futures polled once per frame; a card that
//! scrolls out of range while loading drops its future, which cancels the
//! load. Global toggles (color mode, audio) go through the shared
//! [`GalleryContext`]; a color-mode change also reloads every visible card.

mod layout;
mod observer;
mod registry;

pub use layout::{Bounds, GridLayout};
pub use observer::{IntersectionEntry, VisibilityObserver};
pub use registry::{ArtworkDescriptor, Registry, SketchFuture, SketchLoader};

use std::rc::Rc;
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::audio::AudioFeed;
use crate::canvas::Canvas;
use crate::context::GalleryContext;
use crate::error::{GalleryError, Result};
use crate::palette::Color;
use crate::params::GalleryConfig;
use crate::scheduler::FrameScheduler;
use crate::sketch::{ArtworkInstance, ContainerHost, Mount};

const BACKGROUND: Color = Color::hex(0x0A0A0A);
const CARD: Color = Color::hex(0x161616);
const PLACEHOLDER: Color = Color::hex(0x202020);

/// Lifecycle of one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Unloaded,
    Loading,
    Active,
    Destroyed,
}

/// What the info button shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkDetails {
    pub title: &'static str,
    pub description: &'static str,
    /// Bundled illustrative sample, not the live parameters
    pub source_text: &'static str,
}

struct Card {
    descriptor: ArtworkDescriptor,
    state: CardState,
    pending: Option<SketchFuture>,
    instance: Option<ArtworkInstance>,
}

impl Card {
    /// An active card whose instance tore itself down after a render
    /// failure reads as `Unloaded`
    fn state(&self) -> CardState {
        match (&self.instance, self.state) {
            (Some(instance), CardState::Active) if !instance.is_initialized() => {
                CardState::Unloaded
            }
            (_, state) => state,
        }
    }
}

pub struct Gallery {
    config: GalleryConfig,
    cards: Vec<Card>,
    layout: Rc<GridLayout>,
    observer: VisibilityObserver,
    scheduler: FrameScheduler,
    context: Rc<GalleryContext>,
}

impl Gallery {
    /// Lay out and mount a card container for every registered artwork
    pub fn new(
        registry: Registry,
        config: GalleryConfig,
        scheduler: FrameScheduler,
        context: Rc<GalleryContext>,
        viewport: (u32, u32),
    ) -> Self {
        let layout = Rc::new(GridLayout::new(
            config.clone(),
            registry.ids().collect(),
            viewport,
        ));
        let cards = registry
            .descriptors()
            .iter()
            .map(|descriptor| {
                layout.mount(descriptor.id);
                Card {
                    descriptor: *descriptor,
                    state: CardState::Unloaded,
                    pending: None,
                    instance: None,
                }
            })
            .collect::<Vec<_>>();
        info!(artworks = cards.len(), "gallery ready");

        Self {
            observer: VisibilityObserver::new(&config),
            config,
            cards,
            layout,
            scheduler,
            context,
        }
    }

    fn mount(&self) -> Mount {
        Mount {
            scheduler: self.scheduler.clone(),
            host: Rc::clone(&self.layout) as Rc<dyn ContainerHost>,
            context: Rc::clone(&self.context),
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.descriptor.id == id)
    }

    fn start_load(&mut self, index: usize) {
        let card = &mut self.cards[index];
        debug!(artwork = card.descriptor.id, "loading artwork");
        card.pending = Some((card.descriptor.loader)());
        card.state = CardState::Loading;
    }

    /// Run the visibility observer, react to its entries and pump loads.
    /// Returns how many cards became active.
    pub fn observe(&mut self) -> usize {
        self.release_disabled();
        let entries = self.observer.observe(&self.layout);
        self.handle_intersections(&entries);
        self.pump_loads()
    }

    /// Drop instances that disabled themselves after a render failure
    fn release_disabled(&mut self) {
        for card in &mut self.cards {
            if card.state == CardState::Active && card.state() == CardState::Unloaded {
                card.instance = None;
                card.state = CardState::Unloaded;
                warn!(artwork = card.descriptor.id, "artwork disabled");
            }
        }
    }

    /// Start loads for cards entering range; cancel loads for cards leaving it
    pub fn handle_intersections(&mut self, entries: &[IntersectionEntry]) {
        for entry in entries {
            let Some(index) = self.index_of(entry.id) else {
                continue;
            };
            match (entry.is_intersecting, self.cards[index].state()) {
                (true, CardState::Unloaded) => self.start_load(index),
                (false, CardState::Loading) => {
                    let card = &mut self.cards[index];
                    card.pending = None;
                    card.state = CardState::Unloaded;
                    info!(artwork = entry.id, "artwork load cancelled");
                }
                _ => {}
            }
        }
    }

    /// Poll pending loads once; finished ones are instantiated and initialized.
    /// Retryable failures leave the card `Unloaded`; anything else marks it
    /// `Destroyed` until the next reload.
    pub fn pump_loads(&mut self) -> usize {
        let mount = self.mount();
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut activated = 0;

        for card in &mut self.cards {
            let Some(pending) = card.pending.as_mut() else {
                continue;
            };
            let Poll::Ready(loaded) = pending.poll_unpin(&mut cx) else {
                continue;
            };
            card.pending = None;

            let id = card.descriptor.id;
            let started = loaded.and_then(|sketch| {
                let instance = ArtworkInstance::new(sketch, id);
                instance.init(&mount)?;
                Ok(instance)
            });
            match started {
                Ok(instance) => {
                    card.instance = Some(instance);
                    card.state = CardState::Active;
                    activated += 1;
                    info!(artwork = id, "artwork loaded");
                }
                Err(GalleryError::ContainerMissing(_)) => {
                    debug!(artwork = id, "container gone before init");
                    card.state = CardState::Unloaded;
                }
                Err(err) if err.is_retryable() => {
                    warn!(artwork = id, error = %err, "failed to load artwork, will retry");
                    card.state = CardState::Unloaded;
                }
                Err(err) => {
                    error!(artwork = id, error = %err, "failed to load artwork");
                    card.state = CardState::Destroyed;
                }
            }
        }
        activated
    }

    fn active_instance(&self, id: &str) -> Result<(usize, ArtworkInstance)> {
        let index = self
            .index_of(id)
            .ok_or_else(|| GalleryError::UnknownArtwork(id.to_string()))?;
        let card = &self.cards[index];
        match (&card.instance, card.state()) {
            (Some(instance), CardState::Active) => Ok((index, instance.clone())),
            _ => Err(GalleryError::NotActive(id.to_string())),
        }
    }

    /// Randomize an active card. With music playing, audio is paused first
    /// and the randomize runs after a short delay.
    pub fn randomize(&self, id: &str) -> Result<()> {
        let (_, instance) = self.active_instance(id)?;
        let Some(audio) = self.context.audio().filter(|feed| feed.is_active()) else {
            return instance.randomize();
        };

        if let Err(err) = audio.pause() {
            warn!(error = %err, "could not pause audio before randomize");
        }
        self.scheduler
            .schedule_after(self.config.randomize_audio_pause, move || {
                if let Err(err) = instance.randomize() {
                    warn!(artwork = instance.id(), error = %err, "randomize failed");
                }
            });
        Ok(())
    }

    pub fn show_details(&self, id: &str) -> Result<ArtworkDetails> {
        let (index, instance) = self.active_instance(id)?;
        let descriptor = &self.cards[index].descriptor;
        Ok(ArtworkDetails {
            title: descriptor.title,
            description: descriptor.description,
            source_text: instance.source_text(),
        })
    }

    /// Destroy every active artwork, then reload the cards inside the
    /// unextended viewport. Everything else waits for its next intersection.
    pub fn reload_all(&mut self) -> usize {
        let mut destroyed = 0;
        for card in &mut self.cards {
            if let Some(instance) = card.instance.take() {
                instance.destroy();
                card.state = CardState::Destroyed;
                destroyed += 1;
            }
        }

        for index in 0..self.cards.len() {
            let (id, state) = (self.cards[index].descriptor.id, self.cards[index].state);
            if state == CardState::Loading {
                continue;
            }
            if self.layout.is_visible(id) {
                self.start_load(index);
            } else if state == CardState::Destroyed {
                self.cards[index].state = CardState::Unloaded;
            }
        }

        let activated = self.pump_loads();
        info!(destroyed, activated, "reloaded visible artworks");
        activated
    }

    /// Flip the global color mode; a change reloads the visible artworks
    pub fn set_color_mode(&mut self, enabled: bool) {
        if self.context.color_mode() == enabled {
            return;
        }
        self.context.set_color_mode(enabled);
        info!(enabled, "color mode changed");
        self.reload_all();
    }

    pub fn toggle_color_mode(&mut self) -> bool {
        let enabled = !self.context.color_mode();
        self.set_color_mode(enabled);
        enabled
    }

    /// Install (or remove) the audio feed every artwork reads from
    pub fn attach_audio(&self, feed: Option<Rc<dyn AudioFeed>>) {
        info!(attached = feed.is_some(), "audio feed updated");
        self.context.set_audio(feed);
    }

    /// Window size changed: re-layout and notify every artwork
    pub fn resize(&self, width: u32, height: u32) {
        self.layout.set_viewport(width, height);
        self.scheduler.dispatch_resize();
    }

    pub fn state(&self, id: &str) -> Option<CardState> {
        self.index_of(id).map(|index| self.cards[index].state())
    }

    pub fn active_ids(&self) -> Vec<&'static str> {
        self.cards
            .iter()
            .filter(|card| card.state() == CardState::Active)
            .map(|card| card.descriptor.id)
            .collect()
    }

    pub fn instance(&self, id: &str) -> Option<ArtworkInstance> {
        self.index_of(id)
            .and_then(|index| self.cards[index].instance.clone())
    }

    pub fn card_at(&self, x: f32, y: f32) -> Option<&'static str> {
        self.layout.card_at(x, y)
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn context(&self) -> &Rc<GalleryContext> {
        &self.context
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Paint every card in the viewport onto `target`
    pub fn compose(&self, target: &mut Canvas) {
        target.reset_transform();
        target.clear(BACKGROUND);
        let viewport = self.layout.viewport();

        for card in &self.cards {
            let id = card.descriptor.id;
            let (Some(bounds), Some(inner)) =
                (self.layout.card_bounds(id), self.layout.canvas_bounds(id))
            else {
                continue;
            };
            if bounds.overlap(&viewport) <= 0.0 {
                continue;
            }
            target.fill_rect(bounds.x, bounds.y, bounds.width, bounds.height, CARD);

            let painted = card.instance.as_ref().and_then(|instance| {
                instance.with_canvas(|canvas| {
                    target.blit(canvas, inner.x.round() as i32, inner.y.round() as i32)
                })
            });
            if painted.is_none() {
                target.fill_rect(inner.x, inner.y, inner.width, inner.height, PLACEHOLDER);
            }
        }
    }

    /// Tear down every artwork and stop observing
    pub fn destroy(&mut self) {
        for card in &mut self.cards {
            card.pending = None;
            if let Some(instance) = card.instance.take() {
                instance.destroy();
            }
            card.state = CardState::Destroyed;
        }
        self.observer.disconnect();
        self.layout.unmount_all();
        info!("gallery destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use crate::audio::testing::loud_controller;
    use crate::sketch::testing::Stub;
    use crate::sketch::Sketch;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn stub() -> SketchFuture {
        async { Ok(Box::new(Stub::default()) as Box<dyn Sketch>) }.boxed_local()
    }

    fn never() -> SketchFuture {
        futures::future::pending().boxed_local()
    }

    thread_local! {
        static ATTEMPTS: Cell<u32> = const { Cell::new(0) };
    }

    /// Fails on the first attempt of each test thread
    fn flaky() -> SketchFuture {
        let attempt = ATTEMPTS.with(|a| {
            a.set(a.get() + 1);
            a.get()
        });
        async move {
            if attempt == 1 {
                Err(GalleryError::asset_load("flaky", "network hiccup"))
            } else {
                Ok(Box::new(Stub::default()) as Box<dyn Sketch>)
            }
        }
        .boxed_local()
    }

    thread_local! {
        static FAULTY_RESIZES: Rc<Cell<u32>> = Rc::new(Cell::new(0));
    }

    /// Panics on its first draw
    fn faulty() -> SketchFuture {
        let resizes = FAULTY_RESIZES.with(Rc::clone);
        async move {
            let sketch = Stub {
                faulty: true,
                resizes,
                ..Stub::default()
            };
            Ok(Box::new(sketch) as Box<dyn Sketch>)
        }
        .boxed_local()
    }

    fn broken() -> SketchFuture {
        async { Err(GalleryError::Canvas("zero-sized canvas".into())) }.boxed_local()
    }

    fn entry(id: &'static str, loader: SketchLoader) -> ArtworkDescriptor {
        ArtworkDescriptor {
            id,
            title: "Stub",
            description: "A test artwork",
            loader,
        }
    }

    /// One column of 100px canvases in a 120x100 viewport: only the first
    /// card is on screen
    fn gallery(entries: Vec<ArtworkDescriptor>, color: bool) -> Gallery {
        gallery_with_columns(entries, color, 1)
    }

    fn gallery_with_columns(
        entries: Vec<ArtworkDescriptor>,
        color: bool,
        columns: u32,
    ) -> Gallery {
        let config = GalleryConfig {
            columns,
            canvas_size_px: 100,
            gap_px: 10,
            header_px: 20,
            footer_px: 20,
            ..GalleryConfig::default()
        };
        Gallery::new(
            Registry::new(entries).unwrap(),
            config,
            FrameScheduler::new(),
            Rc::new(GalleryContext::new(color)),
            (10 + columns * 110, 100),
        )
    }

    #[test]
    fn test_only_intersecting_card_activates() {
        let mut g = gallery(vec![entry("a", stub), entry("b", stub)], false);
        assert_eq!(g.state("a"), Some(CardState::Unloaded));
        assert!(g.active_ids().is_empty());

        assert_eq!(g.observe(), 1);
        assert_eq!(g.active_ids(), ["a"]);
        assert_eq!(g.state("b"), Some(CardState::Unloaded));

        g.scheduler().tick(ms(16));
        assert_eq!(g.instance("a").unwrap().frame_count(), 1);
    }

    #[test]
    fn test_color_toggle_reloads_visible_cards() {
        let mut g = gallery(vec![entry("a", stub), entry("b", stub)], false);
        g.observe();
        let before = g.instance("a").unwrap();
        assert!(!before.has_palette());

        assert!(g.toggle_color_mode());
        assert!(!before.is_initialized());
        let after = g.instance("a").unwrap();
        assert!(after.has_palette());
        assert_eq!(g.state("a"), Some(CardState::Active));
        assert_eq!(g.state("b"), Some(CardState::Unloaded));
        assert_eq!(g.scheduler().frame_callback_count(), 1);

        // no change, no reload
        g.set_color_mode(true);
        assert!(g.instance("a").unwrap().has_palette());
        assert_eq!(g.instance("a").unwrap().palette_builds(), 1);
    }

    #[test]
    fn test_reload_skips_cards_only_in_the_margin() {
        let mut g = gallery(vec![entry("a", stub), entry("b", stub)], false);
        // b now overlaps the extended viewport by 30px but is off screen
        g.layout().scroll_by(40.0);
        g.observe();
        assert_eq!(g.active_ids(), ["a", "b"]);
        assert!(!g.layout().is_visible("b"));

        g.toggle_color_mode();
        assert_eq!(g.active_ids(), ["a"]);
        assert_eq!(g.state("b"), Some(CardState::Unloaded));
    }

    #[test]
    fn test_palette_rebuilt_once_after_flag_change() {
        let mut g = gallery(vec![entry("a", stub)], false);
        g.observe();
        let instance = g.instance("a").unwrap();
        g.scheduler().tick(ms(16));
        assert_eq!(instance.palette_builds(), 0);

        g.context().set_color_mode(true);
        for frame in 2..5 {
            g.scheduler().tick(ms(16 * frame));
        }
        assert_eq!(instance.palette_builds(), 1);
        assert!(instance.has_palette());
    }

    #[test]
    fn test_failed_load_stays_retryable() {
        let mut g = gallery(vec![entry("a", flaky)], false);
        assert_eq!(g.observe(), 0);
        assert_eq!(g.state("a"), Some(CardState::Unloaded));

        assert_eq!(g.reload_all(), 1);
        assert_eq!(g.state("a"), Some(CardState::Active));
    }

    #[test]
    fn test_non_retryable_load_failure_is_not_retried() {
        let mut g = gallery(vec![entry("a", broken)], false);
        assert_eq!(g.observe(), 0);
        assert_eq!(g.state("a"), Some(CardState::Destroyed));

        g.observe();
        assert_eq!(g.state("a"), Some(CardState::Destroyed));
        assert!(g.active_ids().is_empty());
    }

    #[test]
    fn test_render_failure_disables_only_that_artwork() {
        let mut g = gallery_with_columns(vec![entry("faulty", faulty), entry("a", stub)], false, 2);
        g.observe();
        assert_eq!(g.active_ids(), ["faulty", "a"]);
        let failing = g.instance("faulty").unwrap();

        g.scheduler().tick(ms(16));
        g.scheduler().tick(ms(32));
        assert!(!failing.is_initialized());
        assert_eq!(g.state("faulty"), Some(CardState::Unloaded));
        assert_eq!(g.active_ids(), ["a"]);
        assert!(matches!(g.randomize("faulty"), Err(GalleryError::NotActive(_))));
        assert!(matches!(g.show_details("faulty"), Err(GalleryError::NotActive(_))));
        assert_eq!(g.instance("a").unwrap().frame_count(), 2);
        assert_eq!(g.scheduler().frame_callback_count(), 1);

        g.resize(230, 100);
        assert_eq!(FAULTY_RESIZES.with(|r| r.get()), 0);

        g.observe();
        assert!(g.instance("faulty").is_none());
        assert_eq!(g.state("faulty"), Some(CardState::Unloaded));
    }

    #[test]
    fn test_scrolling_away_cancels_pending_load() {
        let mut g = gallery(vec![entry("a", never), entry("b", stub)], false);
        g.observe();
        assert_eq!(g.state("a"), Some(CardState::Loading));

        g.layout().scroll_by(210.0);
        g.observe();
        assert_eq!(g.state("a"), Some(CardState::Unloaded));
        assert_eq!(g.state("b"), Some(CardState::Active));
    }

    #[test]
    fn test_operations_require_active_card() {
        let mut g = gallery(vec![entry("a", stub), entry("b", stub)], false);
        g.observe();

        assert!(matches!(g.randomize("b"), Err(GalleryError::NotActive(_))));
        assert!(matches!(g.show_details("b"), Err(GalleryError::NotActive(_))));
        assert!(matches!(
            g.randomize("missing"),
            Err(GalleryError::UnknownArtwork(_))
        ));

        let details = g.show_details("a").unwrap();
        assert_eq!(details.title, "Stub");
        assert_eq!(details.source_text, "stub();");
    }

    #[test]
    fn test_randomize_pauses_audio_first() {
        let mut g = gallery(vec![entry("a", stub)], false);
        g.observe();
        let (controller, _) = loud_controller();
        controller.play().unwrap();
        g.attach_audio(Some(controller.clone()));

        let instance = g.instance("a").unwrap();
        let before = instance.config();
        g.randomize("a").unwrap();
        assert!(!controller.is_active());
        assert_eq!(g.scheduler().pending_timer_count(), 1);

        g.scheduler().tick(ms(50));
        assert_eq!(instance.config(), before);

        g.scheduler().tick(ms(150));
        assert_eq!(g.scheduler().pending_timer_count(), 0);
        assert_ne!(instance.config(), before);
        assert!(instance.is_initialized());
    }

    #[test]
    fn test_randomize_without_audio_is_immediate() {
        let mut g = gallery(vec![entry("a", stub)], false);
        g.observe();
        let instance = g.instance("a").unwrap();
        let before = instance.config();
        g.randomize("a").unwrap();
        assert_eq!(g.scheduler().pending_timer_count(), 0);
        assert_ne!(instance.config(), before);
    }

    #[test]
    fn test_compose_paints_cards_and_placeholders() {
        let mut g = gallery(vec![entry("a", stub)], false);
        let mut target = Canvas::with_dimensions(120, 100).unwrap();

        g.compose(&mut target);
        assert_eq!(target.pixel(5, 5), Some(BACKGROUND));
        assert_eq!(target.pixel(15, 15), Some(CARD));
        assert_eq!(target.pixel(15, 35), Some(PLACEHOLDER));

        g.observe();
        g.scheduler().tick(ms(16));
        g.compose(&mut target);
        assert_eq!(target.pixel(15, 35), Some(Color::BLACK));
    }

    #[test]
    fn test_destroy_detaches_everything() {
        let mut g = gallery(vec![entry("a", stub)], false);
        g.observe();
        g.destroy();
        g.destroy();
        assert_eq!(g.state("a"), Some(CardState::Destroyed));
        assert_eq!(g.scheduler().frame_callback_count(), 0);
        assert_eq!(g.observe(), 0);
        assert!(g.instance("a").is_none());
    }
}
