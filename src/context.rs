//! Gallery-wide state injected into every artwork at mount time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::audio::{AudioFeed, AudioSnapshot};

/// Color-mode flag and the optional audio feed, written only by the gallery
#[derive(Default)]
pub struct GalleryContext {
    color_mode: Cell<bool>,
    audio: RefCell<Option<Rc<dyn AudioFeed>>>,
}

impl GalleryContext {
    pub fn new(color_mode: bool) -> Self {
        Self {
            color_mode: Cell::new(color_mode),
            audio: RefCell::new(None),
        }
    }

    pub fn color_mode(&self) -> bool {
        self.color_mode.get()
    }

    pub fn set_color_mode(&self, enabled: bool) {
        self.color_mode.set(enabled);
    }

    pub fn set_audio(&self, feed: Option<Rc<dyn AudioFeed>>) {
        *self.audio.borrow_mut() = feed;
    }

    pub fn audio(&self) -> Option<Rc<dyn AudioFeed>> {
        self.audio.borrow().clone()
    }

    /// True only with a feed attached and playing
    pub fn audio_active(&self) -> bool {
        self.audio
            .borrow()
            .as_ref()
            .is_some_and(|feed| feed.is_active())
    }

    /// Latest bands, or silence when audio is missing or paused
    pub fn audio_snapshot(&self) -> AudioSnapshot {
        match self.audio.borrow().as_ref() {
            Some(feed) if feed.is_active() => feed.snapshot(),
            _ => AudioSnapshot::SILENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::loud_controller;

    #[test]
    fn test_without_audio_reads_silence() {
        let context = GalleryContext::new(false);
        assert!(!context.audio_active());
        assert!(context.audio_snapshot().is_silent());
    }

    #[test]
    fn test_snapshot_follows_feed_state() {
        let context = GalleryContext::new(true);
        let (controller, _) = loud_controller();
        context.set_audio(Some(controller.clone()));

        controller.play().unwrap();
        controller.update();
        assert!(context.audio_active());
        assert_eq!(context.audio_snapshot().bass, 1.0);

        controller.pause().unwrap();
        assert!(context.audio_snapshot().is_silent());
    }
}
