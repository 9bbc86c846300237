//! Lazy-load visibility tracking.
//!
//! The first pass reports every card, later passes only cards whose state
//! flipped. A card intersects when at least `threshold` of its area lies in the
//! viewport grown by `margin` pixels on each side.

use std::collections::HashMap;

use super::layout::GridLayout;
use crate::params::GalleryConfig;

/// One visibility change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: &'static str,
    pub is_intersecting: bool,
}

/// Reports cards entering or leaving the extended viewport
#[derive(Debug)]
pub struct VisibilityObserver {
    margin: f32,
    threshold: f32,
    last: HashMap<&'static str, bool>,
    connected: bool,
}

impl VisibilityObserver {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            margin: config.root_margin_px,
            threshold: config.intersection_threshold,
            last: HashMap::new(),
            connected: true,
        }
    }

    /// Fraction of the card inside the margin-extended viewport
    pub fn intersection_ratio(&self, layout: &GridLayout, id: &str) -> f32 {
        let Some(card) = layout.card_bounds(id) else {
            return 0.0;
        };
        let area = card.area();
        if area <= 0.0 {
            return 0.0;
        }
        card.overlap(&layout.viewport().expand(self.margin)) / area
    }

    /// Entries for every card whose state changed since the last pass
    pub fn observe(&mut self, layout: &GridLayout) -> Vec<IntersectionEntry> {
        if !self.connected {
            return Vec::new();
        }
        let mut entries = Vec::new();
        for &id in layout.ids() {
            let is_intersecting = self.intersection_ratio(layout, id) >= self.threshold;
            if self.last.insert(id, is_intersecting) != Some(is_intersecting) {
                entries.push(IntersectionEntry {
                    id,
                    is_intersecting,
                });
            }
        }
        entries
    }

    /// Stop reporting; later passes return nothing
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.last.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &'static str, is_intersecting: bool) -> IntersectionEntry {
        IntersectionEntry {
            id,
            is_intersecting,
        }
    }

    fn layout() -> GridLayout {
        let config = GalleryConfig {
            columns: 1,
            canvas_size_px: 100,
            gap_px: 10,
            header_px: 20,
            footer_px: 20,
            ..GalleryConfig::default()
        };
        GridLayout::new(config, vec!["a", "b", "c"], (120, 100))
    }

    #[test]
    fn test_first_pass_reports_every_card() {
        let layout = layout();
        let mut observer = VisibilityObserver::new(&GalleryConfig::default());
        let entries = observer.observe(&layout);
        assert_eq!(entries, [entry("a", true), entry("b", false), entry("c", false)]);
        assert!(observer.observe(&layout).is_empty());
    }

    #[test]
    fn test_margin_and_threshold() {
        let layout = layout();
        let observer = VisibilityObserver::new(&GalleryConfig::default());
        // card b spans 160..300; the extended viewport ends at 150
        assert_eq!(observer.intersection_ratio(&layout, "b"), 0.0);

        // 10px of 140 inside: below the 0.1 threshold
        layout.scroll_by(20.0);
        let ratio = observer.intersection_ratio(&layout, "b");
        assert!((ratio - 10.0 / 140.0).abs() < 1e-4);

        // 30px of 140 inside
        layout.scroll_by(20.0);
        assert!(observer.intersection_ratio(&layout, "b") >= 0.1);
    }

    #[test]
    fn test_reports_transitions_only() {
        let layout = layout();
        let mut observer = VisibilityObserver::new(&GalleryConfig::default());
        observer.observe(&layout);

        layout.scroll_by(360.0);
        let entries = observer.observe(&layout);
        assert!(entries.contains(&entry("a", false)));
        assert!(entries.contains(&entry("c", true)));
        assert!(!entries.iter().any(|e| e.id == "b"));

        observer.disconnect();
        layout.scroll_by(-360.0);
        assert!(observer.observe(&layout).is_empty());
    }
}
