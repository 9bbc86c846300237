//! Card grid geometry, scrolling and mounted containers.
//!
//! Cards flow left to right in `columns` columns. Each card is a title strip,
//! a square canvas container and a button strip. Card rectangles are kept in
//! document space; everything public returns screen space (scroll applied).

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::params::GalleryConfig;
use crate::sketch::ContainerHost;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.bottom()
    }

    /// Grow by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Overlapping area with `other`
    pub fn overlap(&self, other: &Bounds) -> f32 {
        let w = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        w.max(0.0) * h.max(0.0)
    }
}

/// Scrollable grid of artwork cards
pub struct GridLayout {
    config: GalleryConfig,
    ids: Vec<&'static str>,
    mounted: RefCell<HashSet<&'static str>>,
    viewport: Cell<(f32, f32)>,
    scroll: Cell<f32>,
}

impl GridLayout {
    pub fn new(config: GalleryConfig, ids: Vec<&'static str>, viewport: (u32, u32)) -> Self {
        Self {
            config,
            ids,
            mounted: RefCell::new(HashSet::new()),
            viewport: Cell::new((viewport.0 as f32, viewport.1 as f32)),
            scroll: Cell::new(0.0),
        }
    }

    pub fn ids(&self) -> &[&'static str] {
        &self.ids
    }

    /// Create the container for `id`; unknown ids are ignored
    pub fn mount(&self, id: &str) {
        if let Some(id) = self.ids.iter().copied().find(|known| *known == id) {
            self.mounted.borrow_mut().insert(id);
        }
    }

    pub fn unmount(&self, id: &str) {
        self.mounted.borrow_mut().remove(id);
    }

    pub fn unmount_all(&self) {
        self.mounted.borrow_mut().clear();
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.borrow().contains(id)
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.viewport.set((width as f32, height as f32));
        self.scroll.set(self.scroll.get().min(self.max_scroll()));
    }

    /// Screen-space viewport
    pub fn viewport(&self) -> Bounds {
        let (w, h) = self.viewport.get();
        Bounds::new(0.0, 0.0, w, h)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.get()
    }

    /// Scroll by `dy` pixels, clamped to the content
    pub fn scroll_by(&self, dy: f32) {
        let next = (self.scroll.get() + dy).clamp(0.0, self.max_scroll());
        self.scroll.set(next);
    }

    /// Square canvas edge for the current viewport width
    pub fn canvas_edge(&self) -> u32 {
        let (width, _) = self.viewport.get();
        let cols = self.config.columns.max(1) as f32;
        let gap = self.config.gap_px as f32;
        let fit = ((width - gap * (cols + 1.0)) / cols).floor();
        (fit.max(1.0) as u32).min(self.config.canvas_size_px.max(1))
    }

    fn card_height(&self) -> f32 {
        (self.config.header_px + self.canvas_edge() + self.config.footer_px) as f32
    }

    /// Total document height of the grid
    pub fn content_height(&self) -> f32 {
        let cols = self.config.columns.max(1) as usize;
        let rows = self.ids.len().div_ceil(cols) as f32;
        let gap = self.config.gap_px as f32;
        gap + rows * (self.card_height() + gap)
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.get().1).max(0.0)
    }

    fn card_bounds_at(&self, index: usize) -> Bounds {
        let cols = self.config.columns.max(1) as usize;
        let edge = self.canvas_edge() as f32;
        let gap = self.config.gap_px as f32;
        let grid_width = cols as f32 * edge + (cols as f32 + 1.0) * gap;
        let left = ((self.viewport.get().0 - grid_width) / 2.0).max(0.0);

        let (row, col) = (index / cols, index % cols);
        Bounds::new(
            left + gap + col as f32 * (edge + gap),
            gap + row as f32 * (self.card_height() + gap) - self.scroll.get(),
            edge,
            self.card_height(),
        )
    }

    /// Screen-space rectangle of the whole card
    pub fn card_bounds(&self, id: &str) -> Option<Bounds> {
        let index = self.ids.iter().position(|known| *known == id)?;
        Some(self.card_bounds_at(index))
    }

    /// Screen-space rectangle of the canvas container inside the card
    pub fn canvas_bounds(&self, id: &str) -> Option<Bounds> {
        let card = self.card_bounds(id)?;
        let edge = self.canvas_edge() as f32;
        Some(Bounds::new(
            card.x,
            card.y + self.config.header_px as f32,
            edge,
            edge,
        ))
    }

    /// Whether any part of the card lies inside the unextended viewport
    pub fn is_visible(&self, id: &str) -> bool {
        let (_, height) = self.viewport.get();
        self.card_bounds(id)
            .is_some_and(|card| card.top() < height && card.bottom() > 0.0)
    }

    /// Card under a screen-space point
    pub fn card_at(&self, x: f32, y: f32) -> Option<&'static str> {
        (0..self.ids.len())
            .find(|&index| self.card_bounds_at(index).contains(x, y))
            .map(|index| self.ids[index])
    }
}

impl ContainerHost for GridLayout {
    fn container_width(&self, id: &str) -> Option<u32> {
        self.is_mounted(id).then(|| self.canvas_edge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column() -> GalleryConfig {
        GalleryConfig {
            columns: 1,
            canvas_size_px: 100,
            gap_px: 10,
            header_px: 20,
            footer_px: 20,
            ..GalleryConfig::default()
        }
    }

    #[test]
    fn test_cards_stack_in_one_column() {
        let layout = GridLayout::new(single_column(), vec!["a", "b"], (120, 100));
        assert_eq!(layout.canvas_edge(), 100);
        assert_eq!(layout.card_bounds("a"), Some(Bounds::new(10.0, 10.0, 100.0, 140.0)));
        assert_eq!(layout.card_bounds("b").map(|b| b.top()), Some(160.0));
        assert_eq!(layout.canvas_bounds("b").map(|b| b.top()), Some(180.0));
        assert_eq!(layout.content_height(), 310.0);
    }

    #[test]
    fn test_visibility_follows_scroll() {
        let layout = GridLayout::new(single_column(), vec!["a", "b"], (120, 100));
        assert!(layout.is_visible("a"));
        assert!(!layout.is_visible("b"));

        layout.scroll_by(200.0);
        assert_eq!(layout.scroll_offset(), 200.0);
        assert!(!layout.is_visible("a"));
        assert!(layout.is_visible("b"));

        // clamped to the end of the content
        layout.scroll_by(10_000.0);
        assert_eq!(layout.scroll_offset(), 210.0);
        layout.scroll_by(-10_000.0);
        assert_eq!(layout.scroll_offset(), 0.0);
    }

    #[test]
    fn test_container_width_requires_mount() {
        let layout = GridLayout::new(single_column(), vec!["a"], (120, 100));
        assert_eq!(layout.container_width("a"), None);
        layout.mount("a");
        assert_eq!(layout.container_width("a"), Some(100));
        layout.set_viewport(80, 100);
        assert_eq!(layout.container_width("a"), Some(60));
        layout.unmount("a");
        assert_eq!(layout.container_width("a"), None);
    }

    #[test]
    fn test_card_at_hits_cards_only() {
        let layout = GridLayout::new(
            GalleryConfig {
                columns: 2,
                ..single_column()
            },
            vec!["a", "b", "c"],
            (230, 400),
        );
        assert_eq!(layout.card_at(15.0, 15.0), Some("a"));
        assert_eq!(layout.card_at(125.0, 15.0), Some("b"));
        assert_eq!(layout.card_at(15.0, 165.0), Some("c"));
        assert_eq!(layout.card_at(115.0, 15.0), None);
        assert_eq!(layout.card_at(125.0, 165.0), None);
    }
}
