//! Static artwork registry.

use std::collections::HashSet;
use std::fmt;

use futures::future::LocalBoxFuture;

use crate::error::{GalleryError, Result};
use crate::sketch::Sketch;

/// Pending artwork implementation; dropping it cancels the load
pub type SketchFuture = LocalBoxFuture<'static, Result<Box<dyn Sketch>>>;

/// Produces a fresh load of one artwork
pub type SketchLoader = fn() -> SketchFuture;

/// Immutable registry entry
#[derive(Clone, Copy)]
pub struct ArtworkDescriptor {
    /// Unique, DOM-safe identifier (`[a-z0-9_-]+`)
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub loader: SketchLoader,
}

impl fmt::Debug for ArtworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Ordered, validated list of artworks
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<ArtworkDescriptor>,
}

impl Registry {
    /// Validate ids (unique and DOM-safe) and keep the given order
    pub fn new(descriptors: Vec<ArtworkDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !is_safe_id(descriptor.id) {
                return Err(GalleryError::InvalidRegistry(format!(
                    "id '{}' must match [a-z0-9_-]+",
                    descriptor.id
                )));
            }
            if !seen.insert(descriptor.id) {
                return Err(GalleryError::InvalidRegistry(format!(
                    "duplicate id '{}'",
                    descriptor.id
                )));
            }
        }
        Ok(Self { descriptors })
    }

    pub fn get(&self, id: &str) -> Option<&ArtworkDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn descriptors(&self) -> &[ArtworkDescriptor] {
        &self.descriptors
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn never() -> SketchFuture {
        futures::future::pending().boxed_local()
    }

    fn entry(id: &'static str) -> ArtworkDescriptor {
        ArtworkDescriptor {
            id,
            title: "Title",
            description: "Description",
            loader: never,
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Registry::new(vec![entry("a"), entry("b"), entry("a")]).unwrap_err();
        assert!(matches!(err, GalleryError::InvalidRegistry(_)));
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        for bad in ["", "Has Space", "quote\"", "UPPER"] {
            assert!(Registry::new(vec![entry(bad)]).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_lookup_keeps_order() {
        let registry = Registry::new(vec![entry("first"), entry("second_2")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), ["first", "second_2"]);
        assert_eq!(registry.get("second_2").map(|d| d.id), Some("second_2"));
        assert!(registry.get("third").is_none());
    }
}
