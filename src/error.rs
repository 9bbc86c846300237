//! Error types shared by the gallery, the artworks and the audio pipeline.

use thiserror::Error;

/// Gallery errors
#[derive(Error, Debug)]
pub enum GalleryError {
    /// An artwork module or the audio asset could not be loaded
    #[error("failed to load asset '{path}': {reason}")]
    AssetLoad { path: String, reason: String },

    /// A platform facility (audio device, GPU adapter) is missing
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The host container for an artwork is not mounted
    #[error("container '{0}' is not mounted")]
    ContainerMissing(String),

    /// No artwork registered under this id
    #[error("unknown artwork '{0}'")]
    UnknownArtwork(String),

    /// Operation requires an active artwork
    #[error("artwork '{0}' is not active")]
    NotActive(String),

    /// Parameter set violates its schema
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Registry entries are malformed (duplicate or unsafe ids)
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    /// Canvas allocation or drawing failed
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Presentation (GPU surface, window) failed
    #[error("render error: {0}")]
    Render(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl GalleryError {
    /// Build an [`GalleryError::AssetLoad`] from any displayable cause
    pub fn asset_load(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors that leave the affected unit retryable rather than broken
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AssetLoad { .. } | Self::ContainerMissing(_))
    }
}

/// Result type for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_load_message() {
        let err = GalleryError::asset_load("music/loop.wav", "file not found");
        assert_eq!(
            err.to_string(),
            "failed to load asset 'music/loop.wav': file not found"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_resource_unavailable_is_not_retryable() {
        let err = GalleryError::ResourceUnavailable("no output device".into());
        assert!(!err.is_retryable());
    }
}
