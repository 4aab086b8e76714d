use thiserror::Error;

use super::domain::ImageRef;

#[derive(Debug, Error, PartialEq)]
pub enum MediaError {
    #[error("unknown media reference")]
    NotFound,
    #[error("media backend error: {0}")]
    Backend(String),
}

/// External image storage. Records hold opaque `ImageRef` handles; this
/// gateway turns them into URLs and releases them when a listing is removed.
pub trait MediaGateway: Send + Sync {
    fn public_url(&self, image: &ImageRef) -> String;

    /// Release a stored asset. Failures are reported, not fatal; removal of
    /// the owning record never rolls back over an orphaned image.
    fn delete(&self, image: &ImageRef) -> Result<(), MediaError>;
}
