//! Collaborator interfaces the crop controller talks to.
//!
//! Both are asynchronous: the host awaits them on its UI executor. A
//! filesystem implementation lives in [`crate::local`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{CropRequest, NaturalSize};

/// Reference to an image: a `file://` URI, a plain path, or a remote URL,
/// depending on the collaborator that resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUri(String);

impl ImageUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Resolves the natural pixel size of an image.
#[allow(async_fn_in_trait)]
pub trait ImageMetadataService {
    /// Fails with [`crate::CropError::ImageLoad`] when the source is
    /// unreachable or unreadable.
    async fn natural_size(&self, uri: &ImageUri) -> Result<NaturalSize>;
}

/// Crops and rotates images, re-encoding the result to a new reference.
#[allow(async_fn_in_trait)]
pub trait ImageProcessingService {
    async fn crop(&self, uri: &ImageUri, rect: CropRequest) -> Result<ImageUri>;

    /// Rotate clockwise by `degrees`.
    async fn rotate(&self, uri: &ImageUri, degrees: i32) -> Result<ImageUri>;
}
