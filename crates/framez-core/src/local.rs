//! Filesystem-backed image services.
//!
//! [`LocalImageStore`] reads images from local paths (plain or `file://`),
//! runs crops and rotations in process and writes each result as a new JPEG
//! under its output directory. Source files are never modified.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CropConfig;
use crate::decode::{decode_image, read_natural_size, DecodeError};
use crate::encode::{encode_jpeg, EncodeError};
use crate::error::{CropError, Result};
use crate::geometry::{CropRequest, NaturalSize};
use crate::service::{ImageMetadataService, ImageProcessingService, ImageUri};
use crate::transform::{crop_pixels, rotate_quarter, QuarterTurn};

const FILE_SCHEME: &str = "file://";

/// Failures inside the local crop and rotate pipeline.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Rotation by {0} degrees is not a quarter turn")]
    UnsupportedRotation(i32),

    #[error("Crop {rect:?} does not fit a {width}x{height} image")]
    CropOutOfBounds {
        rect: CropRequest,
        width: u32,
        height: u32,
    },
}

impl From<ProcessError> for CropError {
    fn from(err: ProcessError) -> Self {
        CropError::Processing(err.to_string())
    }
}

/// Local implementation of both image collaborators.
///
/// Clones share the output counter, so file names stay unique across clones.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    output_dir: PathBuf,
    crop_quality: u8,
    rotate_quality: u8,
    counter: Arc<AtomicU64>,
}

impl LocalImageStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(output_dir, &CropConfig::default())
    }

    /// Store writing to `output_dir` with the JPEG qualities from `config`.
    pub fn from_config(output_dir: impl Into<PathBuf>, config: &CropConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            crop_quality: config.crop_quality,
            rotate_quality: config.rotate_quality,
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Filesystem path behind `uri`.
    pub fn resolve(uri: &ImageUri) -> PathBuf {
        let raw = uri.as_str();
        PathBuf::from(raw.strip_prefix(FILE_SCHEME).unwrap_or(raw))
    }

    fn read(path: &Path) -> std::result::Result<Vec<u8>, ProcessError> {
        std::fs::read(path).map_err(|source| ProcessError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Next unused output path, `<stem>-<tag>-<n>.jpg`.
    fn output_path(&self, source: &Path, tag: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.output_dir.join(format!("{stem}-{tag}-{n}.jpg"))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> std::result::Result<ImageUri, ProcessError> {
        let io_err = |source| ProcessError::Io {
            path: path.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(&self.output_dir).map_err(io_err)?;
        std::fs::write(path, bytes).map_err(io_err)?;
        Ok(ImageUri::new(format!("{FILE_SCHEME}{}", path.display())))
    }

    fn crop_file(&self, uri: &ImageUri, rect: CropRequest) -> std::result::Result<ImageUri, ProcessError> {
        let source = Self::resolve(uri);
        let image = decode_image(&Self::read(&source)?)?;
        if !rect.fits_within(NaturalSize::new(image.width, image.height)) {
            return Err(ProcessError::CropOutOfBounds {
                rect,
                width: image.width,
                height: image.height,
            });
        }

        let cropped = crop_pixels(&image, rect);
        let bytes = encode_jpeg(&cropped, self.crop_quality)?;
        self.write(&self.output_path(&source, "crop"), &bytes)
    }

    fn rotate_file(&self, uri: &ImageUri, degrees: i32) -> std::result::Result<ImageUri, ProcessError> {
        let turn = QuarterTurn::from_degrees(degrees).ok_or(ProcessError::UnsupportedRotation(degrees))?;
        let source = Self::resolve(uri);
        let image = decode_image(&Self::read(&source)?)?;

        let rotated = rotate_quarter(&image, turn);
        let bytes = encode_jpeg(&rotated, self.rotate_quality)?;
        self.write(&self.output_path(&source, "rot"), &bytes)
    }
}

impl ImageMetadataService for LocalImageStore {
    async fn natural_size(&self, uri: &ImageUri) -> Result<NaturalSize> {
        let path = Self::resolve(uri);
        let bytes = std::fs::read(&path).map_err(|e| CropError::image_load(uri.as_str(), e))?;
        let (width, height) =
            read_natural_size(&bytes).map_err(|e| CropError::image_load(uri.as_str(), e))?;
        debug!(%uri, width, height, "natural size resolved");
        Ok(NaturalSize::new(width, height))
    }
}

impl ImageProcessingService for LocalImageStore {
    async fn crop(&self, uri: &ImageUri, rect: CropRequest) -> Result<ImageUri> {
        match self.crop_file(uri, rect) {
            Ok(output) => {
                info!(%uri, %output, ?rect, "image cropped");
                Ok(output)
            }
            Err(err) => {
                warn!(%uri, error = %err, "crop failed");
                Err(err.into())
            }
        }
    }

    async fn rotate(&self, uri: &ImageUri, degrees: i32) -> Result<ImageUri> {
        match self.rotate_file(uri, degrees) {
            Ok(output) => {
                info!(%uri, %output, degrees, "image rotated");
                Ok(output)
            }
            Err(err) => {
                warn!(%uri, error = %err, "rotate failed");
                Err(err.into())
            }
        }
    }
}
