//! Error taxonomy for the crop engine.

use thiserror::Error;

/// Errors surfaced by the crop session controller and its collaborators.
///
/// None of these are fatal: the caller can always cancel the session and
/// pick another image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// The natural dimensions of the source image could not be determined.
    #[error("Unable to load image {uri}: {reason}")]
    ImageLoad { uri: String, reason: String },

    /// An operation was called without the session state it needs.
    #[error("Invalid crop session: {0}")]
    InvalidSession(String),

    /// The image processing collaborator failed to crop or rotate.
    #[error("Image processing failed: {0}")]
    Processing(String),
}

impl CropError {
    pub(crate) fn image_load(uri: impl Into<String>, reason: impl ToString) -> Self {
        CropError::ImageLoad {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the session is still open and the action can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CropError::Processing(_))
    }
}

pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropError::image_load("file:///tmp/a.jpg", "not found");
        assert_eq!(
            err.to_string(),
            "Unable to load image file:///tmp/a.jpg: not found"
        );

        let err = CropError::InvalidSession("no open session".into());
        assert_eq!(err.to_string(), "Invalid crop session: no open session");
    }

    #[test]
    fn test_only_processing_is_retryable() {
        assert!(CropError::Processing("timeout".into()).is_retryable());
        assert!(!CropError::InvalidSession("x".into()).is_retryable());
        assert!(!CropError::image_load("a", "b").is_retryable());
    }
}
