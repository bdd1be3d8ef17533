//! Re-encoding of processed images.
//!
//! Crops and rotations are written back as baseline JPEG; the quality used
//! for each comes from [`crate::config::CropConfig`].

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError};
