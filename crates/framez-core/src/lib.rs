//! Framez Core - crop, pan and zoom engine for post images
//!
//! This crate turns touch gestures over a fixed crop box into a pixel crop
//! rectangle on the source image, and drives the crop session around it:
//!
//! - [`geometry`]: pure cover-fit, pan/zoom clamping and crop mapping
//! - [`gesture`]: the drag/pinch state machine
//! - [`session`] and [`controller`]: session lifecycle and the working image
//! - [`local`]: a filesystem implementation of the image collaborators
//! - [`post`]: composing and publishing the post that uses the image

pub mod config;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod local;
pub mod post;
pub mod service;
pub mod session;
pub mod transform;

pub use config::{AspectPreset, ConfigError, CropConfig};
pub use controller::{CropController, WorkingImage, ROTATE_STEP_DEGREES};
pub use error::{CropError, Result};
pub use geometry::{
    center_offset, clamp_pan, clamp_zoom, fit_cover, to_crop_request, CropBox, CropRequest,
    DisplayGeometry, NaturalSize, PanOffset, ZoomBounds,
};
pub use gesture::{
    DragPhase, GestureError, GestureEvent, GestureOutcome, GestureState, GestureTracker,
    PinchPhase, TouchPhase, TouchSample,
};
pub use local::{LocalImageStore, ProcessError};
pub use post::{publish, Author, ImageUploader, NewPost, PostDraft, PostError, PostId, PostStore};
pub use service::{ImageMetadataService, ImageProcessingService, ImageUri};
pub use session::CropSession;
