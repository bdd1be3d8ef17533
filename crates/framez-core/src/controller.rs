//! Crop session controller.
//!
//! Owns the working image and at most one live [`CropSession`]. Opening a
//! session resolves the natural size and builds the initial geometry;
//! gestures mutate the session; confirming turns it into a [`CropRequest`]
//! for the image processing collaborator.
//!
//! # Working image
//!
//! The controller tracks two references: `current` (what the post will use)
//! and `original` (the revert baseline). Cropping only replaces `current`;
//! rotating replaces both. Opening a session on an image that is neither
//! starts a new working image from it.
//!
//! # Exclusivity
//!
//! `confirm_session` and `rotate90` borrow the controller mutably for the
//! whole await, so a second processing request cannot start while one is in
//! flight.

use tracing::{debug, info, warn};

use crate::config::{is_valid_aspect, CropConfig};
use crate::error::{CropError, Result};
use crate::geometry::{CropRequest, PanOffset};
use crate::gesture::{GestureEvent, GestureOutcome, GestureTracker};
use crate::service::{ImageMetadataService, ImageProcessingService, ImageUri};
use crate::session::CropSession;

/// Clockwise rotation applied by the rotate button.
pub const ROTATE_STEP_DEGREES: i32 = 90;

/// The image a post will use, plus the baseline "revert" returns to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingImage {
    pub current: ImageUri,
    pub original: ImageUri,
}

impl WorkingImage {
    pub fn new(uri: ImageUri) -> Self {
        Self {
            current: uri.clone(),
            original: uri,
        }
    }
}

#[derive(Debug)]
struct ActiveSession {
    source: ImageUri,
    aspect: f64,
    session: CropSession,
    gestures: GestureTracker,
}

pub struct CropController<M, P> {
    metadata: M,
    processor: P,
    config: CropConfig,
    working: Option<WorkingImage>,
    active: Option<ActiveSession>,
}

impl<M, P> CropController<M, P>
where
    M: ImageMetadataService,
    P: ImageProcessingService,
{
    pub fn new(metadata: M, processor: P, config: CropConfig) -> Self {
        Self {
            metadata,
            processor,
            config,
            working: None,
            active: None,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn working_image(&self) -> Option<&WorkingImage> {
        self.working.as_ref()
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn is_session_open(&self) -> bool {
        self.active.is_some()
    }

    /// Aspect ratio of the open session.
    pub fn session_aspect(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.aspect)
    }

    /// Use a freshly picked image as both the current and the baseline image.
    pub fn select_image(&mut self, uri: ImageUri) {
        self.discard_session("image replaced");
        debug!(%uri, "image selected");
        self.working = Some(WorkingImage::new(uri));
    }

    /// Open a crop session on `uri` at `aspect` (width / height).
    ///
    /// Any open session is discarded first. Fails with
    /// [`CropError::ImageLoad`] if the natural size cannot be resolved.
    pub async fn open_session(&mut self, uri: ImageUri, aspect: f64) -> Result<&CropSession> {
        if !is_valid_aspect(aspect) {
            return Err(CropError::InvalidSession(format!(
                "aspect ratio must be positive, got {aspect}"
            )));
        }
        self.discard_session("new session opened");

        let natural = match self.metadata.natural_size(&uri).await {
            Ok(natural) if natural.is_valid() => natural,
            Ok(natural) => {
                let err = CropError::image_load(
                    uri.as_str(),
                    format!("empty image ({}x{})", natural.width, natural.height),
                );
                warn!(%uri, error = %err, "cannot open crop session");
                return Err(err);
            }
            Err(err) => {
                warn!(%uri, error = %err, "cannot open crop session");
                return Err(err);
            }
        };

        let crop_box = self.config.crop_box(aspect);
        let session = CropSession::new(natural, crop_box, self.config.max_zoom);
        info!(
            %uri,
            natural_width = natural.width,
            natural_height = natural.height,
            crop_width = crop_box.width,
            crop_height = crop_box.height,
            zoom = session.zoom(),
            "crop session opened"
        );

        let keeps_baseline = self
            .working
            .as_ref()
            .is_some_and(|w| w.current == uri || w.original == uri);
        if !keeps_baseline {
            self.working = Some(WorkingImage::new(uri.clone()));
        }
        let active = self.active.insert(ActiveSession {
            source: uri,
            aspect,
            session,
            gestures: GestureTracker::new(),
        });
        Ok(&active.session)
    }

    /// Open a session on the current image at the configured default aspect.
    pub async fn open_default_session(&mut self) -> Result<&CropSession> {
        let uri = self.current_image()?.clone();
        let aspect = self.config.default_aspect;
        self.open_session(uri, aspect).await
    }

    /// Feed one gesture event to the open session.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Result<GestureOutcome> {
        let active = self.active_mut()?;
        Ok(active.gestures.handle(&mut active.session, event))
    }

    /// One zoom-in step; returns the committed zoom.
    pub fn zoom_in(&mut self) -> Result<f64> {
        let step = self.config.zoom_step;
        self.zoom_by(step)
    }

    /// One zoom-out step; returns the committed zoom.
    pub fn zoom_out(&mut self) -> Result<f64> {
        let step = self.config.zoom_out_step;
        self.zoom_by(step)
    }

    fn zoom_by(&mut self, factor: f64) -> Result<f64> {
        let active = self.active_mut()?;
        if !active.gestures.is_idle() {
            debug!("zoom button ignored during a gesture");
            return Ok(active.session.zoom());
        }
        Ok(active.session.zoom_by(factor))
    }

    /// Translate to draw for the open session, including a drag in progress.
    pub fn live_pan(&self) -> Option<PanOffset> {
        self.active
            .as_ref()
            .map(|a| a.gestures.live_pan(&a.session))
    }

    /// Transient pinch multiplier to draw, 1 when no pinch is in progress.
    pub fn live_scale(&self) -> f64 {
        self.active
            .as_ref()
            .map_or(1.0, |a| a.gestures.live_scale())
    }

    /// Crop rectangle the open session would produce right now.
    pub fn pending_request(&self) -> Result<CropRequest> {
        self.active_ref().map(|a| a.session.crop_request())
    }

    /// Discard the open session. The working image is untouched.
    pub fn cancel_session(&mut self) {
        self.discard_session("cancelled");
    }

    /// Crop the session's source and make the result the current image.
    ///
    /// On a processing failure the session stays open and the working image
    /// is unchanged, so the user can retry or cancel.
    pub async fn confirm_session(&mut self) -> Result<ImageUri> {
        let (source, rect) = {
            let active = self.active_ref()?;
            (active.source.clone(), active.session.crop_request())
        };

        let cropped = match self.processor.crop(&source, rect).await {
            Ok(uri) => uri,
            Err(err) => {
                warn!(%source, ?rect, error = %err, "crop failed, session kept open");
                return Err(err);
            }
        };

        info!(%source, result = %cropped, ?rect, "crop applied");
        match self.working.as_mut() {
            Some(working) => working.current = cropped.clone(),
            None => {
                self.working = Some(WorkingImage {
                    current: cropped.clone(),
                    original: source,
                })
            }
        }
        self.active = None;
        Ok(cropped)
    }

    /// Rotate the current image a quarter turn clockwise. The result also
    /// becomes the revert baseline. Failure leaves the working image as it was.
    pub async fn rotate90(&mut self) -> Result<ImageUri> {
        if self.active.is_some() {
            return Err(CropError::InvalidSession(
                "cannot rotate while a crop session is open".into(),
            ));
        }
        let current = self.current_image()?.clone();

        let rotated = match self
            .processor
            .rotate(&current, ROTATE_STEP_DEGREES)
            .await
        {
            Ok(uri) => uri,
            Err(err) => {
                warn!(uri = %current, error = %err, "rotation failed");
                return Err(err);
            }
        };

        info!(source = %current, result = %rotated, "rotation applied");
        self.working = Some(WorkingImage::new(rotated.clone()));
        Ok(rotated)
    }

    /// Point the current image back at the baseline.
    pub fn revert(&mut self) -> Option<&ImageUri> {
        let working = self.working.as_mut()?;
        working.current = working.original.clone();
        Some(&working.current)
    }

    /// Remove the working image and any open session.
    pub fn clear_image(&mut self) {
        self.discard_session("image removed");
        self.working = None;
    }

    fn current_image(&self) -> Result<&ImageUri> {
        self.working
            .as_ref()
            .map(|w| &w.current)
            .ok_or_else(|| CropError::InvalidSession("no working image".into()))
    }

    fn active_ref(&self) -> Result<&ActiveSession> {
        self.active
            .as_ref()
            .ok_or_else(|| CropError::InvalidSession("no open crop session".into()))
    }

    fn active_mut(&mut self) -> Result<&mut ActiveSession> {
        self.active
            .as_mut()
            .ok_or_else(|| CropError::InvalidSession("no open crop session".into()))
    }

    fn discard_session(&mut self, reason: &str) {
        if let Some(active) = self.active.take() {
            debug!(source = %active.source, reason, "crop session discarded");
        }
    }
}
