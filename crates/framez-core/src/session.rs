//! The state of one crop interaction.

use serde::Serialize;

use crate::geometry::{
    center_offset, clamp_pan, clamp_zoom, fit_cover, to_crop_request, CropBox, CropRequest,
    DisplayGeometry, NaturalSize, PanOffset, ZoomBounds,
};

/// Natural size, crop box, display geometry, pan and zoom for the lifetime
/// of one crop interaction.
///
/// The committed pan is always clamped against the current display geometry;
/// transient gesture state lives in [`crate::gesture::GestureTracker`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropSession {
    natural: NaturalSize,
    crop_box: CropBox,
    display: DisplayGeometry,
    pan: PanOffset,
    zoom: f64,
    max_zoom: f64,
}

impl CropSession {
    /// Start a session: cover-fit the image, centre it, and take the cover
    /// scale as the initial zoom.
    pub fn new(natural: NaturalSize, crop_box: CropBox, max_zoom: f64) -> Self {
        let display = fit_cover(crop_box, natural);
        let pan = clamp_pan(center_offset(crop_box, display), crop_box, display);
        Self {
            natural,
            crop_box,
            display,
            pan,
            zoom: display.scale,
            max_zoom,
        }
    }

    pub fn natural(&self) -> NaturalSize {
        self.natural
    }

    pub fn crop_box(&self) -> CropBox {
        self.crop_box
    }

    pub fn display(&self) -> DisplayGeometry {
        self.display
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds::new(self.crop_box, self.natural, self.max_zoom)
    }

    /// Commit a pan, clamped so the crop box stays inside the image.
    pub fn commit_pan(&mut self, pan: PanOffset) -> PanOffset {
        self.pan = clamp_pan(pan, self.crop_box, self.display);
        self.pan
    }

    /// Commit a zoom: clamp it, rebuild the display geometry at the new
    /// scale and re-clamp the pan against it. Returns the zoom applied.
    pub fn commit_zoom(&mut self, requested: f64) -> f64 {
        let zoom = clamp_zoom(requested, self.crop_box, self.natural, self.max_zoom);
        self.zoom = zoom;
        self.display = DisplayGeometry::at_scale(self.natural, zoom);
        self.pan = clamp_pan(self.pan, self.crop_box, self.display);
        zoom
    }

    /// Multiply the committed zoom by `factor` and commit the result.
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        self.commit_zoom(self.zoom * factor)
    }

    /// Crop rectangle in natural pixels for the committed pan and zoom.
    pub fn crop_request(&self) -> CropRequest {
        to_crop_request(self.natural, self.crop_box, self.display, self.pan)
    }
}
