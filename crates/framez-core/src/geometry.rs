//! Crop geometry: cover fit, pan and zoom clamping, and the inverse mapping
//! from the on-screen crop box back to source image pixels.
//!
//! Every function here is pure and stateless so it can be exercised directly
//! from tests and from the WASM bindings.
//!
//! # Coordinate System
//!
//! - Crop box, display size and pan are on-screen pixels (`f64`)
//! - Pan is the top-left corner of the displayed image relative to the
//!   top-left corner of the crop box, so both components are always `<= 0`
//! - Zoom is the absolute scale: displayed pixels per natural pixel
//! - [`CropRequest`] is in natural image pixels, origin top-left
//!
//! # Rounding
//!
//! Offsets and crop rectangles round half up (`-112.5` becomes `-112`), which
//! keeps the centre offset of odd overflows biased toward the origin.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the unmodified source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A natural size is usable only when both axes have at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn as_f64(self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// The fixed on-screen viewport the image is cropped through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Derive a crop box from the available width and a target aspect ratio
    /// (width / height). Both sides are rounded to whole pixels, minimum 1.
    ///
    /// # Example
    ///
    /// ```
    /// use framez_core::geometry::CropBox;
    ///
    /// let cb = CropBox::from_aspect(300.0, 4.0 / 5.0);
    /// assert_eq!(cb, CropBox::new(300.0, 375.0));
    /// ```
    pub fn from_aspect(available_width: f64, aspect: f64) -> Self {
        let width = round_half_up(available_width).max(1.0);
        let height = round_half_up(width / aspect).max(1.0);
        Self { width, height }
    }

    /// Whether both sides are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Rendered size of the image and the scale that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    /// Displayed pixels per natural pixel.
    pub scale: f64,
    pub disp_width: f64,
    pub disp_height: f64,
}

impl DisplayGeometry {
    /// Display geometry of `natural` rendered at `scale`.
    pub fn at_scale(natural: NaturalSize, scale: f64) -> Self {
        let (nw, nh) = natural.as_f64();
        Self {
            scale,
            disp_width: nw * scale,
            disp_height: nh * scale,
        }
    }

    /// Whether the displayed image fully covers `crop_box` on both axes.
    pub fn covers(&self, crop_box: CropBox) -> bool {
        self.disp_width >= crop_box.width && self.disp_height >= crop_box.height
    }
}

/// Translation of the displayed image inside the crop box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This offset translated by a gesture delta.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Crop rectangle in natural image pixels, handed to the image processor.
///
/// Produced by [`to_crop_request`], which guarantees `origin + size` never
/// exceeds the natural size and both sides are at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequest {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRequest {
    /// Whether the rectangle lies entirely inside `natural`.
    pub fn fits_within(&self, natural: NaturalSize) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.origin_x as u64 + self.width as u64 <= natural.width as u64
            && self.origin_y as u64 + self.height as u64 <= natural.height as u64
    }
}

/// Inclusive zoom range for one image inside one crop box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    /// `min` is the exact fit of the whole image inside the crop box; `max`
    /// is the configured ceiling, raised to `min` for images so small that
    /// fitting them already exceeds the ceiling.
    pub fn new(crop_box: CropBox, natural: NaturalSize, max_zoom: f64) -> Self {
        let (nw, nh) = natural.as_f64();
        let min = (crop_box.width / nw).min(crop_box.height / nh);
        Self {
            min,
            max: max_zoom.max(min),
        }
    }
}

/// Round half up, matching the rounding used for on-screen offsets.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Scale the image so it covers the crop box with no gaps.
///
/// `scale = max(box.w / natural.w, box.h / natural.h)`: one axis touches the
/// crop box exactly and the other overflows or matches. The touching axis is
/// snapped to the crop box so floating-point error can never leave a
/// sub-pixel gap.
///
/// # Example
///
/// ```
/// use framez_core::geometry::{fit_cover, CropBox, NaturalSize};
///
/// let disp = fit_cover(CropBox::new(300.0, 375.0), NaturalSize::new(1000, 2000));
/// assert_eq!(disp.disp_height, 600.0);
/// ```
pub fn fit_cover(crop_box: CropBox, natural: NaturalSize) -> DisplayGeometry {
    let (nw, nh) = natural.as_f64();
    let scale = (crop_box.width / nw).max(crop_box.height / nh);
    DisplayGeometry {
        scale,
        disp_width: (nw * scale).max(crop_box.width),
        disp_height: (nh * scale).max(crop_box.height),
    }
}

/// Offset that centres the displayed image on the crop box.
///
/// Both components are `<= 0` whenever `display` covers `crop_box`.
pub fn center_offset(crop_box: CropBox, display: DisplayGeometry) -> PanOffset {
    PanOffset {
        x: round_half_up((crop_box.width - display.disp_width) / 2.0),
        y: round_half_up((crop_box.height - display.disp_height) / 2.0),
    }
}

/// Clamp a pan so the crop box never shows space beyond the image edges.
///
/// Per axis the valid range is `[min(box - disp, 0), 0]`. Already clamped
/// values are a fixed point, and a NaN component collapses to the lower bound.
pub fn clamp_pan(pan: PanOffset, crop_box: CropBox, display: DisplayGeometry) -> PanOffset {
    let min_x = (crop_box.width - display.disp_width).min(0.0);
    let min_y = (crop_box.height - display.disp_height).min(0.0);
    PanOffset {
        x: pan.x.max(min_x).min(0.0),
        y: pan.y.max(min_y).min(0.0),
    }
}

/// Clamp a requested zoom into [`ZoomBounds`]. A request below the minimum
/// returns exactly the minimum; NaN also resolves to the minimum.
pub fn clamp_zoom(requested: f64, crop_box: CropBox, natural: NaturalSize, max_zoom: f64) -> f64 {
    let bounds = ZoomBounds::new(crop_box, natural, max_zoom);
    requested.max(bounds.min).min(bounds.max)
}

/// Map the on-screen crop box back to a rectangle in natural pixels.
///
/// The scale is taken from the displayed width (`disp_width / natural.width`)
/// so both axes use the same factor. The result is then forced inside the
/// image:
///
/// 1. origins are clamped to `>= 0` (and to the last pixel of the axis)
/// 2. a non-positive size falls back to the whole natural axis
/// 3. a size that runs past the far edge is trimmed to `natural - origin`,
///    minimum 1
///
/// # Arguments
///
/// * `natural` - Source image size
/// * `crop_box` - On-screen crop viewport
/// * `display` - Current display geometry of the image
/// * `pan` - Committed pan offset
pub fn to_crop_request(
    natural: NaturalSize,
    crop_box: CropBox,
    display: DisplayGeometry,
    pan: PanOffset,
) -> CropRequest {
    let scale_used = if natural.width > 0 && display.disp_width > 0.0 {
        display.disp_width / natural.width as f64
    } else {
        display.scale
    };

    let origin_x = round_half_up(-pan.x / scale_used);
    let origin_y = round_half_up(-pan.y / scale_used);
    let crop_w = round_half_up(crop_box.width / scale_used);
    let crop_h = round_half_up(crop_box.height / scale_used);

    let (origin_x, width) = fit_axis(origin_x, crop_w, natural.width);
    let (origin_y, height) = fit_axis(origin_y, crop_h, natural.height);

    CropRequest {
        origin_x,
        origin_y,
        width,
        height,
    }
}

/// Apply the boundary policy to one axis. Returns `(origin, extent)`.
fn fit_axis(origin: f64, extent: f64, limit: u32) -> (u32, u32) {
    let limit = limit.max(1);

    // NaN and negative origins land on 0; `as` saturates large values
    let origin = (origin.max(0.0) as u32).min(limit - 1);

    let extent = if extent > 0.0 { extent as u32 } else { 0 };
    let extent = if extent == 0 { limit } else { extent };

    if origin as u64 + extent as u64 > limit as u64 {
        (origin, (limit - origin).max(1))
    } else {
        (origin, extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn portrait_box() -> CropBox {
        CropBox::new(300.0, 375.0)
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-112.5), -112.0);
        assert_eq!(round_half_up(112.5), 113.0);
        assert_eq!(round_half_up(-0.4), 0.0);
        assert_eq!(round_half_up(373.33), 373.0);
    }

    #[test]
    fn test_crop_box_from_aspect() {
        assert_eq!(CropBox::from_aspect(350.0, 1.0), CropBox::new(350.0, 350.0));
        assert_eq!(CropBox::from_aspect(300.0, 0.8), CropBox::new(300.0, 375.0));
        assert_eq!(CropBox::from_aspect(349.6, 0.8), CropBox::new(350.0, 438.0));
    }

    #[test]
    fn test_fit_cover_tall_image() {
        let disp = fit_cover(portrait_box(), NaturalSize::new(1000, 2000));
        assert_abs_diff_eq!(disp.scale, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(disp.disp_width, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(disp.disp_height, 600.0, epsilon = 1e-9);
        assert!(disp.covers(portrait_box()));
    }

    #[test]
    fn test_fit_cover_wide_image() {
        let disp = fit_cover(portrait_box(), NaturalSize::new(4000, 3000));
        assert_abs_diff_eq!(disp.scale, 0.125, epsilon = 1e-12);
        assert_abs_diff_eq!(disp.disp_width, 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(disp.disp_height, 375.0, epsilon = 1e-9);
    }

    #[test]
    fn test_center_offset_rounds_half_up() {
        let disp = fit_cover(portrait_box(), NaturalSize::new(1000, 2000));
        let pan = center_offset(portrait_box(), disp);
        assert_eq!(pan, PanOffset::new(0.0, -112.0));
    }

    #[test]
    fn test_clamp_pan_limits() {
        let disp = fit_cover(portrait_box(), NaturalSize::new(1000, 2000));

        let pan = clamp_pan(PanOffset::new(50.0, 80.0), portrait_box(), disp);
        assert_eq!(pan, PanOffset::new(0.0, 0.0));

        let pan = clamp_pan(PanOffset::new(-50.0, -900.0), portrait_box(), disp);
        assert_abs_diff_eq!(pan.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pan.y, -225.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clamp_pan_nan_collapses_to_lower_bound() {
        let disp = fit_cover(portrait_box(), NaturalSize::new(1000, 2000));
        let pan = clamp_pan(PanOffset::new(f64::NAN, f64::NAN), portrait_box(), disp);
        assert!(pan.x.is_finite());
        assert_abs_diff_eq!(pan.y, -225.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clamp_zoom_below_min_is_exact_min() {
        let natural = NaturalSize::new(1000, 2000);
        let bounds = ZoomBounds::new(portrait_box(), natural, 3.0);
        assert_eq!(bounds.min, 0.1875);
        assert_eq!(clamp_zoom(0.01, portrait_box(), natural, 3.0), bounds.min);
        assert_eq!(clamp_zoom(f64::NAN, portrait_box(), natural, 3.0), bounds.min);
    }

    #[test]
    fn test_clamp_zoom_ceiling() {
        let natural = NaturalSize::new(1000, 2000);
        assert_eq!(clamp_zoom(10.0, portrait_box(), natural, 3.0), 3.0);
        assert_eq!(clamp_zoom(1.5, portrait_box(), natural, 3.0), 1.5);
    }

    #[test]
    fn test_clamp_zoom_tiny_image_raises_ceiling() {
        let natural = NaturalSize::new(10, 10);
        let z = clamp_zoom(1.0, portrait_box(), natural, 3.0);
        assert_eq!(z, 30.0);
    }

    #[test]
    fn test_crop_request_centered_default() {
        let natural = NaturalSize::new(1000, 2000);
        let disp = fit_cover(portrait_box(), natural);
        let pan = center_offset(portrait_box(), disp);

        let req = to_crop_request(natural, portrait_box(), disp, pan);
        assert_eq!(req.origin_x, 0);
        assert!((372..=375).contains(&req.origin_y), "origin_y = {}", req.origin_y);
        assert_eq!(req.width, 1000);
        assert_eq!(req.height, 1250);
        assert!(req.fits_within(natural));
    }

    #[test]
    fn test_crop_request_top_left() {
        let natural = NaturalSize::new(1000, 2000);
        let disp = fit_cover(portrait_box(), natural);
        let pan = clamp_pan(PanOffset::new(400.0, 400.0), portrait_box(), disp);

        let req = to_crop_request(natural, portrait_box(), disp, pan);
        assert_eq!((req.origin_x, req.origin_y), (0, 0));
    }

    #[test]
    fn test_crop_request_bottom_edge_is_trimmed() {
        let natural = NaturalSize::new(1000, 2000);
        let disp = fit_cover(portrait_box(), natural);
        let pan = clamp_pan(PanOffset::new(0.0, -10_000.0), portrait_box(), disp);

        let req = to_crop_request(natural, portrait_box(), disp, pan);
        assert_eq!(req.origin_y + req.height, 2000);
    }

    #[test]
    fn test_crop_request_origin_beyond_image() {
        let natural = NaturalSize::new(100, 100);
        let disp = DisplayGeometry::at_scale(natural, 1.0);
        let req = to_crop_request(
            natural,
            CropBox::new(50.0, 50.0),
            disp,
            PanOffset::new(-500.0, -500.0),
        );
        assert_eq!(req.origin_x, 99);
        assert_eq!(req.width, 1);
        assert!(req.fits_within(natural));
    }

    #[test]
    fn test_crop_request_degenerate_scale_falls_back_to_natural() {
        let natural = NaturalSize::new(640, 480);
        let disp = DisplayGeometry {
            scale: f64::NAN,
            disp_width: 0.0,
            disp_height: 0.0,
        };
        let req = to_crop_request(natural, CropBox::new(300.0, 300.0), disp, PanOffset::default());
        assert_eq!(
            req,
            CropRequest {
                origin_x: 0,
                origin_y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_crop_request_serializes_camel_case() {
        let req = CropRequest {
            origin_x: 1,
            origin_y: 2,
            width: 3,
            height: 4,
        };
        let text = toml::to_string(&req).unwrap();
        assert!(text.contains("originX = 1"));
        assert!(text.contains("originY = 2"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
