//! Crop session binding for web hosts.
//!
//! The host forwards pointer/touch events as drag and pinch calls and reads
//! back the live pan and scale to position the image under the crop box.
//! Every method returning `bool` reports whether the event was handled
//! (`false` means it was ignored in the current gesture state).

use framez_core::config::CropConfig;
use framez_core::geometry::{CropRequest, NaturalSize, PanOffset};
use framez_core::gesture::{DragPhase, GestureEvent, GestureOutcome, GestureTracker, PinchPhase};
use framez_core::session::CropSession;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsCropSession {
    session: CropSession,
    gestures: GestureTracker,
    zoom_in_step: f64,
    zoom_out_step: f64,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Open a session on a `natural_width` x `natural_height` image with
    /// crop aspect `aspect` (width / height).
    ///
    /// `config` is an optional plain object with any `CropConfig` fields
    /// (`available_width`, `max_zoom`, ...); `undefined` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        natural_width: u32,
        natural_height: u32,
        aspect: f64,
        config: JsValue,
    ) -> Result<JsCropSession, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?
        };
        Self::open(NaturalSize::new(natural_width, natural_height), aspect, &config)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn drag_begin(&mut self) -> bool {
        self.handle(GestureEvent::Drag(DragPhase::Begin))
    }

    /// `dx`/`dy` are totals since `drag_begin`.
    pub fn drag_move(&mut self, dx: f64, dy: f64) -> bool {
        self.handle(GestureEvent::Drag(DragPhase::Move { dx, dy }))
    }

    pub fn drag_release(&mut self, dx: f64, dy: f64) -> bool {
        self.handle(GestureEvent::Drag(DragPhase::Release { dx, dy }))
    }

    pub fn drag_cancel(&mut self) -> bool {
        self.handle(GestureEvent::Drag(DragPhase::Cancel))
    }

    pub fn pinch_begin(&mut self) -> bool {
        self.handle(GestureEvent::Pinch(PinchPhase::Begin))
    }

    /// `scale` is relative to the finger distance at `pinch_begin`.
    pub fn pinch_update(&mut self, scale: f64) -> bool {
        self.handle(GestureEvent::Pinch(PinchPhase::Update { scale }))
    }

    pub fn pinch_end(&mut self, scale: f64) -> bool {
        self.handle(GestureEvent::Pinch(PinchPhase::End { scale }))
    }

    pub fn pinch_cancel(&mut self) -> bool {
        self.handle(GestureEvent::Pinch(PinchPhase::Cancel))
    }

    /// One zoom-in step; returns the committed zoom. No-op mid-gesture.
    pub fn zoom_in(&mut self) -> f64 {
        self.step_zoom(self.zoom_in_step)
    }

    /// One zoom-out step; returns the committed zoom. No-op mid-gesture.
    pub fn zoom_out(&mut self) -> f64 {
        self.step_zoom(self.zoom_out_step)
    }

    #[wasm_bindgen(getter)]
    pub fn crop_width(&self) -> f64 {
        self.session.crop_box().width
    }

    #[wasm_bindgen(getter)]
    pub fn crop_height(&self) -> f64 {
        self.session.crop_box().height
    }

    /// Displayed image width at the committed zoom.
    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> f64 {
        self.session.display().disp_width
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> f64 {
        self.session.display().disp_height
    }

    /// Horizontal translate to draw, including a drag in progress.
    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.live_pan().x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.live_pan().y
    }

    /// Transient pinch multiplier, 1 outside a pinch.
    #[wasm_bindgen(getter)]
    pub fn live_scale(&self) -> f64 {
        self.gestures.live_scale()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.session.zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn gesture_active(&self) -> bool {
        !self.gestures.is_idle()
    }

    /// `{ originX, originY, width, height }` in natural pixels for the
    /// committed pan and zoom.
    pub fn crop_request(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.request()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCropSession {
    fn open(natural: NaturalSize, aspect: f64, config: &CropConfig) -> Result<Self, String> {
        config.validate().map_err(|e| e.to_string())?;
        if !natural.is_valid() {
            return Err(format!(
                "Image has no pixels ({}x{})",
                natural.width, natural.height
            ));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(format!("Aspect ratio must be positive, got {}", aspect));
        }

        Ok(Self {
            session: CropSession::new(natural, config.crop_box(aspect), config.max_zoom),
            gestures: GestureTracker::new(),
            zoom_in_step: config.zoom_step,
            zoom_out_step: config.zoom_out_step,
        })
    }

    fn handle(&mut self, event: GestureEvent) -> bool {
        self.gestures.handle(&mut self.session, event) != GestureOutcome::Ignored
    }

    fn step_zoom(&mut self, factor: f64) -> f64 {
        if self.gestures.is_idle() {
            self.session.zoom_by(factor)
        } else {
            self.session.zoom()
        }
    }

    fn live_pan(&self) -> PanOffset {
        self.gestures.live_pan(&self.session)
    }

    pub(crate) fn request(&self) -> CropRequest {
        self.session.crop_request()
    }
}


/// Tests for the JsValue surface; run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Deserialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Rect {
        origin_x: u32,
        origin_y: u32,
        width: u32,
        height: u32,
    }

    #[wasm_bindgen_test]
    fn test_default_config() {
        let s = JsCropSession::new(1000, 1000, 1.0, JsValue::UNDEFINED).unwrap();
        assert_eq!(s.crop_width(), 350.0);
    }

    #[wasm_bindgen_test]
    fn test_crop_request_object() {
        let s = JsCropSession::new(1000, 1000, 1.0, JsValue::NULL).unwrap();
        let rect: Rect = serde_wasm_bindgen::from_value(s.crop_request().unwrap()).unwrap();
        assert_eq!((rect.origin_x, rect.origin_y), (0, 0));
        assert_eq!((rect.width, rect.height), (1000, 1000));
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_rejected() {
        let config = serde_wasm_bindgen::to_value(&CropConfig {
            max_zoom: -1.0,
            ..Default::default()
        })
        .unwrap();
        assert!(JsCropSession::new(100, 100, 1.0, config).is_err());
    }
}
