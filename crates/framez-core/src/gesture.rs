//! Gesture state machine for the crop surface.
//!
//! A single touch stream is reduced to typed [`GestureEvent`]s: one contact
//! drives a drag (pan), two contacts drive a pinch (zoom). The tracker applies
//! them to a [`CropSession`] one at a time:
//!
//! ```text
//! Idle --Drag::Begin--> Panning --Drag::Release--> Idle   (pan committed + clamped)
//! Idle --Pinch::Begin-> Pinching --Pinch::End----> Idle   (zoom committed + clamped)
//! ```
//!
//! Priority between the two:
//! - `Drag::Begin` while pinching is ignored; the pinch has to end first.
//! - `Pinch::Begin` while panning commits the drag at its last delta, then
//!   starts the pinch.
//! - Events that do not belong to the current state are ignored.

use thiserror::Error;
use tracing::{debug, trace};

use crate::geometry::PanOffset;
use crate::session::CropSession;

/// Phase of a single-contact drag. Deltas are totals since `Begin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Begin,
    Move { dx: f64, dy: f64 },
    Release { dx: f64, dy: f64 },
    Cancel,
}

/// Phase of a two-contact pinch. Scale is relative to the distance at `Begin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchPhase {
    Begin,
    Update { scale: f64 },
    End { scale: f64 },
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Exactly one contact point.
    Drag(DragPhase),
    /// Exactly two contact points.
    Pinch(PinchPhase),
}

impl GestureEvent {
    pub fn contact_count(&self) -> usize {
        match self {
            GestureEvent::Drag(_) => 1,
            GestureEvent::Pinch(_) => 2,
        }
    }
}

/// Phase of a raw touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// A raw sample from the host's touch stream, before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub contacts: usize,
    pub phase: TouchPhase,
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("Unsupported number of contact points: {0}")]
    UnsupportedContacts(usize),
}

impl TryFrom<TouchSample> for GestureEvent {
    type Error = GestureError;

    fn try_from(sample: TouchSample) -> Result<Self, Self::Error> {
        let TouchSample {
            contacts,
            phase,
            dx,
            dy,
            scale,
        } = sample;
        match contacts {
            1 => Ok(GestureEvent::Drag(match phase {
                TouchPhase::Began => DragPhase::Begin,
                TouchPhase::Moved => DragPhase::Move { dx, dy },
                TouchPhase::Ended => DragPhase::Release { dx, dy },
                TouchPhase::Cancelled => DragPhase::Cancel,
            })),
            2 => Ok(GestureEvent::Pinch(match phase {
                TouchPhase::Began => PinchPhase::Begin,
                TouchPhase::Moved => PinchPhase::Update { scale },
                TouchPhase::Ended => PinchPhase::End { scale },
                TouchPhase::Cancelled => PinchPhase::Cancel,
            })),
            n => Err(GestureError::UnsupportedContacts(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Panning {
        /// Committed pan when the drag began.
        origin: PanOffset,
        dx: f64,
        dy: f64,
    },
    Pinching {
        /// Transient multiplier on top of the committed zoom.
        live_scale: f64,
    },
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Ignored,
    Started,
    Updated,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Drop any in-progress gesture without touching the session.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Pan to draw right now: the drag in progress (unclamped, so the image
    /// follows the finger) or the committed pan.
    pub fn live_pan(&self, session: &CropSession) -> PanOffset {
        match self.state {
            GestureState::Panning { origin, dx, dy } => origin.translated(dx, dy),
            _ => session.pan(),
        }
    }

    /// Transient pinch multiplier to draw right now, 1 outside a pinch.
    pub fn live_scale(&self) -> f64 {
        match self.state {
            GestureState::Pinching { live_scale } => live_scale,
            _ => 1.0,
        }
    }

    /// Apply one event to `session`.
    pub fn handle(&mut self, session: &mut CropSession, event: GestureEvent) -> GestureOutcome {
        let outcome = match event {
            GestureEvent::Drag(phase) => self.handle_drag(session, phase),
            GestureEvent::Pinch(phase) => self.handle_pinch(session, phase),
        };
        trace!(?event, ?outcome, state = ?self.state, "gesture event");
        outcome
    }

    fn handle_drag(&mut self, session: &mut CropSession, phase: DragPhase) -> GestureOutcome {
        match (self.state, phase) {
            (GestureState::Idle, DragPhase::Begin) => {
                self.state = GestureState::Panning {
                    origin: session.pan(),
                    dx: 0.0,
                    dy: 0.0,
                };
                GestureOutcome::Started
            }
            (GestureState::Panning { origin, .. }, DragPhase::Move { dx, dy }) => {
                if !(dx.is_finite() && dy.is_finite()) {
                    return GestureOutcome::Ignored;
                }
                self.state = GestureState::Panning { origin, dx, dy };
                GestureOutcome::Updated
            }
            (GestureState::Panning { origin, dx, dy }, DragPhase::Release { dx: rx, dy: ry }) => {
                let (dx, dy) = if rx.is_finite() && ry.is_finite() {
                    (rx, ry)
                } else {
                    (dx, dy)
                };
                let pan = session.commit_pan(origin.translated(dx, dy));
                self.state = GestureState::Idle;
                debug!(x = pan.x, y = pan.y, "pan committed");
                GestureOutcome::Committed
            }
            (GestureState::Panning { .. }, DragPhase::Cancel) => {
                self.state = GestureState::Idle;
                GestureOutcome::Cancelled
            }
            _ => GestureOutcome::Ignored,
        }
    }

    fn handle_pinch(&mut self, session: &mut CropSession, phase: PinchPhase) -> GestureOutcome {
        match (self.state, phase) {
            (GestureState::Idle, PinchPhase::Begin) => {
                self.state = GestureState::Pinching { live_scale: 1.0 };
                GestureOutcome::Started
            }
            (GestureState::Panning { origin, dx, dy }, PinchPhase::Begin) => {
                // A second finger landed mid-drag: keep what was dragged so far.
                let pan = session.commit_pan(origin.translated(dx, dy));
                debug!(x = pan.x, y = pan.y, "pan committed by pinch start");
                self.state = GestureState::Pinching { live_scale: 1.0 };
                GestureOutcome::Started
            }
            (GestureState::Pinching { .. }, PinchPhase::Update { scale }) => {
                if !is_usable_scale(scale) {
                    return GestureOutcome::Ignored;
                }
                self.state = GestureState::Pinching { live_scale: scale };
                GestureOutcome::Updated
            }
            (GestureState::Pinching { live_scale }, PinchPhase::End { scale }) => {
                let multiplier = if is_usable_scale(scale) { scale } else { live_scale };
                let zoom = session.zoom_by(multiplier);
                self.state = GestureState::Idle;
                debug!(zoom, multiplier, "zoom committed");
                GestureOutcome::Committed
            }
            (GestureState::Pinching { .. }, PinchPhase::Cancel) => {
                self.state = GestureState::Idle;
                GestureOutcome::Cancelled
            }
            _ => GestureOutcome::Ignored,
        }
    }
}

fn is_usable_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}
