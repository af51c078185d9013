//! The per-seat gesture state machine.

use log::{debug, info};

use crate::bindings::BindingDispatcher;
use crate::classifier::{self, GestureKind};
use crate::config::Thresholds;
use crate::error::GestureError;
use crate::geom::{Point, distance};
use crate::hysteresis;
use crate::registry::{TouchContact, TouchRegistry};

/// Holding the first contact down longer than this, without the interaction
/// becoming anything else, promotes a tap to a long tap.
pub const LONG_TAP_MS: u32 = 500;

/// One recognizer instance per logical seat.
///
/// The three entry points are synchronous and must be called from a single
/// context in event order; the session never blocks and holds no locks.
/// An interaction runs from the first touch-down to the last touch-up, at
/// which point the session reports `(gesture, peak contact count)` to its
/// dispatcher and returns to idle. The calibrated motion threshold survives
/// across interactions.
pub struct GestureSession<D> {
    contacts: TouchRegistry,
    anchor_id: Option<i32>,
    /// Anchor origin, cached so contacts arriving after the anchor lifts
    /// still get a well-defined baseline.
    anchor_origin: Point,
    secondary_id: Option<i32>,
    peak_contacts: u32,
    resolved: GestureKind,
    captured: bool,
    hysteresis_px: f64,
    long_tap_ms: u32,
    drag_margin_mm: f64,
    dispatcher: D,
}

impl<D: BindingDispatcher> GestureSession<D> {
    /// Build a session for a display of the given physical and pixel size
    /// along one axis, with default thresholds.
    pub fn new(
        physical_size_mm: f64,
        pixel_size_px: f64,
        dispatcher: D,
    ) -> Result<Self, GestureError> {
        Self::build(
            physical_size_mm,
            pixel_size_px,
            hysteresis::DEFAULT_DRAG_MARGIN_MM,
            LONG_TAP_MS,
            dispatcher,
        )
    }

    /// Build a session with thresholds taken from a profile.
    pub fn with_thresholds(
        physical_size_mm: f64,
        pixel_size_px: f64,
        thresholds: &Thresholds,
        dispatcher: D,
    ) -> Result<Self, GestureError> {
        Self::build(
            physical_size_mm,
            pixel_size_px,
            thresholds.drag_margin_mm,
            thresholds.long_tap_ms,
            dispatcher,
        )
    }

    fn build(
        physical_size_mm: f64,
        pixel_size_px: f64,
        drag_margin_mm: f64,
        long_tap_ms: u32,
        dispatcher: D,
    ) -> Result<Self, GestureError> {
        let hysteresis_px =
            hysteresis::calibrate_with_margin(physical_size_mm, pixel_size_px, drag_margin_mm)?;
        debug!("calibrated motion hysteresis: {hysteresis_px:.1}px");
        Ok(Self {
            contacts: TouchRegistry::new(),
            anchor_id: None,
            anchor_origin: (0.0, 0.0),
            secondary_id: None,
            peak_contacts: 0,
            resolved: GestureKind::Tap,
            captured: false,
            hysteresis_px,
            long_tap_ms,
            drag_margin_mm,
            dispatcher,
        })
    }

    /// Re-run calibration for new display metrics. Last call wins; contacts
    /// already classified under the old threshold are not revisited.
    pub fn recalibrate(
        &mut self,
        physical_size_mm: f64,
        pixel_size_px: f64,
    ) -> Result<(), GestureError> {
        self.hysteresis_px = hysteresis::calibrate_with_margin(
            physical_size_mm,
            pixel_size_px,
            self.drag_margin_mm,
        )?;
        debug!("recalibrated motion hysteresis: {:.1}px", self.hysteresis_px);
        Ok(())
    }

    /// A new contact landed. Returns whether the raw event may still be
    /// passed through to the focused surface.
    ///
    /// A touch-down for an id that is already live is a caller contract
    /// violation and leaves the session untouched.
    pub fn touch_down(
        &mut self,
        id: i32,
        x: f64,
        y: f64,
        time_ms: u32,
    ) -> Result<bool, GestureError> {
        if self.contacts.get(id).is_some() {
            return Err(GestureError::DuplicateContact(id));
        }

        let baseline_distance = match self.anchor_id {
            None => {
                self.anchor_id = Some(id);
                self.anchor_origin = (x, y);
                0.0
            }
            Some(_) => {
                if self.secondary_id.is_none() {
                    self.secondary_id = Some(id);
                }
                distance((x, y), self.anchor_origin)
            }
        };
        self.contacts
            .insert(TouchContact::new(id, x, y, time_ms, baseline_distance))?;

        let live = self.contacts.count() as u32;
        if live > self.peak_contacts {
            self.peak_contacts = live;
        }
        // three concurrent contacts capture the interaction for good; the
        // count dropping back below three does not restore passthrough
        if live >= 3 && !self.captured {
            self.captured = true;
            debug!("interaction captured at {live} contacts");
        }
        Ok(!self.captured)
    }

    /// A live contact moved. Returns the unchanged passthrough state; motion
    /// for an untracked id is ignored.
    pub fn touch_motion(&mut self, id: i32, x: f64, y: f64) -> bool {
        if self.contacts.update_position(id, x, y).is_err() {
            debug!("motion for untracked touch id {id}, ignoring");
            return !self.captured;
        }

        if let Some(anchor_id) = self.anchor_id
            && let Some(kind) = classifier::classify(&self.contacts, anchor_id, self.hysteresis_px)
        {
            if kind != self.resolved {
                debug!("interaction now reads as {kind}");
            }
            self.resolved = kind;
        }
        !self.captured
    }

    /// A contact lifted. When it was the last one, the interaction resolves
    /// and the session returns to idle. A release for an untracked id is
    /// ignored.
    pub fn touch_up(&mut self, id: i32, time_ms: u32) {
        let Ok(contact) = self.contacts.remove(id) else {
            debug!("release for untracked touch id {id}, ignoring");
            return;
        };

        if Some(id) == self.anchor_id
            && self.resolved == GestureKind::Tap
            && time_ms.wrapping_sub(contact.down_time) > self.long_tap_ms
        {
            self.resolved = GestureKind::LongTap;
        }

        if self.contacts.is_empty() {
            self.resolve();
        }
    }

    /// Resolution point: report the gesture, then reset everything except
    /// the calibrated threshold.
    fn resolve(&mut self) {
        info!(
            "gesture resolved: {} with {} contact(s)",
            self.resolved, self.peak_contacts
        );
        self.dispatcher
            .find_and_execute(self.resolved, self.peak_contacts);

        self.contacts.clear();
        self.anchor_id = None;
        self.anchor_origin = (0.0, 0.0);
        self.secondary_id = None;
        self.peak_contacts = 0;
        self.resolved = GestureKind::Tap;
        self.captured = false;
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.count()
    }

    /// Peak number of simultaneous contacts this interaction; 0 when idle.
    pub fn peak_contacts(&self) -> u32 {
        self.peak_contacts
    }

    /// Current best classification; may still change until resolution.
    pub fn resolved(&self) -> GestureKind {
        self.resolved
    }

    pub fn is_idle(&self) -> bool {
        self.contacts.is_empty() && self.anchor_id.is_none()
    }

    pub fn anchor_id(&self) -> Option<i32> {
        self.anchor_id
    }

    pub fn secondary_id(&self) -> Option<i32> {
        self.secondary_id
    }

    /// Whether raw events are still forwarded to the focused surface.
    pub fn passthrough_allowed(&self) -> bool {
        !self.captured
    }

    pub fn hysteresis_px(&self) -> f64 {
        self.hysteresis_px
    }
}
