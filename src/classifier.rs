//! Pure classification policy, re-run on every motion event.
//!
//! Pinch is checked before swipe: it needs corroboration from every
//! non-anchor contact, while a lone displaced anchor is ambiguous and gets
//! discretized by the dominant axis instead.

use std::fmt;

use crate::geom::distance;
use crate::registry::{TouchContact, TouchRegistry};

/// Resolved gesture classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureKind {
    #[default]
    Tap,
    LongTap,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    PinchIn,
    PinchOut,
}

impl GestureKind {
    pub const ALL: [GestureKind; 8] = [
        GestureKind::Tap,
        GestureKind::LongTap,
        GestureKind::SwipeUp,
        GestureKind::SwipeDown,
        GestureKind::SwipeLeft,
        GestureKind::SwipeRight,
        GestureKind::PinchIn,
        GestureKind::PinchOut,
    ];

    /// Stable name used in binding keys and logs.
    pub fn slug(self) -> &'static str {
        match self {
            GestureKind::Tap => "tap",
            GestureKind::LongTap => "long_tap",
            GestureKind::SwipeUp => "swipe_up",
            GestureKind::SwipeDown => "swipe_down",
            GestureKind::SwipeLeft => "swipe_left",
            GestureKind::SwipeRight => "swipe_right",
            GestureKind::PinchIn => "pinch_in",
            GestureKind::PinchOut => "pinch_out",
        }
    }

    pub fn from_slug(slug: &str) -> Option<GestureKind> {
        GestureKind::ALL.iter().copied().find(|g| g.slug() == slug)
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Derive the best gesture hypothesis for the current contact positions.
///
/// `None` means nothing crossed the threshold (or the threshold is not yet
/// calibrated, or the anchor has already lifted); the caller keeps its
/// previous classification.
pub(crate) fn classify(
    registry: &TouchRegistry,
    anchor_id: i32,
    hysteresis_px: f64,
) -> Option<GestureKind> {
    if hysteresis_px <= 0.0 {
        // uncalibrated; a zero threshold would turn finger wobble into gestures
        return None;
    }
    let anchor = registry.get(anchor_id)?;

    if registry.count() >= 2
        && let Some(pinch) = pinch_direction(registry, anchor, hysteresis_px)
    {
        return Some(pinch);
    }

    swipe_direction(anchor, hysteresis_px)
}

/// Every non-anchor contact must clear the threshold relative to its
/// baseline, and all must agree on whether the spread is growing; one
/// dissenting contact vetoes the pinch.
fn pinch_direction(
    registry: &TouchRegistry,
    anchor: &TouchContact,
    hysteresis_px: f64,
) -> Option<GestureKind> {
    let mut growing: Option<bool> = None;

    for contact in registry.iter().filter(|c| c.id != anchor.id) {
        let delta = distance(contact.current, anchor.current) - contact.baseline_distance;
        if delta.abs() <= hysteresis_px {
            return None;
        }
        let grew = delta > 0.0;
        match growing {
            None => growing = Some(grew),
            Some(prev) if prev != grew => return None,
            Some(_) => {}
        }
    }

    growing.map(|grew| {
        if grew {
            GestureKind::PinchOut
        } else {
            GestureKind::PinchIn
        }
    })
}

/// Anchor displacement beyond the threshold, discretized to the dominant
/// axis. Ties go to the vertical axis.
fn swipe_direction(anchor: &TouchContact, hysteresis_px: f64) -> Option<GestureKind> {
    if distance(anchor.current, anchor.origin) <= hysteresis_px {
        return None;
    }

    let dx = anchor.current.0 - anchor.origin.0;
    let dy = anchor.current.1 - anchor.origin.1;
    let kind = if dx.abs() > dy.abs() {
        if dx < 0.0 {
            GestureKind::SwipeLeft
        } else {
            GestureKind::SwipeRight
        }
    } else if dy < 0.0 {
        GestureKind::SwipeUp
    } else {
        GestureKind::SwipeDown
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYST: f64 = 50.0;

    fn registry(contacts: &[TouchContact]) -> TouchRegistry {
        let mut reg = TouchRegistry::new();
        for c in contacts {
            reg.insert(c.clone()).unwrap();
        }
        reg
    }

    fn moved(id: i32, origin: (f64, f64), current: (f64, f64), baseline: f64) -> TouchContact {
        let mut c = TouchContact::new(id, origin.0, origin.1, 0, baseline);
        c.current = current;
        c
    }

    #[test]
    fn uncalibrated_threshold_never_classifies() {
        let reg = registry(&[moved(1, (0.0, 0.0), (500.0, 0.0), 0.0)]);
        assert_eq!(classify(&reg, 1, 0.0), None);
    }

    #[test]
    fn below_threshold_is_no_motion() {
        let reg = registry(&[moved(1, (0.0, 0.0), (30.0, 20.0), 0.0)]);
        assert_eq!(classify(&reg, 1, HYST), None);
    }

    #[test]
    fn lifted_anchor_freezes_classification() {
        let reg = registry(&[moved(2, (100.0, 0.0), (400.0, 0.0), 100.0)]);
        assert_eq!(classify(&reg, 1, HYST), None);
    }

    #[test]
    fn swipe_picks_dominant_axis() {
        let cases = [
            ((120.0, 10.0), GestureKind::SwipeRight),
            ((-120.0, 10.0), GestureKind::SwipeLeft),
            ((10.0, -120.0), GestureKind::SwipeUp),
            ((10.0, 120.0), GestureKind::SwipeDown),
        ];
        for ((dx, dy), want) in cases {
            let reg = registry(&[moved(1, (200.0, 200.0), (200.0 + dx, 200.0 + dy), 0.0)]);
            assert_eq!(classify(&reg, 1, HYST), Some(want), "d=({dx},{dy})");
        }
    }

    #[test]
    fn diagonal_tie_goes_vertical() {
        let reg = registry(&[moved(1, (0.0, 0.0), (60.0, 60.0), 0.0)]);
        assert_eq!(classify(&reg, 1, HYST), Some(GestureKind::SwipeDown));
    }

    #[test]
    fn pinch_out_when_spread_grows() {
        let reg = registry(&[
            moved(1, (0.0, 0.0), (0.0, 0.0), 0.0),
            moved(2, (100.0, 0.0), (300.0, 0.0), 100.0),
        ]);
        assert_eq!(classify(&reg, 1, HYST), Some(GestureKind::PinchOut));
    }

    #[test]
    fn pinch_in_when_spread_shrinks() {
        let reg = registry(&[
            moved(1, (0.0, 0.0), (0.0, 0.0), 0.0),
            moved(2, (300.0, 0.0), (100.0, 0.0), 300.0),
        ]);
        assert_eq!(classify(&reg, 1, HYST), Some(GestureKind::PinchIn));
    }

    #[test]
    fn pinch_needs_every_contact_past_threshold() {
        // second contact barely moved: no pinch, and the still anchor means
        // no swipe either
        let reg = registry(&[
            moved(1, (0.0, 0.0), (0.0, 0.0), 0.0),
            moved(2, (100.0, 0.0), (300.0, 0.0), 100.0),
            moved(3, (0.0, 100.0), (0.0, 110.0), 100.0),
        ]);
        assert_eq!(classify(&reg, 1, HYST), None);
    }

    #[test]
    fn disagreeing_directions_veto_pinch() {
        let reg = registry(&[
            moved(1, (0.0, 0.0), (0.0, 0.0), 0.0),
            moved(2, (100.0, 0.0), (300.0, 0.0), 100.0),
            moved(3, (0.0, 300.0), (0.0, 100.0), 300.0),
        ]);
        assert_eq!(classify(&reg, 1, HYST), None);
    }

    #[test]
    fn pinch_wins_over_swipe() {
        // anchor displacement alone would read as SwipeLeft, but the second
        // contact corroborates a growing spread
        let reg = registry(&[
            moved(1, (0.0, 0.0), (-100.0, 0.0), 0.0),
            moved(2, (100.0, 0.0), (100.0, 0.0), 100.0),
        ]);
        assert_eq!(classify(&reg, 1, HYST), Some(GestureKind::PinchOut));
    }

    #[test]
    fn slug_round_trips() {
        for g in GestureKind::ALL {
            assert_eq!(GestureKind::from_slug(g.slug()), Some(g));
        }
        assert_eq!(GestureKind::from_slug("wiggle"), None);
    }
}
