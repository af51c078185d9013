//! Motion threshold calibration.
//!
//! A resting finger is never perfectly still, so the displacement separating
//! wobble from intentional motion depends on how large a pixel is on the
//! physical glass. Calibration happens once per session; until it has run the
//! session treats every comparison as "no motion".

use crate::error::GestureError;

/// Drag margin in physical millimetres: how far a finger must travel on the
/// glass before it counts as motion.
pub const DEFAULT_DRAG_MARGIN_MM: f64 = 20.0;

/// Pixel displacement threshold for a display of the given physical and
/// pixel size along one axis, using the default drag margin.
pub fn calibrate(physical_size_mm: f64, pixel_size_px: f64) -> Result<f64, GestureError> {
    calibrate_with_margin(physical_size_mm, pixel_size_px, DEFAULT_DRAG_MARGIN_MM)
}

/// Same as [`calibrate`] with an explicit drag margin.
pub fn calibrate_with_margin(
    physical_size_mm: f64,
    pixel_size_px: f64,
    margin_mm: f64,
) -> Result<f64, GestureError> {
    if !positive(physical_size_mm) || !positive(pixel_size_px) || !positive(margin_mm) {
        return Err(GestureError::InvalidMetrics {
            physical_size_mm,
            pixel_size_px,
        });
    }

    let px_per_mm = pixel_size_px / physical_size_mm;
    let hysteresis_px = px_per_mm * margin_mm;
    if !hysteresis_px.is_finite() {
        return Err(GestureError::InvalidMetrics {
            physical_size_mm,
            pixel_size_px,
        });
    }
    Ok(hysteresis_px)
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_margin_by_pixel_density() {
        // 1920px over 300mm = 6.4 px/mm; 20mm margin = 128px
        let px = calibrate(300.0, 1920.0).unwrap();
        assert!((px - 128.0).abs() < 1e-9);
    }

    #[test]
    fn custom_margin() {
        let px = calibrate_with_margin(400.0, 1000.0, 10.0).unwrap();
        assert!((px - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_metrics() {
        assert!(calibrate(0.0, 1920.0).is_err());
        assert!(calibrate(300.0, 0.0).is_err());
        assert!(calibrate(-300.0, 1920.0).is_err());
        assert!(calibrate_with_margin(300.0, 1920.0, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite_metrics() {
        assert!(calibrate(f64::NAN, 1920.0).is_err());
        assert!(calibrate(300.0, f64::INFINITY).is_err());
    }

    #[test]
    fn result_is_always_positive() {
        let px = calibrate(1e-300, 1e6).unwrap_or(0.0);
        // absurd densities either calibrate to a positive finite threshold
        // or fail; never NaN/Inf
        assert!(px == 0.0 || (px.is_finite() && px > 0.0));
    }
}
