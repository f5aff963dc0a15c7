//! Pixel-space to physical-space conversion.

use crate::error::{CalibError, CalibResult};

/// Convert a curvature radius from pixels to meters given the panel's pixel
/// pitch in millimeters.
///
/// A non-positive radius is invalid (there is no wall to measure). The
/// pitch is taken as given; validating it is the caller's responsibility.
pub fn pixel_radius_to_meters(radius_px: f64, pixel_pitch_mm: f64) -> CalibResult<f64> {
    if !(radius_px > 0.0) {
        return Err(CalibError::InvalidParameter("radius must be positive"));
    }
    Ok(radius_px * pixel_pitch_mm / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_is_linear_in_both_factors() {
        assert_eq!(pixel_radius_to_meters(100.0, 5.0).unwrap(), 0.5);
        assert_eq!(pixel_radius_to_meters(2000.0, 1.25).unwrap(), 2.5);
    }

    #[test]
    fn non_positive_radius_is_invalid() {
        assert!(pixel_radius_to_meters(0.0, 5.0).is_err());
        assert!(pixel_radius_to_meters(-3.0, 5.0).is_err());
        assert!(pixel_radius_to_meters(f64::NAN, 5.0).is_err());
    }
}
