//! Synthetic curvature fields from the cylindrical wall model.
//!
//! A wall of curvature radius `R` deviates from its chord by
//! `z(x) = R − sqrt(R² − dx²)` with `dx = x − width/2`: zero at the center,
//! growing toward the edges. Curvature is horizontal only, so the 2-D field
//! is vertically invariant.
//!
//! Domain policy: a pixel with `|dx| > R` lies beyond the modeled arc. The
//! offset is clamped to `±R`, saturating the deviation at `R` instead of
//! taking the square root of a negative radicand.

use crate::error::{CalibError, CalibResult};
use crate::image::ImageF32;

/// 1-D deviation profile of length `width`, in pixels.
pub fn deviation_profile(width: usize, radius_px: f64) -> CalibResult<Vec<f64>> {
    if width == 0 {
        return Err(CalibError::InvalidParameter("width must be >= 1"));
    }
    if !(radius_px > 0.0) {
        return Err(CalibError::InvalidParameter("radius must be positive"));
    }
    let cx = width as f64 / 2.0;
    let profile = (0..width)
        .map(|x| {
            let dx = (x as f64 - cx).clamp(-radius_px, radius_px);
            radius_px - (radius_px * radius_px - dx * dx).sqrt()
        })
        .collect();
    Ok(profile)
}

/// 2-D deviation field normalized to `[0, 1]` as a newly owned float plane.
///
/// Every row carries the same profile; normalization is global min-max. A
/// constant field (radius far larger than the width) normalizes to zero.
pub fn deviation_field(width: usize, height: usize, radius_px: f64) -> CalibResult<ImageF32> {
    if height == 0 {
        return Err(CalibError::InvalidParameter("height must be >= 1"));
    }
    let profile = deviation_profile(width, radius_px)?;
    let min = profile.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = profile.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut field = ImageF32::new(width, height);
    let normalized: Vec<f32> = profile
        .iter()
        .map(|&z| {
            if range > 0.0 {
                ((z - min) / range) as f32
            } else {
                0.0
            }
        })
        .collect();
    for y in 0..height {
        field.row_mut(y).copy_from_slice(&normalized);
    }
    Ok(field)
}
