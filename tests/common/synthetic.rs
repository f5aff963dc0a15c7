//! Synthetic curved-capture helpers shared by the integration tests.

use ledwall_calib::field::deviation_profile;
use ledwall_calib::image::PixelBuffer;

/// Simulate a capture of a curved wall displaying `flat`.
///
/// Depth variation across a cylindrical wall shows up as a vertical bow in
/// the captured rows: each column `x` is displaced downward by the wall's
/// deviation `z(x)` at that column. Sampling uses bilinear interpolation
/// with edge clamping so the top band does not invent border corners.
pub fn bow_vertically(flat: &PixelBuffer, radius_px: f64) -> PixelBuffer {
    let profile = deviation_profile(flat.w, radius_px).expect("valid profile inputs");
    let mut out = PixelBuffer::new(flat.w, flat.h, flat.channels).expect("valid buffer dims");
    for y in 0..flat.h {
        for x in 0..flat.w {
            let src_y = y as f64 - profile[x];
            let color = sample_column_clamped(flat, x, src_y);
            out.put_pixel(x, y, &color);
        }
    }
    out
}

/// Linear interpolation along one column, clamped at the image edge.
fn sample_column_clamped(src: &PixelBuffer, x: usize, y: f64) -> Vec<u8> {
    let max_y = (src.h - 1) as f64;
    let yc = y.clamp(0.0, max_y);
    let y0 = yc.floor() as usize;
    let y1 = (y0 + 1).min(src.h - 1);
    let fy = yc - y0 as f64;
    let p0 = src.pixel(x, y0);
    let p1 = src.pixel(x, y1);
    p0.iter()
        .zip(p1.iter())
        .map(|(&a, &b)| (a as f64 * (1.0 - fy) + b as f64 * fy).round() as u8)
        .collect()
}
