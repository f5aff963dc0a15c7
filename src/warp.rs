//! Cylindrical curved↔flat pixel remapping.
//!
//! The wall is modeled as an arc of a cylinder with radius `R`. For each
//! target pixel `(x, y)` the angle subtended from the image center is
//! `theta = (x − cx)/R`, and the source sample sits at
//! `(R·sin(theta) + cx, y)` — horizontal only, curvature carries no
//! vertical component. Resampling is bilinear with a black border for
//! samples that fall outside the source.
//!
//! The in-place variant resamples from a private copy of the original data
//! so the scan never reads pixels it has already overwritten.

use crate::error::{CalibError, CalibResult};
use crate::image::{ImageF32, PixelBuffer};
use rayon::prelude::*;

/// Per-pixel source-coordinate mapping consumed by [`remap`].
///
/// `map_x`/`map_y` share the target dimensions; entry `(x, y)` names the
/// source position to sample for that target pixel.
#[derive(Clone, Debug)]
pub struct WarpMap {
    pub map_x: ImageF32,
    pub map_y: ImageF32,
}

impl WarpMap {
    /// Cylindrical flattening map for a target of `w × h` pixels.
    pub fn cylindrical(w: usize, h: usize, radius_px: f64) -> CalibResult<Self> {
        if !(radius_px > 0.0) {
            return Err(CalibError::InvalidParameter("radius must be positive"));
        }
        if w == 0 || h == 0 {
            return Err(CalibError::EmptyInput);
        }
        let cx = w as f64 / 2.0;
        let mut map_x = ImageF32::new(w, h);
        let mut map_y = ImageF32::new(w, h);
        // The x mapping is identical for every row; compute it once.
        let row_x: Vec<f32> = (0..w)
            .map(|x| {
                let theta = (x as f64 - cx) / radius_px;
                (radius_px * theta.sin() + cx) as f32
            })
            .collect();
        for y in 0..h {
            map_x.row_mut(y).copy_from_slice(&row_x);
            map_y.row_mut(y).fill(y as f32);
        }
        Ok(Self { map_x, map_y })
    }
}

/// Resample `src` through the mapping into a new buffer of the map's size.
pub fn remap(src: &PixelBuffer, map: &WarpMap) -> CalibResult<PixelBuffer> {
    if src.is_empty() {
        return Err(CalibError::EmptyInput);
    }
    let (w, h) = (map.map_x.w, map.map_x.h);
    let mut dst = PixelBuffer::new(w, h, src.channels)?;
    let stride = w * src.channels;
    dst.data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let xs = map.map_x.row(y);
            let ys = map.map_y.row(y);
            for x in 0..w {
                let px = &mut out_row[x * src.channels..(x + 1) * src.channels];
                sample_bilinear(src, xs[x], ys[x], px);
            }
        });
    Ok(dst)
}

/// Bilinear tap with a constant black border outside the source extent.
fn sample_bilinear(src: &PixelBuffer, x: f32, y: f32, out: &mut [u8]) {
    let max_x = (src.w - 1) as f32;
    let max_y = (src.h - 1) as f32;
    if x < 0.0 || y < 0.0 || x > max_x || y > max_y {
        out.fill(0);
        return;
    }
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(src.w - 1);
    let y1 = (y0 + 1).min(src.h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);
    for c in 0..src.channels {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bot = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        out[c] = (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8;
    }
}

/// Flatten a curved capture into a new buffer.
pub fn warp_curved_to_flat(src: &PixelBuffer, radius_px: f64) -> CalibResult<PixelBuffer> {
    if src.is_empty() {
        return Err(CalibError::EmptyInput);
    }
    let map = WarpMap::cylindrical(src.w, src.h, radius_px)?;
    remap(src, &map)
}

/// Flatten a curved capture in place.
///
/// The buffer is left untouched when the radius is invalid.
pub fn warp_curved_to_flat_in_place(buf: &mut PixelBuffer, radius_px: f64) -> CalibResult<()> {
    let flattened = warp_curved_to_flat(buf, radius_px)?;
    buf.data = flattened.data;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer(w: usize, h: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h, 3).unwrap();
        for y in 0..h {
            for x in 0..w {
                let v = (x * 255 / w.max(1)) as u8;
                buf.put_pixel(x, y, &[v, v, 128]);
            }
        }
        buf
    }

    #[test]
    fn zero_radius_rejected_without_touching_buffer() {
        let mut buf = gradient_buffer(32, 16);
        let before = buf.clone();
        assert!(warp_curved_to_flat_in_place(&mut buf, 0.0).is_err());
        assert_eq!(buf, before);
    }

    #[test]
    fn huge_radius_approximates_identity() {
        let buf = gradient_buffer(64, 16);
        let out = warp_curved_to_flat(&buf, 1e9).unwrap();
        // sin(theta) ≈ theta for tiny angles, so the mapping is near-identity.
        for y in 0..16 {
            for x in 1..63 {
                let d = out.pixel(x, y)[0] as i32 - buf.pixel(x, y)[0] as i32;
                assert!(d.abs() <= 1, "pixel ({x},{y}) moved by {d}");
            }
        }
    }

    #[test]
    fn mapping_pulls_edges_inward() {
        let map = WarpMap::cylindrical(100, 1, 80.0).unwrap();
        // R·sin(theta) < R·theta: edge samples come from inside the chord.
        assert!(map.map_x.get(0, 0) > 0.0);
        assert!(map.map_x.get(99, 0) < 99.0);
        // Vertical coordinate is untouched by the cylinder model.
        assert_eq!(map.map_y.get(42, 0), 0.0);
    }

    #[test]
    fn in_place_matches_new_buffer_variant() {
        let mut buf = gradient_buffer(48, 12);
        let expected = warp_curved_to_flat(&buf, 200.0).unwrap();
        warp_curved_to_flat_in_place(&mut buf, 200.0).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn out_of_source_samples_are_black() {
        let buf = PixelBuffer::filled(4, 4, &[255, 255, 255]).unwrap();
        let mut map = WarpMap::cylindrical(4, 4, 100.0).unwrap();
        map.map_x.set(0, 0, -10.0);
        let out = remap(&buf, &map).unwrap();
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
    }
}
