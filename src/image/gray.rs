//! Luma reduction of interleaved buffers to a single f32 plane.

use super::{ImageF32, PixelBuffer};
use crate::error::{CalibError, CalibResult};

// BT.601 luma weights, the same transform classical CV gray conversion uses.
const WR: f32 = 0.299;
const WG: f32 = 0.587;
const WB: f32 = 0.114;

/// Reduce a 1/3/4-channel buffer to a single-channel intensity plane.
///
/// 1-channel buffers pass through unchanged; 3-channel buffers are treated
/// as RGB, 4-channel as RGBA with alpha ignored. Intensities stay in the
/// 0..255 range of the source samples.
pub fn to_gray(src: &PixelBuffer) -> CalibResult<ImageF32> {
    if src.is_empty() {
        return Err(CalibError::EmptyInput);
    }
    let mut out = ImageF32::new(src.w, src.h);
    match src.channels {
        1 => {
            for (dst, &s) in out.data.iter_mut().zip(src.data.iter()) {
                *dst = s as f32;
            }
        }
        3 | 4 => {
            let ch = src.channels;
            for (dst, px) in out.data.iter_mut().zip(src.data.chunks_exact(ch)) {
                *dst = WR * px[0] as f32 + WG * px[1] as f32 + WB * px[2] as f32;
            }
        }
        _ => return Err(CalibError::InvalidParameter("channels must be 1, 3 or 4")),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_passes_through() {
        let mut buf = PixelBuffer::new(2, 1, 1).unwrap();
        buf.put_pixel(0, 0, &[12]);
        buf.put_pixel(1, 0, &[200]);
        let gray = to_gray(&buf).unwrap();
        assert_eq!(gray.get(0, 0), 12.0);
        assert_eq!(gray.get(1, 0), 200.0);
    }

    #[test]
    fn rgba_ignores_alpha() {
        let mut buf = PixelBuffer::new(1, 1, 4).unwrap();
        buf.put_pixel(0, 0, &[255, 255, 255, 0]);
        let gray = to_gray(&buf).unwrap();
        assert!((gray.get(0, 0) - 255.0).abs() < 0.5);
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let buf = PixelBuffer::new(0, 0, 3).unwrap();
        assert_eq!(to_gray(&buf), Err(CalibError::EmptyInput));
    }
}
