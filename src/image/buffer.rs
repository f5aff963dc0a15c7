//! Owned interleaved 8-bit pixel buffer.
//!
//! The calibration core treats a displayable image purely as
//! `(width, height, channels, data)`: row-major, interleaved samples,
//! 1, 3 or 4 channels. Ownership is explicit; operations either allocate a
//! new buffer or borrow one mutably for the duration of a call.

use crate::error::{CalibError, CalibResult};

/// Owned row-major interleaved u8 image with 1, 3 or 4 channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Samples per pixel (1, 3 or 4)
    pub channels: usize,
    /// Backing storage, `w * h * channels` bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer. Rejects unsupported channel counts.
    pub fn new(w: usize, h: usize, channels: usize) -> CalibResult<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(CalibError::InvalidParameter("channels must be 1, 3 or 4"));
        }
        Ok(Self {
            w,
            h,
            channels,
            data: vec![0u8; w * h * channels],
        })
    }

    /// Allocate a buffer filled with a constant color. The color slice length
    /// selects the channel count.
    pub fn filled(w: usize, h: usize, color: &[u8]) -> CalibResult<Self> {
        let mut buf = Self::new(w, h, color.len())?;
        for px in buf.data.chunks_exact_mut(color.len()) {
            px.copy_from_slice(color);
        }
        Ok(buf)
    }

    /// True when the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    /// Byte offset of pixel (x, y).
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.w + x) * self.channels
    }

    #[inline]
    /// Borrow the samples of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let o = self.offset(x, y);
        &self.data[o..o + self.channels]
    }

    #[inline]
    /// Overwrite the samples of pixel (x, y).
    pub fn put_pixel(&mut self, x: usize, y: usize, color: &[u8]) {
        let o = self.offset(x, y);
        self.data[o..o + self.channels].copy_from_slice(color);
    }

    #[inline]
    /// Borrow row `y` (all channels interleaved).
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w * self.channels;
        &self.data[start..start + self.w * self.channels]
    }

    #[inline]
    /// Borrow row `y` mutably.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.w * self.channels;
        let start = y * stride;
        &mut self.data[start..start + stride]
    }

    /// Fill the pixel range `[x0, x1)` of row `y` with a constant color.
    ///
    /// The range is clamped to the row; an empty or inverted range is a
    /// no-op. The color must match the buffer's channel count.
    pub fn fill_row_span(&mut self, y: usize, x0: usize, x1: usize, color: &[u8]) {
        debug_assert_eq!(color.len(), self.channels);
        if y >= self.h {
            return;
        }
        let x1 = x1.min(self.w);
        if x0 >= x1 {
            return;
        }
        let ch = self.channels;
        let row = self.row_mut(y);
        for px in row[x0 * ch..x1 * ch].chunks_exact_mut(ch) {
            px.copy_from_slice(color);
        }
    }
}
