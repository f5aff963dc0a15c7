//! Optional diagnostic-snapshot collaborator.
//!
//! The estimator can hand an annotated copy of its input to a
//! [`SnapshotSink`]. Publishing is purely observational: a sink failure is
//! logged and never changes the estimate. The filesystem sink below is the
//! stock implementation; tests plug in an in-memory sink instead.

use crate::error::{CalibError, CalibResult};
use crate::image::{io, PixelBuffer};
use std::path::PathBuf;

/// Receiver for annotated diagnostic images.
pub trait SnapshotSink {
    /// Publish one annotated snapshot under a short label.
    fn publish(&self, label: &str, annotated: &PixelBuffer) -> CalibResult<()>;
}

/// Sink writing snapshots as PNG files into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotSink for DirectorySink {
    fn publish(&self, label: &str, annotated: &PixelBuffer) -> CalibResult<()> {
        if label.is_empty() {
            return Err(CalibError::InvalidParameter("snapshot label is empty"));
        }
        io::save_pixel_buffer(annotated, &self.dir.join(format!("{label}.png")))
    }
}

/// Draw a cross marker centered on each point, clipped to the buffer.
pub fn annotate_corners(image: &PixelBuffer, points: &[[f32; 2]]) -> PixelBuffer {
    const ARM: i64 = 4;
    let marker: &[u8] = match image.channels {
        1 => &[255],
        3 => &[255, 0, 0],
        _ => &[255, 0, 0, 255],
    };
    let mut out = image.clone();
    for p in points {
        let cx = p[0].round() as i64;
        let cy = p[1].round() as i64;
        for d in -ARM..=ARM {
            for (x, y) in [(cx + d, cy), (cx, cy + d)] {
                if x >= 0 && (x as usize) < out.w && y >= 0 && (y as usize) < out.h {
                    out.put_pixel(x as usize, y as usize, marker);
                }
            }
        }
    }
    out
}
