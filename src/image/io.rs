//! I/O helpers for pixel buffers and JSON reports.
//!
//! - `load_pixel_buffer`: read a PNG/JPEG into an interleaved RGB buffer.
//! - `save_pixel_buffer`: write a 1/3/4-channel buffer to disk.
//! - `save_plane_png`: write an `ImageF32` (assumed in `[0, 1]`) to a
//!   grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.

use super::{ImageF32, PixelBuffer};
use crate::error::{CalibError, CalibResult};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, Rgba};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as an interleaved RGB `PixelBuffer`.
pub fn load_pixel_buffer(path: &Path) -> CalibResult<PixelBuffer> {
    let img = image::open(path)
        .map_err(|e| CalibError::Io(format!("failed to open {}: {e}", path.display())))?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Ok(PixelBuffer {
        w,
        h,
        channels: 3,
        data: img.into_raw(),
    })
}

/// Save a pixel buffer to `path`, creating parent directories.
pub fn save_pixel_buffer(buffer: &PixelBuffer, path: &Path) -> CalibResult<()> {
    ensure_parent_dir(path)?;
    let w = buffer.w as u32;
    let h = buffer.h as u32;
    let dynimg = match buffer.channels {
        1 => ImageBuffer::<Luma<u8>, _>::from_raw(w, h, buffer.data.clone())
            .map(DynamicImage::ImageLuma8),
        3 => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, buffer.data.clone())
            .map(DynamicImage::ImageRgb8),
        4 => ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, buffer.data.clone())
            .map(DynamicImage::ImageRgba8),
        _ => None,
    }
    .ok_or_else(|| CalibError::Io("failed to wrap buffer for encoding".to_string()))?;
    dynimg
        .save(path)
        .map_err(|e| CalibError::Io(format!("failed to save {}: {e}", path.display())))
}

/// Save a float plane to a grayscale PNG, mapping `[0, 1]` to `[0, 255]`.
pub fn save_plane_png(plane: &ImageF32, path: &Path) -> CalibResult<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(plane.w as u32, plane.h as u32);
    for y in 0..plane.h {
        for (x, &px) in plane.row(y).iter().enumerate() {
            let v = (px * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| CalibError::Io(format!("failed to save {}: {e}", path.display())))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> CalibResult<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CalibError::Io(format!("failed to serialize {}: {e}", path.display())))?;
    fs::write(path, json)
        .map_err(|e| CalibError::Io(format!("failed to write {}: {e}", path.display())))
}

fn ensure_parent_dir(path: &Path) -> CalibResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| CalibError::Io(format!("failed to create {}: {e}", parent.display())))?;
        }
    }
    Ok(())
}
