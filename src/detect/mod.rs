//! Checkerboard corner-grid detection.
//!
//! Pipeline
//! - Local contrast normalization: subtract a box mean (integral image)
//!   sized from the expected corner pitch, so uneven illumination does not
//!   bias the response.
//! - X-junction response: the diagonal second difference
//!   `|I(x-1,y-1) + I(x+1,y+1) - I(x+1,y-1) - I(x-1,y+1)|` peaks at
//!   checkerboard saddle points and stays near zero on straight edges and
//!   flat cells. A 3×3 box pass stabilizes the maxima under resampling.
//! - Greedy non-maximum suppression with a pitch-derived distance gate.
//! - Row banding: each row is grown from its topmost unassigned corner by
//!   walking to the nearest neighbor about one corner pitch away in x and
//!   within three quarters of a row pitch in y. Bowed rows whose tails sink
//!   below the center of the next row are still banded correctly, as long
//!   as the bow changes by less than 0.75 × row pitch between neighboring
//!   corners of a row (for square cells, a local slope under 0.75).
//!
//! Detection is all-or-nothing: anything other than exactly `rows × cols`
//! well-ordered corners is `GridNotFound`. There is no retry logic; a failed
//! call is terminal and the caller decides what to do next.

pub mod subpixel;

pub use subpixel::{refine_subpixel, SubpixOptions};

use crate::error::{CalibError, CalibResult};
use crate::geometry::GridSpec;
use crate::image::ImageF32;
use log::debug;
use serde::{Deserialize, Serialize};

/// Knobs for the corner-response detector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Candidates below `frac × max_response` are discarded (0..1).
    pub response_thresh_frac: f32,
    /// Suppression radius as a fraction of the smaller corner pitch.
    pub min_dist_frac: f32,
    /// Pixels at the image border excluded from the response.
    pub border_margin: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            response_thresh_frac: 0.4,
            min_dist_frac: 0.4,
            border_margin: 3,
        }
    }
}

/// Ordered `rows × cols` corner lattice, row-major.
#[derive(Clone, Debug, Serialize)]
pub struct CornerGrid {
    pub grid: GridSpec,
    /// Row-major corner positions, `rows * cols` entries.
    pub points: Vec<[f32; 2]>,
}

/// Detect the expected corner lattice in a gray plane.
///
/// `grid` counts feature points (inner corners), not cells. Returns the
/// corners at integer precision; run [`refine_subpixel`] afterwards.
pub fn detect_corner_grid(
    gray: &ImageF32,
    grid: GridSpec,
    opts: &DetectOptions,
) -> CalibResult<CornerGrid> {
    if gray.w == 0 || gray.h == 0 {
        return Err(CalibError::EmptyInput);
    }
    // Corner pitch implied by the expected lattice: `cols` corners come from
    // `cols + 1` cell columns.
    let pitch_x = gray.w as f32 / (grid.cols + 1) as f32;
    let pitch_y = gray.h as f32 / (grid.rows + 1) as f32;
    let pitch = pitch_x.min(pitch_y);
    if pitch < 4.0 {
        return Err(CalibError::InvalidParameter(
            "image too small for the requested grid",
        ));
    }

    let normalized = normalize_local_contrast(gray, ((pitch * 0.5) as usize).max(2));
    let response = corner_response(&normalized);

    let max_resp = response.data.iter().cloned().fold(0.0f32, f32::max);
    if max_resp <= f32::EPSILON {
        debug!("detect: response map is flat, no corners");
        return Err(CalibError::GridNotFound);
    }

    let thresh = opts.response_thresh_frac * max_resp;
    let margin = opts.border_margin.max(2);
    let mut candidates = local_maxima(&response, thresh, margin);
    candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

    let min_dist = (opts.min_dist_frac * pitch).max(2.0);
    let accepted = suppress(&candidates, min_dist);
    debug!(
        "detect: {} candidates, {} after suppression (expected {})",
        candidates.len(),
        accepted.len(),
        grid.point_count()
    );
    if accepted.len() != grid.point_count() {
        return Err(CalibError::GridNotFound);
    }

    order_row_major(accepted, grid, pitch_x, pitch_y).map(|points| CornerGrid { grid, points })
}

/// Subtract a clamped box mean from every pixel.
fn normalize_local_contrast(gray: &ImageF32, radius: usize) -> ImageF32 {
    let (w, h) = (gray.w, gray.h);
    // Integral image with a top/left zero border.
    let mut integral = vec![0.0f64; (w + 1) * (h + 1)];
    for y in 0..h {
        let row = gray.row(y);
        let mut acc = 0.0f64;
        for x in 0..w {
            acc += row[x] as f64;
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + acc;
        }
    }
    let sum_rect = |x0: usize, y0: usize, x1: usize, y1: usize| -> f64 {
        integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
            - integral[y0 * (w + 1) + x1]
            - integral[y1 * (w + 1) + x0]
    };

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(w);
            let area = ((x1 - x0) * (y1 - y0)) as f64;
            let mean = sum_rect(x0, y0, x1, y1) / area;
            out.set(x, y, gray.get(x, y) - mean as f32);
        }
    }
    out
}

/// Diagonal second-difference response, box-smoothed once.
fn corner_response(norm: &ImageF32) -> ImageF32 {
    let (w, h) = (norm.w, norm.h);
    let mut raw = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return raw;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let v = norm.get(x - 1, y - 1) + norm.get(x + 1, y + 1)
                - norm.get(x + 1, y - 1)
                - norm.get(x - 1, y + 1);
            raw.set(x, y, v.abs());
        }
    }
    let mut out = ImageF32::new(w, h);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut acc = 0.0f32;
            for dy in 0..3 {
                for dx in 0..3 {
                    acc += raw.get(x + dx - 1, y + dy - 1);
                }
            }
            out.set(x, y, acc / 9.0);
        }
    }
    out
}

/// Collect strict local maxima of the response above `thresh`.
fn local_maxima(response: &ImageF32, thresh: f32, margin: usize) -> Vec<(f32, f32, f32)> {
    let (w, h) = (response.w, response.h);
    let mut out = Vec::new();
    if w <= 2 * margin || h <= 2 * margin {
        return out;
    }
    for y in margin..h - margin {
        for x in margin..w - margin {
            let v = response.get(x, y);
            if v < thresh {
                continue;
            }
            let mut is_max = true;
            'scan: for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let n = response.get((x as i64 + dx) as usize, (y as i64 + dy) as usize);
                    // Ties break toward the earlier (top-left) pixel.
                    if n > v || (n == v && (dy < 0 || (dy == 0 && dx < 0))) {
                        is_max = false;
                        break 'scan;
                    }
                }
            }
            if is_max {
                out.push((x as f32, y as f32, v));
            }
        }
    }
    out
}

/// Greedy distance suppression over strength-sorted candidates.
fn suppress(sorted: &[(f32, f32, f32)], min_dist: f32) -> Vec<[f32; 2]> {
    let d2 = min_dist * min_dist;
    let mut accepted: Vec<[f32; 2]> = Vec::new();
    for &(x, y, _) in sorted {
        let clear = accepted
            .iter()
            .all(|p| (p[0] - x).powi(2) + (p[1] - y).powi(2) >= d2);
        if clear {
            accepted.push([x, y]);
        }
    }
    accepted
}

/// Band points into rows by nearest-neighbor growing, order each band by x,
/// and sanity check the result (strictly increasing x inside each band).
///
/// Sorting by y and chunking breaks on bowed boards: the tails of one row
/// sink below the center of the next once the bow approaches the row pitch.
/// Growing instead follows each row corner by corner. A neighbor qualifies
/// when it sits between 0.25 and 1.75 corner pitches away horizontally and
/// within 0.75 row pitches vertically of the current row end; among the
/// qualifiers, the walk takes the one closest to the extrapolation of its
/// previous step, so a smooth bow is followed instead of a straight line.
fn order_row_major(
    points: Vec<[f32; 2]>,
    grid: GridSpec,
    pitch_x: f32,
    pitch_y: f32,
) -> CalibResult<Vec<[f32; 2]>> {
    let cols = grid.cols as usize;
    let rows = grid.rows as usize;
    let mut free = points;
    let mut bands: Vec<Vec<[f32; 2]>> = Vec::with_capacity(rows);

    for _ in 0..rows {
        let seed_idx = free
            .iter()
            .enumerate()
            .min_by(|a, b| a.1[1].total_cmp(&b.1[1]))
            .map(|(i, _)| i)
            .ok_or(CalibError::GridNotFound)?;
        let mut band = vec![free.swap_remove(seed_idx)];

        // Grow rightwards from the seed, then leftwards.
        for dir in [1.0f32, -1.0] {
            let mut step = [dir * pitch_x, 0.0f32];
            loop {
                let end = if dir > 0.0 {
                    *band.last().unwrap()
                } else {
                    band[0]
                };
                let expect = [end[0] + step[0], end[1] + step[1]];
                let next = free
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| {
                        let dx = (p[0] - end[0]) * dir;
                        let dy = (p[1] - end[1]).abs();
                        dx > 0.25 * pitch_x && dx < 1.75 * pitch_x && dy < 0.75 * pitch_y
                    })
                    .min_by(|a, b| {
                        let da = (a.1[0] - expect[0]).powi(2) + (a.1[1] - expect[1]).powi(2);
                        let db = (b.1[0] - expect[0]).powi(2) + (b.1[1] - expect[1]).powi(2);
                        da.total_cmp(&db)
                    })
                    .map(|(i, _)| i);
                let Some(i) = next else { break };
                let p = free.swap_remove(i);
                step = [p[0] - end[0], p[1] - end[1]];
                if dir > 0.0 {
                    band.push(p);
                } else {
                    band.insert(0, p);
                }
            }
        }

        if band.len() != cols {
            return Err(CalibError::GridNotFound);
        }
        band.sort_by(|a, b| a[0].total_cmp(&b[0]));
        for pair in band.windows(2) {
            if pair[1][0] - pair[0][0] < 1.0 {
                // Two corners at the same x inside a band: banding failed.
                return Err(CalibError::GridNotFound);
            }
        }
        bands.push(band);
    }

    bands.sort_by(|a, b| {
        let ya = a.iter().map(|p| p[1]).sum::<f32>() / a.len() as f32;
        let yb = b.iter().map(|p| p[1]).sum::<f32>() / b.len() as f32;
        ya.total_cmp(&yb)
    });
    Ok(bands.into_iter().flatten().collect())
}
