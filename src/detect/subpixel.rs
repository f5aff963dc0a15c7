//! Iterative subpixel refinement of detected corners.
//!
//! Classic gradient-orthogonality refinement: every pixel `p` in a window
//! around the current corner estimate contributes the constraint
//! `∇I(p)ᵀ (q − p) = 0` (the gradient at an edge pixel is orthogonal to the
//! edge through it, and the corner `q` lies on that edge). Accumulating the
//! constraints gives a 2×2 normal system whose solution is the refined
//! corner; iterating re-centers the window until the update stalls.

use crate::image::ImageF32;
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-6;

/// Parameters for the local-window iterative refinement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SubpixOptions {
    /// Search window half-size in pixels.
    pub win_half: usize,
    /// Iteration cap per corner.
    pub max_iters: usize,
    /// Stop once the corner moves less than this many pixels.
    pub eps: f32,
}

impl Default for SubpixOptions {
    fn default() -> Self {
        Self {
            win_half: 11,
            max_iters: 30,
            eps: 0.1,
        }
    }
}

/// Refine each point in place to subpixel precision.
///
/// Points whose neighborhood carries no usable gradient (singular normal
/// system) keep their current position; refinement never rejects a corner.
pub fn refine_subpixel(gray: &ImageF32, points: &mut [[f32; 2]], opts: &SubpixOptions) {
    for p in points.iter_mut() {
        *p = refine_one(gray, *p, opts);
    }
}

fn refine_one(gray: &ImageF32, start: [f32; 2], opts: &SubpixOptions) -> [f32; 2] {
    let win = opts.win_half as i64;
    let mut cx = start[0];
    let mut cy = start[1];
    for _ in 0..opts.max_iters {
        let mut a11 = 0.0f32;
        let mut a12 = 0.0f32;
        let mut a22 = 0.0f32;
        let mut b1 = 0.0f32;
        let mut b2 = 0.0f32;
        for dy in -win..=win {
            for dx in -win..=win {
                let px = cx + dx as f32;
                let py = cy + dy as f32;
                // Central differences from bilinear taps around (px, py).
                let gx = 0.5 * (gray.sample_clamped(px + 1.0, py) - gray.sample_clamped(px - 1.0, py));
                let gy = 0.5 * (gray.sample_clamped(px, py + 1.0) - gray.sample_clamped(px, py - 1.0));
                let gxx = gx * gx;
                let gxy = gx * gy;
                let gyy = gy * gy;
                a11 += gxx;
                a12 += gxy;
                a22 += gyy;
                b1 += gxx * px + gxy * py;
                b2 += gxy * px + gyy * py;
            }
        }
        let det = a11 * a22 - a12 * a12;
        if det.abs() <= EPS {
            break;
        }
        let nx = (a22 * b1 - a12 * b2) / det;
        let ny = (a11 * b2 - a12 * b1) / det;
        let shift = ((nx - cx).powi(2) + (ny - cy).powi(2)).sqrt();
        cx = nx.clamp(0.0, (gray.w.max(1) - 1) as f32);
        cy = ny.clamp(0.0, (gray.h.max(1) - 1) as f32);
        if shift < opts.eps {
            break;
        }
    }
    [cx, cy]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic saddle with the corner at a known fractional position.
    fn saddle(w: usize, h: usize, corner_x: f32, corner_y: f32) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                // Smooth sign-product ramp crossing at (corner_x, corner_y).
                let u = (x as f32 - corner_x) / 3.0;
                let v = (y as f32 - corner_y) / 3.0;
                let val = 127.0 + 127.0 * u.tanh() * v.tanh();
                img.set(x, y, val);
            }
        }
        img
    }

    #[test]
    fn recovers_fractional_corner_position() {
        let img = saddle(64, 64, 31.6, 30.3);
        let mut pts = [[32.0f32, 30.0f32]];
        refine_subpixel(&img, &mut pts, &SubpixOptions::default());
        assert!((pts[0][0] - 31.6).abs() < 0.15, "x={}", pts[0][0]);
        assert!((pts[0][1] - 30.3).abs() < 0.15, "y={}", pts[0][1]);
    }

    #[test]
    fn flat_neighborhood_leaves_point_untouched() {
        let img = ImageF32::new(64, 64);
        let mut pts = [[20.0f32, 20.0f32]];
        refine_subpixel(&img, &mut pts, &SubpixOptions::default());
        assert_eq!(pts[0], [20.0, 20.0]);
    }
}
