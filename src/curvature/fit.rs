//! Per-row quadratic fitting and radius extraction.
//!
//! Each corner row is fitted with `y = a·x² + b·x + c` by ordinary least
//! squares. The regressor is centered and scaled to `[-1, 1]` before the
//! 3×3 normal system is solved, which keeps the system well conditioned for
//! pixel-scale abscissas; the coefficients are mapped back to raw pixel
//! units afterwards. The curvature radius of a bowed row is `1 / (2·|a|)`.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Decides whether a fitted row counts as flat.
///
/// `coeff_eps` alone is not enough: subpixel corners carry a noise floor,
/// and on wide rows that noise fits as a second-order coefficient slightly
/// above any fixed epsilon. The gate therefore also compares the fitted
/// sagitta (total bow over the row's span) against the fit residual, so a
/// bow that is indistinguishable from the measurement noise is flat.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FlatnessGate {
    /// Rows with `|a|` at or below this are flat outright.
    pub coeff_eps: f64,
    /// Sagittas below this many pixels are unmeasurable regardless of noise.
    pub sagitta_floor_px: f64,
    /// Sagittas below `factor × rmse` are within the noise of the fit.
    pub rmse_factor: f64,
}

impl Default for FlatnessGate {
    fn default() -> Self {
        Self {
            coeff_eps: 1e-9,
            sagitta_floor_px: 0.05,
            rmse_factor: 3.0,
        }
    }
}

/// Quadratic fit of one corner row, coefficients in raw pixel units.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RowFit {
    /// Second-order coefficient; the bow.
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Root-mean-square residual in pixels.
    pub rmse: f64,
    /// Half the horizontal extent of the fitted points, pixels.
    pub half_span: f64,
    /// Number of points that entered the fit.
    pub points: usize,
}

impl RowFit {
    /// Radius of the arc matching the fitted bow, in pixels.
    #[inline]
    pub fn radius_px(&self) -> f64 {
        1.0 / (2.0 * self.a.abs())
    }

    /// Total bow of the fitted parabola over the row's span, pixels.
    #[inline]
    pub fn sagitta_px(&self) -> f64 {
        self.a.abs() * self.half_span * self.half_span
    }

    /// A row is flat when its bow is below the noise floor. Flat rows have
    /// no defined radius and must not enter the average.
    #[inline]
    pub fn is_flat(&self, gate: &FlatnessGate) -> bool {
        self.a.abs() <= gate.coeff_eps
            || self.sagitta_px() <= gate.sagitta_floor_px.max(gate.rmse_factor * self.rmse)
    }
}

/// OLS quadratic fit over one row of corner points.
///
/// Returns `None` when fewer than 3 points are given (no unique quadratic)
/// or when the abscissas are degenerate (zero horizontal spread, singular
/// system).
pub fn fit_row_quadratic(points: &[[f32; 2]]) -> Option<RowFit> {
    if points.len() < 3 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0] as f64).sum::<f64>() / n;
    let half_span = points
        .iter()
        .map(|p| (p[0] as f64 - mean_x).abs())
        .fold(0.0f64, f64::max);
    if half_span < 1e-9 {
        return None;
    }

    // Power sums of the scaled regressor u = (x - mean_x) / half_span.
    let (mut s1, mut s2, mut s3, mut s4) = (0.0f64, 0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0f64, 0.0, 0.0);
    for p in points {
        let u = (p[0] as f64 - mean_x) / half_span;
        let y = p[1] as f64;
        let u2 = u * u;
        s1 += u;
        s2 += u2;
        s3 += u2 * u;
        s4 += u2 * u2;
        t0 += y;
        t1 += y * u;
        t2 += y * u2;
    }

    let normal = Matrix3::new(s4, s3, s2, s3, s2, s1, s2, s1, n);
    let rhs = Vector3::new(t2, t1, t0);
    let sol = normal.lu().solve(&rhs)?;
    let (au, bu, cu) = (sol[0], sol[1], sol[2]);
    if !(au.is_finite() && bu.is_finite() && cu.is_finite()) {
        return None;
    }

    // Map back: y = au·u² + bu·u + cu with u = (x - m)/s.
    let s = half_span;
    let m = mean_x;
    let a = au / (s * s);
    let b = bu / s - 2.0 * au * m / (s * s);
    let c = cu - bu * m / s + au * m * m / (s * s);

    let mut sse = 0.0f64;
    for p in points {
        let x = p[0] as f64;
        let residual = p[1] as f64 - (a * x * x + b * x + c);
        sse += residual * residual;
    }

    Some(RowFit {
        a,
        b,
        c,
        rmse: (sse / n).sqrt(),
        half_span,
        points: points.len(),
    })
}
