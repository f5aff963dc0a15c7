//! Serializable diagnostics for one estimation run.

use super::fit::RowFit;
use crate::geometry::GridSpec;
use serde::Serialize;

/// Wall-clock breakdown of the estimation stages, milliseconds.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StageTimings {
    pub gray_ms: f64,
    pub detect_ms: f64,
    pub refine_ms: f64,
    pub fit_ms: f64,
}

/// Full diagnostic record of one `estimate` call.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    pub image_width: usize,
    pub image_height: usize,
    pub grid: GridSpec,
    /// Refined corner positions, row-major; empty when detection failed.
    pub corners: Vec<[f32; 2]>,
    /// Per-row fits in row order; rows that could not be fitted are absent.
    pub row_fits: Vec<RowFit>,
    /// Radii of the rows that survived the flatness gate.
    pub row_radii_px: Vec<f64>,
    /// Mean radius, present only on success.
    pub radius_px: Option<f64>,
    pub timings: StageTimings,
}
