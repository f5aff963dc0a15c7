//! Curvature estimation from a captured checkerboard image.
//!
//! Stages
//! 1. Reduce the capture to a single intensity plane.
//! 2. Detect the expected corner lattice (all-or-nothing).
//! 3. Refine every corner to subpixel precision.
//! 4. Fit `y = a·x² + b·x + c` to each corner row; rows with fewer than 3
//!    points are skipped, rows whose fitted bow falls inside the flatness
//!    gate are excluded from aggregation (a flat row has no radius, not an
//!    infinite one that would dominate the mean).
//! 5. Report the arithmetic mean of the surviving per-row radii.
//!
//! The estimate is reliable when the bow is measurable yet moderate: the
//! sagitta over a corner row should exceed a few tenths of a pixel (below
//! that the flatness gate rejects the rows as noise), and the bow should
//! change by less than three quarters of the row pitch between neighboring
//! corners (beyond that the lattice cannot be banded into rows). For a
//! given radius, pick a capture size that keeps the bow in that window.
//!
//! The optional snapshot sink receives a corner-annotated copy of the input
//! after detection; it is observational only and cannot change the result.

pub mod fit;
pub mod report;

pub use fit::{fit_row_quadratic, FlatnessGate, RowFit};
pub use report::{DetectionReport, StageTimings};

use crate::detect::{detect_corner_grid, refine_subpixel, DetectOptions, SubpixOptions};
use crate::error::{CalibError, CalibResult};
use crate::geometry::GridSpec;
use crate::image::{to_gray, PixelBuffer};
use crate::snapshot::{annotate_corners, SnapshotSink};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parameters of the estimation pipeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EstimatorParams {
    pub detect: DetectOptions,
    pub subpix: SubpixOptions,
    /// Decides which fitted rows count as flat.
    pub flatness: FlatnessGate,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            detect: DetectOptions::default(),
            subpix: SubpixOptions::default(),
            flatness: FlatnessGate::default(),
        }
    }
}

/// Successful curvature estimate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurvatureEstimate {
    /// Mean curvature radius over the surviving rows, pixels.
    pub radius_px: f64,
    /// Number of rows that contributed to the mean.
    pub rows_used: usize,
}

/// Curvature estimator pairing the detection chain with per-row fitting.
pub struct CurvatureEstimator {
    params: EstimatorParams,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl CurvatureEstimator {
    pub fn new(params: EstimatorParams) -> Self {
        Self { params, sink: None }
    }

    /// Attach a diagnostic snapshot sink; purely observational.
    pub fn with_snapshot_sink(mut self, sink: Box<dyn SnapshotSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Estimate the mean curvature radius of the wall shown in `image`.
    ///
    /// `grid` counts the expected feature points (inner corners), not cells.
    pub fn estimate(
        &self,
        image: &PixelBuffer,
        grid: GridSpec,
    ) -> CalibResult<CurvatureEstimate> {
        let (result, _) = self.estimate_with_report(image, grid);
        result
    }

    /// Like [`estimate`](Self::estimate), also returning the full
    /// diagnostic record regardless of outcome.
    pub fn estimate_with_report(
        &self,
        image: &PixelBuffer,
        grid: GridSpec,
    ) -> (CalibResult<CurvatureEstimate>, DetectionReport) {
        let mut report = DetectionReport {
            image_width: image.w,
            image_height: image.h,
            grid,
            corners: Vec::new(),
            row_fits: Vec::new(),
            row_radii_px: Vec::new(),
            radius_px: None,
            timings: StageTimings::default(),
        };

        if image.is_empty() {
            return (Err(CalibError::EmptyInput), report);
        }

        let t0 = Instant::now();
        let gray = match to_gray(image) {
            Ok(g) => g,
            Err(e) => return (Err(e), report),
        };
        report.timings.gray_ms = t0.elapsed().as_secs_f64() * 1e3;

        let t1 = Instant::now();
        let lattice = match detect_corner_grid(&gray, grid, &self.params.detect) {
            Ok(l) => l,
            Err(e) => return (Err(e), report),
        };
        report.timings.detect_ms = t1.elapsed().as_secs_f64() * 1e3;

        let t2 = Instant::now();
        let mut corners = lattice.points;
        refine_subpixel(&gray, &mut corners, &self.params.subpix);
        report.timings.refine_ms = t2.elapsed().as_secs_f64() * 1e3;
        report.corners = corners.clone();

        if let Some(sink) = &self.sink {
            let annotated = annotate_corners(image, &corners);
            if let Err(e) = sink.publish("corners", &annotated) {
                warn!("snapshot sink failed: {e}");
            }
        }

        let t3 = Instant::now();
        let mut radii = Vec::new();
        for row in corners.chunks_exact(grid.cols as usize) {
            let Some(row_fit) = fit_row_quadratic(row) else {
                continue;
            };
            if row_fit.is_flat(&self.params.flatness) {
                debug!(
                    "curvature: row fitted flat (a={:.3e}, sagitta={:.3e}px), skipping",
                    row_fit.a,
                    row_fit.sagitta_px()
                );
                report.row_fits.push(row_fit);
                continue;
            }
            radii.push(row_fit.radius_px());
            report.row_radii_px.push(row_fit.radius_px());
            report.row_fits.push(row_fit);
        }
        report.timings.fit_ms = t3.elapsed().as_secs_f64() * 1e3;

        if radii.is_empty() {
            debug!("curvature: no row survived the flatness gate");
            return (Err(CalibError::DegenerateFit), report);
        }
        let radius_px = radii.iter().sum::<f64>() / radii.len() as f64;
        report.radius_px = Some(radius_px);
        debug!(
            "curvature: radius {:.1}px from {}/{} rows",
            radius_px,
            radii.len(),
            grid.rows
        );
        (
            Ok(CurvatureEstimate {
                radius_px,
                rows_used: radii.len(),
            }),
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotSink;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FailingSink;

    impl SnapshotSink for FailingSink {
        fn publish(&self, _: &str, _: &PixelBuffer) -> CalibResult<()> {
            Err(CalibError::Io("sink unavailable".to_string()))
        }
    }

    struct CountingSink(Rc<Cell<usize>>);

    impl SnapshotSink for CountingSink {
        fn publish(&self, _: &str, _: &PixelBuffer) -> CalibResult<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn empty_image_is_rejected_before_any_work() {
        let estimator = CurvatureEstimator::new(EstimatorParams::default());
        let empty = PixelBuffer::new(0, 0, 3).unwrap();
        let grid = GridSpec::new(7, 5).unwrap();
        assert_eq!(estimator.estimate(&empty, grid), Err(CalibError::EmptyInput));
    }

    #[test]
    fn flat_pattern_yields_degenerate_fit() {
        let grid_cells = GridSpec::new(8, 6).unwrap();
        let image = crate::pattern::generate(640, 480, grid_cells, 0, 0).unwrap();
        let lattice = GridSpec::new(7, 5).unwrap();
        let estimator = CurvatureEstimator::new(EstimatorParams::default());
        let (result, report) = estimator.estimate_with_report(&image, lattice);
        assert_eq!(result, Err(CalibError::DegenerateFit));
        // Detection itself succeeded; the rows were simply flat.
        assert_eq!(report.corners.len(), 35);
        // Subpixel noise can fit as |a| slightly above any fixed epsilon;
        // the sagitta gate must still reject every row of a flat board.
        assert!(report.row_radii_px.is_empty());
        for fit in &report.row_fits {
            assert!(fit.sagitta_px() < 0.05, "sagitta={}", fit.sagitta_px());
        }
    }

    #[test]
    fn sink_failure_does_not_change_the_result() {
        let grid_cells = GridSpec::new(8, 6).unwrap();
        let image = crate::pattern::generate(640, 480, grid_cells, 0, 0).unwrap();
        let lattice = GridSpec::new(7, 5).unwrap();
        let with_sink = CurvatureEstimator::new(EstimatorParams::default())
            .with_snapshot_sink(Box::new(FailingSink));
        let without = CurvatureEstimator::new(EstimatorParams::default());
        assert_eq!(
            with_sink.estimate(&image, lattice),
            without.estimate(&image, lattice)
        );
    }

    #[test]
    fn sink_is_invoked_once_per_estimate() {
        let grid_cells = GridSpec::new(8, 6).unwrap();
        let image = crate::pattern::generate(640, 480, grid_cells, 0, 0).unwrap();
        let lattice = GridSpec::new(7, 5).unwrap();
        let count = Rc::new(Cell::new(0));
        let estimator = CurvatureEstimator::new(EstimatorParams::default())
            .with_snapshot_sink(Box::new(CountingSink(count.clone())));
        let _ = estimator.estimate(&image, lattice);
        assert_eq!(count.get(), 1);
    }
}
