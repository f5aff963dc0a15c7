//! Shared coordinate-interval math for region and cell algebra.
//!
//! Cell boundaries are kept in f64 until the moment a span is rasterized;
//! truncation to integer pixels happens exactly once per drawn rectangle so
//! rounding never accumulates across the grid.

use crate::error::{CalibError, CalibResult};
use serde::{Deserialize, Serialize};

/// Logical count of checkerboard cells, or of detected feature points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
}

impl GridSpec {
    /// Construct a grid spec, rejecting zero dimensions up front. The
    /// downstream cell-size division depends on this guard.
    pub fn new(cols: u32, rows: u32) -> CalibResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(CalibError::InvalidParameter("cols and rows must be >= 1"));
        }
        Ok(Self { cols, rows })
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

/// Closed-open interval `[lo, hi)` on one axis, in f64 parent coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Intersection with another span. An empty result has `hi <= lo`.
    #[inline]
    pub fn intersect(&self, other: &Span) -> Span {
        Span {
            lo: self.lo.max(other.lo),
            hi: self.hi.min(other.hi),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    /// Shift by `offset` (translate into a child coordinate space).
    #[inline]
    pub fn translated(&self, offset: f64) -> Span {
        Span {
            lo: self.lo - offset,
            hi: self.hi - offset,
        }
    }
}

/// Axis-aligned rectangle `(x, y, w, h)` in a parent coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl RegionRect {
    pub fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn x_span(&self) -> Span {
        Span::new(self.x as f64, (self.x + self.w as i64) as f64)
    }

    #[inline]
    pub fn y_span(&self) -> Span {
        Span::new(self.y as f64, (self.y + self.h as i64) as f64)
    }
}

/// Cell-boundary computation over a grid anchored at `origin` with f64 cell
/// sizes derived from the covered extent.
#[derive(Clone, Copy, Debug)]
pub struct CellGrid {
    origin_x: f64,
    origin_y: f64,
    cell_w: f64,
    cell_h: f64,
}

impl CellGrid {
    /// Derive cell sizes from the extent `(extent_w, extent_h)` divided by
    /// the grid counts. Fails fast on zero counts rather than dividing.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        extent_w: f64,
        extent_h: f64,
        grid: GridSpec,
    ) -> CalibResult<Self> {
        if grid.cols == 0 || grid.rows == 0 {
            return Err(CalibError::InvalidParameter("cols and rows must be >= 1"));
        }
        Ok(Self {
            origin_x,
            origin_y,
            cell_w: extent_w / grid.cols as f64,
            cell_h: extent_h / grid.rows as f64,
        })
    }

    /// Horizontal span of column `j`.
    #[inline]
    pub fn col_span(&self, j: u32) -> Span {
        Span::new(
            self.origin_x + j as f64 * self.cell_w,
            self.origin_x + (j + 1) as f64 * self.cell_w,
        )
    }

    /// Vertical span of row `i`.
    #[inline]
    pub fn row_span(&self, i: u32) -> Span {
        Span::new(
            self.origin_y + i as f64 * self.cell_h,
            self.origin_y + (i + 1) as f64 * self.cell_h,
        )
    }
}

/// Truncate an f64 span to integer pixel bounds `[x0, x1)`, clamping the low
/// end at zero. Returns `None` for spans that leave no pixels.
#[inline]
pub fn span_to_pixels(span: &Span) -> Option<(usize, usize)> {
    if span.is_empty() || span.hi <= 0.0 {
        return None;
    }
    let lo = span.lo.max(0.0) as usize;
    let hi = span.hi as usize;
    (hi > lo).then_some((lo, hi))
}
