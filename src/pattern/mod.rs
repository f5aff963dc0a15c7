//! Checkerboard calibration-pattern rasterization.
//!
//! Three modes share one fill routine and differ only in how global cell
//! boundaries map into the output buffer's coordinate space:
//!
//! - [`generate`] paints the whole canvas: black cells on white, the grid
//!   anchored at `(start_x, start_y)`.
//! - [`generate_for_group`] renders the sub-window of a global layout that
//!   one cabinet group covers. Cells are clipped horizontally to the group
//!   window; vertical extents are drawn at full cell height because groups
//!   span the full layout height (the buffer's own row range still bounds
//!   the fill).
//! - [`generate_for_group_padded`] additionally restricts drawing to the
//!   active LED region inside the group and inverts the palette: the
//!   non-emitting padding must stay black, so cells are white on black.
//!
//! Cell `(i, j)` is foreground iff `(i + j) % 2 == 0`. Boundaries stay in
//! f64 until each rectangle is rasterized.

use crate::error::CalibResult;
use crate::geometry::{span_to_pixels, CellGrid, GridSpec, RegionRect, Span};
use crate::image::PixelBuffer;
use log::debug;

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

/// Fill every pixel of the closed-open rectangle `x_span × y_span`,
/// truncating to integers only here.
fn fill_cell(buf: &mut PixelBuffer, x_span: &Span, y_span: &Span, color: &[u8; 3]) {
    let Some((x0, x1)) = span_to_pixels(x_span) else {
        return;
    };
    let Some((y0, y1)) = span_to_pixels(y_span) else {
        return;
    };
    for y in y0..y1.min(buf.h) {
        buf.fill_row_span(y, x0, x1, color);
    }
}

/// Paint a full-canvas checkerboard: black cells on a white canvas, cell
/// sizes derived from the extent right/below `(start_x, start_y)`.
pub fn generate(
    canvas_w: u32,
    canvas_h: u32,
    grid: GridSpec,
    start_x: u32,
    start_y: u32,
) -> CalibResult<PixelBuffer> {
    let cells = CellGrid::new(
        start_x as f64,
        start_y as f64,
        (canvas_w as f64 - start_x as f64).max(0.0),
        (canvas_h as f64 - start_y as f64).max(0.0),
        grid,
    )?;
    let mut buf = PixelBuffer::filled(canvas_w as usize, canvas_h as usize, &WHITE)?;
    for i in 0..grid.rows {
        for j in 0..grid.cols {
            if (i + j) % 2 != 0 {
                continue;
            }
            fill_cell(&mut buf, &cells.col_span(j), &cells.row_span(i), &BLACK);
        }
    }
    debug!(
        "pattern: full canvas {}x{} grid {}x{} start ({}, {})",
        canvas_w, canvas_h, grid.cols, grid.rows, start_x, start_y
    );
    Ok(buf)
}

/// Render the slice of a global checkerboard that one cabinet group shows.
///
/// The grid is defined over the whole `(total_w, total_h)` layout; only the
/// window `[group_x_offset, group_x_offset + group_w)` is rasterized, in
/// local group coordinates. Cells that do not intersect the window
/// horizontally are skipped.
pub fn generate_for_group(
    total_w: u32,
    total_h: u32,
    group_x_offset: u32,
    group_w: u32,
    group_h: u32,
    grid: GridSpec,
) -> CalibResult<PixelBuffer> {
    let cells = CellGrid::new(0.0, 0.0, total_w as f64, total_h as f64, grid)?;
    let mut buf = PixelBuffer::filled(group_w as usize, group_h as usize, &WHITE)?;
    let window = Span::new(0.0, group_w as f64);
    for i in 0..grid.rows {
        for j in 0..grid.cols {
            if (i + j) % 2 != 0 {
                continue;
            }
            let local_x = cells
                .col_span(j)
                .translated(group_x_offset as f64)
                .intersect(&window);
            if local_x.is_empty() {
                continue;
            }
            // Full cell height on purpose: groups share the layout height.
            fill_cell(&mut buf, &local_x, &cells.row_span(i), &BLACK);
        }
    }
    debug!(
        "pattern: group at x={} size {}x{} of layout {}x{}",
        group_x_offset, group_w, group_h, total_w, total_h
    );
    Ok(buf)
}

/// Render a group's pattern with non-emitting padding kept black.
///
/// Only the `active` region (in local group coordinates) is ever drawn; the
/// palette is inverted relative to the other modes so padding outside the
/// LED area stays black even where a cell would be foreground.
#[allow(clippy::too_many_arguments)]
pub fn generate_for_group_padded(
    total_w: u32,
    total_h: u32,
    group_x_offset: u32,
    group_y_offset: u32,
    group_w: u32,
    group_h: u32,
    active: RegionRect,
    grid: GridSpec,
) -> CalibResult<PixelBuffer> {
    let cells = CellGrid::new(0.0, 0.0, total_w as f64, total_h as f64, grid)?;
    let mut buf = PixelBuffer::filled(group_w as usize, group_h as usize, &BLACK)?;
    let active_x = active.x_span();
    let active_y = active.y_span();
    for i in 0..grid.rows {
        for j in 0..grid.cols {
            if (i + j) % 2 != 0 {
                continue;
            }
            let draw_x = cells
                .col_span(j)
                .translated(group_x_offset as f64)
                .intersect(&active_x);
            let draw_y = cells
                .row_span(i)
                .translated(group_y_offset as f64)
                .intersect(&active_y);
            if draw_x.is_empty() || draw_y.is_empty() {
                continue;
            }
            fill_cell(&mut buf, &draw_x, &draw_y, &WHITE);
        }
    }
    debug!(
        "pattern: padded group at ({}, {}) active {:?}",
        group_x_offset, group_y_offset, active
    );
    Ok(buf)
}
