//! Checkerboard parity and region-clipping properties of the generators.

use ledwall_calib::geometry::{GridSpec, RegionRect};
use ledwall_calib::pattern;

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// Sample the center pixel of cell (i, j) for a full-canvas pattern.
fn cell_center(w: u32, h: u32, cols: u32, rows: u32, i: u32, j: u32) -> (usize, usize) {
    let cw = w as f64 / cols as f64;
    let ch = h as f64 / rows as f64;
    (
        ((j as f64 + 0.5) * cw) as usize,
        ((i as f64 + 0.5) * ch) as usize,
    )
}

#[test]
fn full_canvas_parity_at_cell_centers() {
    let grid = GridSpec::new(8, 8).unwrap();
    let buf = pattern::generate(800, 600, grid, 0, 0).unwrap();
    for i in 0..8 {
        for j in 0..8 {
            let (x, y) = cell_center(800, 600, 8, 8, i, j);
            let expected = if (i + j) % 2 == 0 { BLACK } else { WHITE };
            assert_eq!(buf.pixel(x, y), &expected, "cell ({i},{j})");
        }
    }
}

#[test]
fn full_canvas_boundary_scenario() {
    let grid = GridSpec::new(8, 8).unwrap();
    let buf = pattern::generate(800, 600, grid, 0, 0).unwrap();
    let (x, y) = cell_center(800, 600, 8, 8, 0, 0);
    assert_eq!(buf.pixel(x, y), &BLACK);
    let (x, y) = cell_center(800, 600, 8, 8, 0, 1);
    assert_eq!(buf.pixel(x, y), &WHITE);
    // 7 + 7 = 14 is even: the last cell is foreground again.
    let (x, y) = cell_center(800, 600, 8, 8, 7, 7);
    assert_eq!(buf.pixel(x, y), &BLACK);
}

#[test]
fn start_offset_leaves_margin_white() {
    let grid = GridSpec::new(4, 4).unwrap();
    let buf = pattern::generate(400, 400, grid, 40, 60).unwrap();
    for x in 0..40 {
        assert_eq!(buf.pixel(x, 200), &WHITE, "left margin column {x}");
    }
    for y in 0..60 {
        assert_eq!(buf.pixel(200, y), &WHITE, "top margin row {y}");
    }
    // First cell starts right at the offset.
    assert_eq!(buf.pixel(45, 65), &BLACK);
}

#[test]
fn zero_grid_dimensions_fail_fast() {
    assert!(GridSpec::new(0, 8).is_err());
    assert!(GridSpec::new(8, 0).is_err());
}

#[test]
fn group_window_matches_the_global_pattern() {
    let grid = GridSpec::new(10, 4).unwrap();
    let full = pattern::generate(1000, 400, grid, 0, 0).unwrap();
    let group = pattern::generate_for_group(1000, 400, 300, 250, 400, grid).unwrap();
    assert_eq!(group.w, 250);
    assert_eq!(group.h, 400);
    for y in 0..400usize {
        for x in 0..250usize {
            assert_eq!(
                group.pixel(x, y),
                full.pixel(x + 300, y),
                "group pixel ({x},{y}) differs from global layout"
            );
        }
    }
}

#[test]
fn group_with_no_overlap_stays_white() {
    let grid = GridSpec::new(4, 4).unwrap();
    // The group window lies wholly beyond the layout's right edge.
    let group = pattern::generate_for_group(400, 400, 600, 100, 400, grid).unwrap();
    assert!(group.data.iter().all(|&s| s == 255));
}

#[test]
fn padded_mode_draws_only_inside_active_region() {
    let grid = GridSpec::new(8, 6).unwrap();
    let active = RegionRect::new(50, 40, 200, 150);
    let buf =
        pattern::generate_for_group_padded(1600, 900, 100, 80, 300, 240, active, grid).unwrap();
    for y in 0..buf.h {
        for x in 0..buf.w {
            let inside = (50..250).contains(&(x as i64)) && (40..190).contains(&(y as i64));
            if !inside {
                assert_eq!(buf.pixel(x, y), &BLACK, "padding polluted at ({x},{y})");
            }
        }
    }
    // Something was drawn inside: the active window must contain foreground.
    let any_white = (40..190).any(|y| {
        (50..250).any(|x| buf.pixel(x as usize, y as usize) == &WHITE)
    });
    assert!(any_white);
}

#[test]
fn padded_mode_inverts_the_palette() {
    let grid = GridSpec::new(4, 4).unwrap();
    let active = RegionRect::new(0, 0, 400, 400);
    let padded =
        pattern::generate_for_group_padded(400, 400, 0, 0, 400, 400, active, grid).unwrap();
    let full = pattern::generate(400, 400, grid, 0, 0).unwrap();
    // Where the full-canvas pattern is black, the padded pattern is white.
    assert_eq!(full.pixel(50, 50), &BLACK);
    assert_eq!(padded.pixel(50, 50), &WHITE);
    assert_eq!(full.pixel(150, 50), &WHITE);
    assert_eq!(padded.pixel(150, 50), &BLACK);
}

#[test]
fn generation_is_deterministic() {
    let grid = GridSpec::new(7, 5).unwrap();
    let a = pattern::generate(640, 480, grid, 10, 20).unwrap();
    let b = pattern::generate(640, 480, grid, 10, 20).unwrap();
    assert_eq!(a, b);
}
