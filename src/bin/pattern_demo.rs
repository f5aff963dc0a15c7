//! Render a calibration checkerboard to a PNG.
//!
//! Usage:
//!   pattern_demo full <out.png> <w> <h> <cols> <rows> [start_x start_y]
//!   pattern_demo group <out.png> <total_w> <total_h> <x_off> <group_w> <group_h> <cols> <rows>
//!   pattern_demo padded <out.png> <total_w> <total_h> <x_off> <y_off> <group_w> <group_h> \
//!                 <active_x> <active_y> <active_w> <active_h> <cols> <rows>

use ledwall_calib::geometry::{GridSpec, RegionRect};
use ledwall_calib::image::io::save_pixel_buffer;
use ledwall_calib::pattern;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (mode, rest) = args.split_first().ok_or_else(usage)?;
    let out = rest.first().ok_or_else(usage)?.clone();
    let nums: Vec<u32> = rest[1..]
        .iter()
        .map(|s| s.parse::<u32>().map_err(|e| format!("bad number {s}: {e}")))
        .collect::<Result<_, _>>()?;

    let buf = match (mode.as_str(), nums.as_slice()) {
        ("full", [w, h, cols, rows]) => {
            pattern::generate(*w, *h, grid(*cols, *rows)?, 0, 0)
        }
        ("full", [w, h, cols, rows, sx, sy]) => {
            pattern::generate(*w, *h, grid(*cols, *rows)?, *sx, *sy)
        }
        ("group", [tw, th, xoff, gw, gh, cols, rows]) => {
            pattern::generate_for_group(*tw, *th, *xoff, *gw, *gh, grid(*cols, *rows)?)
        }
        ("padded", [tw, th, xoff, yoff, gw, gh, ax, ay, aw, ah, cols, rows]) => {
            pattern::generate_for_group_padded(
                *tw,
                *th,
                *xoff,
                *yoff,
                *gw,
                *gh,
                RegionRect::new(*ax as i64, *ay as i64, *aw, *ah),
                grid(*cols, *rows)?,
            )
        }
        _ => return Err(usage()),
    }
    .map_err(|e| e.to_string())?;

    save_pixel_buffer(&buf, Path::new(&out)).map_err(|e| e.to_string())?;
    println!("wrote {}x{} pattern to {out}", buf.w, buf.h);
    Ok(())
}

fn grid(cols: u32, rows: u32) -> Result<GridSpec, String> {
    GridSpec::new(cols, rows).map_err(|e| e.to_string())
}

fn usage() -> String {
    "usage: pattern_demo full|group|padded <out.png> <dims...> (see module docs)".to_string()
}
