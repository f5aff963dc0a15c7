//! Estimate wall curvature from a captured pattern image.
//!
//! Usage: curvature_demo <config.json>
//!
//! The config names the capture, the expected corner lattice, estimator
//! parameters, the physical pixel pitch (optional, enables the meters
//! readout) and optional outputs (JSON report, debug snapshot directory,
//! flattened PNG). See `config::RuntimeConfig`.

use ledwall_calib::config::load_config;
use ledwall_calib::curvature::CurvatureEstimator;
use ledwall_calib::image::io::{load_pixel_buffer, save_pixel_buffer, write_json_file};
use ledwall_calib::snapshot::DirectorySink;
use ledwall_calib::units::pixel_radius_to_meters;
use ledwall_calib::warp::warp_curved_to_flat;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args()
        .nth(1)
        .ok_or_else(|| "usage: curvature_demo <config.json>".to_string())?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let image = load_pixel_buffer(&config.input_path).map_err(|e| e.to_string())?;

    let mut estimator = CurvatureEstimator::new(config.estimator);
    if let Some(dir) = &config.output.debug_dir {
        estimator = estimator.with_snapshot_sink(Box::new(DirectorySink::new(dir)));
    }

    let (result, report) = estimator.estimate_with_report(&image, config.grid);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report).map_err(|e| e.to_string())?;
        println!("report written to {}", path.display());
    }

    let estimate = result.map_err(|e| e.to_string())?;
    println!(
        "radius: {:.1} px over {} rows",
        estimate.radius_px, estimate.rows_used
    );
    if let Some(pitch_mm) = config.pixel_pitch_mm {
        let meters = pixel_radius_to_meters(estimate.radius_px, pitch_mm).map_err(|e| e.to_string())?;
        println!("radius at {pitch_mm} mm pitch: {meters:.3} m");
    }

    if let Some(path) = &config.output.flattened_out {
        let flat = warp_curved_to_flat(&image, estimate.radius_px).map_err(|e| e.to_string())?;
        save_pixel_buffer(&flat, path).map_err(|e| e.to_string())?;
        println!("flattened capture written to {}", path.display());
    }
    Ok(())
}
