//! JSON runtime configuration for the demo binaries.

use crate::curvature::EstimatorParams;
use crate::error::{CalibError, CalibResult};
use crate::geometry::GridSpec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON detection report, if anywhere.
    pub json_out: Option<PathBuf>,
    /// Directory receiving annotated debug snapshots.
    pub debug_dir: Option<PathBuf>,
    /// Where to write the flattened capture, if anywhere.
    pub flattened_out: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    /// Expected corner lattice of the displayed pattern.
    pub grid: GridSpec,
    /// Physical pixel pitch of the wall, millimeters. When present the
    /// estimated radius is also reported in meters.
    #[serde(default)]
    pub pixel_pitch_mm: Option<f64>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub estimator: EstimatorParams,
}

pub fn load_config(path: &Path) -> CalibResult<RuntimeConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalibError::Io(format!("failed to read config {}: {e}", path.display())))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| CalibError::Io(format!("failed to parse config {}: {e}", path.display())))?;
    if config.grid.cols == 0 || config.grid.rows == 0 {
        return Err(CalibError::InvalidParameter("cols and rows must be >= 1"));
    }
    Ok(config)
}
