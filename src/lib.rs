#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod curvature;
pub mod error;
pub mod field;
pub mod geometry;
pub mod image;
pub mod pattern;
pub mod snapshot;
pub mod units;
pub mod warp;

// Expert modules – public, but considered unstable internals.
pub mod config;
pub mod detect;

// --- High-level re-exports -------------------------------------------------

pub use crate::curvature::{CurvatureEstimate, CurvatureEstimator, EstimatorParams};
pub use crate::error::{CalibError, CalibResult};
pub use crate::geometry::{GridSpec, RegionRect};
pub use crate::image::{ImageF32, PixelBuffer};

// Frequently used free functions.
pub use crate::field::{deviation_field, deviation_profile};
pub use crate::units::pixel_radius_to_meters;
pub use crate::warp::{warp_curved_to_flat, warp_curved_to_flat_in_place};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use ledwall_calib::prelude::*;
///
/// # fn main() -> CalibResult<()> {
/// let grid = GridSpec::new(8, 6)?;
/// let board = pattern::generate(800, 600, grid, 0, 0)?;
/// assert_eq!(board.pixel(10, 10), &[0, 0, 0]); // cell (0,0) is foreground
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::curvature::{CurvatureEstimate, CurvatureEstimator, EstimatorParams};
    pub use crate::error::{CalibError, CalibResult};
    pub use crate::geometry::{GridSpec, RegionRect};
    pub use crate::image::{ImageF32, PixelBuffer};
    pub use crate::{field, pattern, units, warp};
}
