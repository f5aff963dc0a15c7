//! Closed set of failure reasons used across the calibration core.
//!
//! The core never signals failure through sentinel values; every fallible
//! operation returns `Result<_, CalibError>` so callers can distinguish a
//! missing grid from a bad parameter without probing magic floats.

use std::fmt;

/// Failure reasons surfaced by the calibration pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalibError {
    /// A caller-supplied parameter is out of its valid domain.
    InvalidParameter(&'static str),
    /// The input buffer has zero area.
    EmptyInput,
    /// Corner detection could not assemble the expected feature grid.
    GridNotFound,
    /// Every fitted row was numerically flat; no curvature radius exists.
    DegenerateFit,
    /// An I/O collaborator (file load/save) failed.
    Io(String),
}

impl fmt::Display for CalibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(what) => write!(f, "invalid parameter: {what}"),
            Self::EmptyInput => write!(f, "input buffer is empty"),
            Self::GridNotFound => write!(f, "corner grid not found in image"),
            Self::DegenerateFit => write!(f, "all rows fitted flat; curvature undefined"),
            Self::Io(msg) => write!(f, "i/o failure: {msg}"),
        }
    }
}

impl std::error::Error for CalibError {}

/// Convenience alias used throughout the crate.
pub type CalibResult<T> = Result<T, CalibError>;
