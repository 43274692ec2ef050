//! Error types for raster construction

use std::fmt;

/// Error type for raster construction.
///
/// Returned when the dimensions or the sample buffer handed to
/// [`Raster::new`](super::Raster::new) violate the raster invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero
    ZeroDimension {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Sample buffer length does not equal `width * height * channels`
    LengthMismatch {
        /// Expected number of samples
        expected: usize,
        /// Number of samples provided
        actual: usize,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::ZeroDimension { width, height } => {
                write!(f, "raster dimensions must be positive, got {}x{}", width, height)
            }
            RasterError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "raster sample count mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for RasterError {}
