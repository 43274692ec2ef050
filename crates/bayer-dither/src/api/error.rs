//! Error type for the dithering pipeline.
//!
//! The pipeline reports exactly two kinds of failure: a parameter set that
//! cannot be applied to the given source ([`DitherError::InvalidParams`]) and
//! a threshold matrix size that has no Bayer pattern
//! ([`DitherError::UnsupportedSize`]). Neither is ever replaced by a default.

use std::fmt;

/// Reason a parameter set was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParams {
    /// Fewer than two quantization levels requested.
    TooFewSteps {
        /// The rejected step count
        steps: u32,
    },
    /// Downsampling divisor of zero.
    ZeroScaleFactor,
    /// Downsampling would leave no pixels in at least one dimension.
    EmptyOutput {
        /// Source width
        width: usize,
        /// Source height
        height: usize,
        /// The rejected divisor
        scale_factor: u32,
    },
}

impl fmt::Display for InvalidParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidParams::TooFewSteps { steps } => {
                write!(f, "steps must be at least 2, got {}", steps)
            }
            InvalidParams::ZeroScaleFactor => write!(f, "scale factor must be at least 1"),
            InvalidParams::EmptyOutput {
                width,
                height,
                scale_factor,
            } => write!(
                f,
                "scale factor {} reduces {}x{} to an empty image",
                scale_factor, width, height
            ),
        }
    }
}

/// Unified error type for the bayer-dither public API.
///
/// # Example
///
/// ```
/// use bayer_dither::{get_matrix, DitherError};
///
/// let err = get_matrix(3).unwrap_err();
/// assert_eq!(err, DitherError::UnsupportedSize(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherError {
    /// The parameter set cannot be applied.
    InvalidParams(InvalidParams),
    /// Threshold matrix size outside {2, 4, 8}.
    UnsupportedSize(usize),
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::InvalidParams(reason) => write!(f, "invalid parameters: {}", reason),
            DitherError::UnsupportedSize(size) => write!(
                f,
                "unsupported matrix size {} (expected 2, 4 or 8)",
                size
            ),
        }
    }
}

impl std::error::Error for DitherError {}

impl From<InvalidParams> for DitherError {
    fn from(reason: InvalidParams) -> Self {
        DitherError::InvalidParams(reason)
    }
}
