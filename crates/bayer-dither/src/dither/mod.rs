//! Ordered dithering with N-level quantization.
//!
//! [`dither`] is the whole engine: a pure function from a source raster and
//! a [`DitherParams`] snapshot to a new raster. It runs these stages:
//!
//! ```text
//! 8-bit source
//!     |
//!     v
//! [downsample]      bilinear, floor(w / scale) x floor(h / scale)
//!     |
//!     v
//! [normalize]       sample / 255 -> f32 in [0, 1]
//!     |
//!     v
//! [channels]        mean to 1 channel, or broadcast to 3
//!     |
//!     v
//! [quantize]        floor(v * (steps - 1) + t), t from the tiled matrix
//!     |
//!     v
//! 8-bit output      level * 255 / (steps - 1)
//! ```
//!
//! # Example
//!
//! ```
//! use bayer_dither::{dither, Channels, DitherParams, Raster};
//!
//! let source = Raster::filled(4, 4, Channels::Luma, 128).unwrap();
//! let params = DitherParams::new().scale_factor(1);
//!
//! let out = dither(&source, &params).unwrap();
//! assert_eq!(&out.data()[..4], &[0, 255, 0, 255]);
//! ```

mod params;
mod quantize;

pub use params::DitherParams;
pub use quantize::{level_to_sample, quantize, quantize_level};

use crate::api::DitherError;
use crate::matrix::{get_matrix, tile};
use crate::preprocess::{downscaled_extent, match_channels, normalize, resize_bilinear};
use crate::raster::Raster;

/// Dither `source` with `params`.
///
/// The source is never modified. Parameters are validated up front, so no
/// work is done for a set that would fail.
///
/// # Errors
///
/// - [`DitherError::InvalidParams`] for `steps < 2`, `scale_factor < 1`, or
///   a scale factor that leaves no pixels
/// - [`DitherError::UnsupportedSize`] for a matrix size other than 2, 4 or 8
pub fn dither(source: &Raster, params: &DitherParams) -> Result<Raster, DitherError> {
    params.validate()?;
    let matrix = get_matrix(params.matrix_size)?;
    let (width, height) = downscaled_extent(source.width(), source.height(), params.scale_factor)?;

    let small = resize_bilinear(source, width, height);
    let plane = match_channels(normalize(&small), params.color);
    let grid = tile(&matrix, plane.width, plane.height, plane.channels);

    Ok(quantize(&plane, &grid, params.steps))
}
