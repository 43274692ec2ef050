//! Raster types
//!
//! This module provides the 8-bit pixel grid that flows in and out of the
//! dithering engine, along with its construction error type.

mod error;
mod raster;

pub use error::RasterError;
pub use raster::{Channels, Raster};
