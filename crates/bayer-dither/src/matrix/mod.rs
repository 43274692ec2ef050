//! Ordered-dithering threshold matrices.
//!
//! This module is the leaf of the pipeline: it hands out the canonical Bayer
//! matrix for a supported size and tiles it across an arbitrary extent.
//!
//! # Example
//!
//! ```
//! use bayer_dither::{get_matrix, tile};
//!
//! let matrix = get_matrix(2).unwrap();
//! assert_eq!(matrix.get(0, 1), 0.5);
//!
//! let grid = tile(&matrix, 5, 3, 1);
//! assert_eq!(grid.get(4, 2, 0), matrix.get(0, 0));
//! ```

mod bayer;
mod tile;

pub use bayer::{get_matrix, BayerSize, ThresholdMatrix};
pub use tile::{tile, ThresholdGrid};
