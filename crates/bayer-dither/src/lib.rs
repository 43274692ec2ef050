#![allow(clippy::module_inception)]

//! bayer-dither: Ordered dithering with N-level quantization
//!
//! This library turns continuous-tone 8-bit images into reduced-palette
//! images by comparing every sample against a tiled Bayer threshold matrix.
//!
//! # Quick Start
//!
//! [`dither`] is the whole pipeline as a pure function:
//!
//! ```
//! use bayer_dither::{dither, Channels, DitherParams, Raster};
//!
//! let source = Raster::filled(64, 48, Channels::Rgb, 90).unwrap();
//! let params = DitherParams::new().scale_factor(2).matrix_size(4).steps(3);
//!
//! let out = dither(&source, &params).unwrap();
//! assert_eq!((out.width(), out.height()), (32, 24));
//! ```
//!
//! # Interactive Use
//!
//! A live preview recomputes on every parameter change but frequently asks
//! for the same result twice (redraws, resizes). [`DitherCache`] keeps the
//! last result and answers repeats without rerunning the pipeline:
//!
//! ```
//! use std::sync::Arc;
//! use bayer_dither::{Channels, DitherCache, DitherParams, Raster};
//!
//! let source = Arc::new(Raster::filled(16, 16, Channels::Luma, 40).unwrap());
//! let mut cache = DitherCache::new();
//!
//! cache.get_or_compute(&source, &DitherParams::new()).unwrap();
//! assert!(cache.is_cached(&source, &DitherParams::new()));
//! ```
//!
//! # Parameters
//!
//! | Field | Range | Effect |
//! |-------|-------|--------|
//! | `scale_factor` | >= 1 | downsample divisor applied before dithering |
//! | `matrix_size` | 2, 4, 8 | Bayer matrix side |
//! | `color` | bool | dither R, G, B independently instead of luminance |
//! | `steps` | >= 2 | output levels per channel |
//!
//! Out-of-range values are reported as [`DitherError`], never replaced with
//! defaults.
//!
//! ## Quantization
//!
//! A normalized sample `v` with threshold `t` maps to level
//! `floor(v * (steps - 1) + t)`, clamped to `0..steps`. For two steps that is
//! the textbook rule "white when `v + t >= 1`". The level is written back as
//! `level * 255 / (steps - 1)` in integer arithmetic, so the levels of a
//! given step count are always the same bytes.

pub mod api;
pub mod dither;
pub mod matrix;
pub mod preprocess;
pub mod raster;


pub use api::{CacheStats, DitherCache, DitherError, InvalidParams};
pub use dither::{dither, DitherParams};
pub use matrix::{get_matrix, tile, BayerSize, ThresholdGrid, ThresholdMatrix};
pub use preprocess::{resize_bilinear, resize_nearest};
pub use raster::{Channels, Raster, RasterError};
