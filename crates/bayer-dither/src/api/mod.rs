//! Public API for the bayer-dither crate.
//!
//! This module provides [`DitherCache`], the memoizing front of the
//! pipeline, and the [`DitherError`] unified error type.

mod cache;
mod error;

pub use cache::{CacheStats, DitherCache};
pub use error::{DitherError, InvalidParams};
