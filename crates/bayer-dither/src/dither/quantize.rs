//! N-level quantization against a tiled threshold grid.

use crate::matrix::ThresholdGrid;
use crate::preprocess::Plane;
use crate::raster::{Channels, Raster};

/// Quantize one normalized sample to a level in `0..steps`.
///
/// `floor(v * (steps - 1) + t)`, clamped to the level range. With
/// `steps == 2` this is the classic `v + t >= 1` Bayer comparison.
#[inline]
pub fn quantize_level(v: f32, t: f32, steps: u32) -> u32 {
    let top = (steps - 1) as f32;
    (v * top + t).floor().clamp(0.0, top) as u32
}

/// 8-bit sample for a quantization level.
///
/// Computes `level * 255 / (steps - 1)` in integer arithmetic, which is the
/// floor of the normalized level scaled to 255.
#[inline]
pub fn level_to_sample(level: u32, steps: u32) -> u8 {
    (level as u64 * 255 / (steps - 1) as u64) as u8
}

/// Quantize a plane against a threshold grid of the same shape.
///
/// # Panics (debug only)
///
/// Debug-asserts that the plane and grid shapes agree.
pub fn quantize(plane: &Plane, grid: &ThresholdGrid, steps: u32) -> Raster {
    debug_assert_eq!(plane.width, grid.width(), "threshold grid width mismatch");
    debug_assert_eq!(plane.height, grid.height(), "threshold grid height mismatch");
    debug_assert_eq!(plane.channels, grid.channels(), "threshold grid channel mismatch");

    let data = plane
        .values
        .iter()
        .zip(grid.values())
        .map(|(&v, &t)| level_to_sample(quantize_level(v, t, steps), steps))
        .collect();

    let channels = if plane.channels == 3 {
        Channels::Rgb
    } else {
        Channels::Luma
    };
    Raster::from_parts(plane.width, plane.height, channels, data)
}
