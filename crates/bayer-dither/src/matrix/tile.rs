//! Tiling a threshold matrix across an image extent.

use super::bayer::ThresholdMatrix;

/// A threshold matrix replicated over a `width x height` extent.
///
/// Laid out like a raster: row-major, channels interleaved. Every channel of
/// a pixel carries the same threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdGrid {
    width: usize,
    height: usize,
    channels: usize,
    values: Vec<f32>,
}

impl ThresholdGrid {
    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channel copies.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All thresholds in raster order.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Threshold at `(x, y)` for channel `c`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.values[(y * self.width + x) * self.channels + c]
    }
}

/// Replicate `matrix` over `width x height`, stacked `channels` times.
///
/// Positions wrap modulo the matrix size, so extents that are not a
/// multiple of the matrix side are covered without padding or clamping:
/// `grid[y][x][c] == matrix[y % n][x % n]`.
///
/// A `channels` value of 0 is treated as 1.
pub fn tile(matrix: &ThresholdMatrix, width: usize, height: usize, channels: usize) -> ThresholdGrid {
    let channels = channels.max(1);
    let n = matrix.size();
    let mut values = Vec::with_capacity(width * height * channels);

    for y in 0..height {
        let row = y % n;
        for x in 0..width {
            let t = matrix.get(row, x % n);
            values.extend(std::iter::repeat(t).take(channels));
        }
    }

    ThresholdGrid {
        width,
        height,
        channels,
        values,
    }
}
