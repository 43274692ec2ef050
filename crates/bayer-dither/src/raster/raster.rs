//! The 8-bit raster type.

use super::error::RasterError;

/// Channel layout of a [`Raster`].
///
/// Every pixel of a raster has the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Single luminance channel.
    Luma,
    /// Three interleaved channels in R, G, B order.
    Rgb,
}

impl Channels {
    /// Number of samples per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Luma => 1,
            Channels::Rgb => 3,
        }
    }
}

/// A rectangular grid of 8-bit samples.
///
/// Samples are stored row-major with channels interleaved, so the sample for
/// channel `c` of pixel `(x, y)` lives at `(y * width + x) * channels + c`.
///
/// A raster always has positive dimensions and a buffer of exactly
/// `width * height * channels` samples.
///
/// # Example
///
/// ```
/// use bayer_dither::{Channels, Raster};
///
/// let raster = Raster::new(2, 1, Channels::Rgb, vec![255, 0, 0, 0, 0, 255]).unwrap();
/// assert_eq!(raster.pixel(1, 0), &[0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<u8>,
}

impl Raster {
    /// Create a raster from an interleaved sample buffer.
    ///
    /// # Errors
    ///
    /// - [`RasterError::ZeroDimension`] if `width` or `height` is zero
    /// - [`RasterError::LengthMismatch`] if `data` has the wrong length
    pub fn new(
        width: usize,
        height: usize,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimension { width, height });
        }
        let expected = width * height * channels.count();
        if data.len() != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create a raster with every sample set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        channels: Channels,
        value: u8,
    ) -> Result<Self, RasterError> {
        Self::new(
            width,
            height,
            channels,
            vec![value; width * height * channels.count()],
        )
    }

    /// Internal constructor for buffers whose shape is already known to be valid.
    pub(crate) fn from_parts(width: usize, height: usize, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert!(width > 0 && height > 0, "raster dimensions must be positive");
        debug_assert_eq!(
            data.len(),
            width * height * channels.count(),
            "sample buffer ({}) must match {}x{}x{}",
            data.len(),
            width,
            height,
            channels.count(),
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

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

    /// Channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Interleaved samples, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let n = self.channels.count();
        let start = (y * self.width + x) * n;
        &self.data[start..start + n]
    }

    /// Single sample at `(x, y)` for channel `c`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[(y * self.width + x) * self.channels.count() + c]
    }

    /// Collapse to a single luminance channel by averaging R, G and B.
    ///
    /// Luma rasters are returned unchanged.
    pub fn to_luma(&self) -> Raster {
        match self.channels {
            Channels::Luma => self.clone(),
            Channels::Rgb => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16 + 1) / 3) as u8)
                    .collect();
                Raster::from_parts(self.width, self.height, Channels::Luma, data)
            }
        }
    }

    /// Broadcast to three identical channels.
    ///
    /// RGB rasters are returned unchanged.
    pub fn to_rgb(&self) -> Raster {
        match self.channels {
            Channels::Rgb => self.clone(),
            Channels::Luma => {
                let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
                Raster::from_parts(self.width, self.height, Channels::Rgb, data)
            }
        }
    }

    /// Number of distinct sample values across all channels.
    pub fn distinct_samples(&self) -> usize {
        let mut seen = [false; 256];
        for &v in &self.data {
            seen[v as usize] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }
}
