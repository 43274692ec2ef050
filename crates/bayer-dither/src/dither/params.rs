//! Dithering parameters.
//!
//! This module provides the [`DitherParams`] value object that fully
//! determines the output of [`dither`](super::dither) for a given source.

use crate::api::{DitherError, InvalidParams};
use crate::matrix::BayerSize;

/// Parameter set for ordered dithering.
///
/// A plain `Copy` value: callers replace it wholesale on every change and the
/// engine only ever sees a snapshot. Equality and hashing cover every field,
/// which makes it usable as a cache key.
///
/// # Defaults
///
/// - Scale factor: 2
/// - Matrix size: 2 (Bayer 2x2)
/// - Color: off (luminance)
/// - Steps: 2 (1-bit output)
///
/// # Example
///
/// ```
/// use bayer_dither::DitherParams;
///
/// let params = DitherParams::new()
///     .scale_factor(1)
///     .matrix_size(4)
///     .steps(4);
///
/// assert!(params.validate().is_ok());
/// assert!(params.steps(1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DitherParams {
    /// Downsampling divisor applied before dithering. Must be at least 1.
    pub scale_factor: u32,

    /// Side of the Bayer matrix. Must be 2, 4 or 8.
    pub matrix_size: usize,

    /// Dither R, G and B independently instead of a single luminance channel.
    pub color: bool,

    /// Number of quantization levels per channel. Must be at least 2.
    pub steps: u32,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self {
            scale_factor: 2,
            matrix_size: BayerSize::Two.as_usize(),
            color: false,
            steps: 2,
        }
    }
}

impl DitherParams {
    /// Create parameters with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the downsampling divisor.
    #[inline]
    pub fn scale_factor(mut self, factor: u32) -> Self {
        self.scale_factor = factor;
        self
    }

    /// Set the Bayer matrix side.
    #[inline]
    pub fn matrix_size(mut self, size: usize) -> Self {
        self.matrix_size = size;
        self
    }

    /// Enable or disable per-channel color dithering.
    #[inline]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Set the number of quantization levels.
    #[inline]
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Number of output channels these parameters produce.
    #[inline]
    pub fn output_channels(&self) -> usize {
        if self.color {
            3
        } else {
            1
        }
    }

    /// Check the parameters independently of any source image.
    ///
    /// # Errors
    ///
    /// - [`InvalidParams::TooFewSteps`] if `steps < 2`
    /// - [`InvalidParams::ZeroScaleFactor`] if `scale_factor < 1`
    /// - [`DitherError::UnsupportedSize`] if `matrix_size` is not 2, 4 or 8
    pub fn validate(&self) -> Result<(), DitherError> {
        if self.steps < 2 {
            return Err(InvalidParams::TooFewSteps { steps: self.steps }.into());
        }
        if self.scale_factor < 1 {
            return Err(InvalidParams::ZeroScaleFactor.into());
        }
        BayerSize::try_from(self.matrix_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let params = DitherParams::default();
        assert_eq!(params.scale_factor, 2);
        assert_eq!(params.matrix_size, 2);
        assert!(!params.color);
        assert_eq!(params.steps, 2);
        assert_eq!(params, DitherParams::new());
    }

    #[test]
    fn test_builder_chaining() {
        let params = DitherParams::new()
            .scale_factor(5)
            .matrix_size(8)
            .color(true)
            .steps(16);

        assert_eq!(params.scale_factor, 5);
        assert_eq!(params.matrix_size, 8);
        assert!(params.color);
        assert_eq!(params.steps, 16);
        assert_eq!(params.output_channels(), 3);
    }

    #[test]
    fn test_validate_rejects_each_field() {
        assert_eq!(
            DitherParams::new().steps(1).validate(),
            Err(DitherError::InvalidParams(InvalidParams::TooFewSteps { steps: 1 }))
        );
        assert_eq!(
            DitherParams::new().scale_factor(0).validate(),
            Err(DitherError::InvalidParams(InvalidParams::ZeroScaleFactor))
        );
        assert_eq!(
            DitherParams::new().matrix_size(3).validate(),
            Err(DitherError::UnsupportedSize(3))
        );
    }

    #[test]
    fn test_validate_accepts_supported_sizes() {
        for size in [2, 4, 8] {
            assert!(DitherParams::new().matrix_size(size).validate().is_ok());
        }
    }
}
