//! Resampling through `image::imageops`.
//!
//! Downsampling uses the triangle (bilinear) filter, whose support widens
//! with the reduction so every source pixel contributes to the result.
//! Upscaling dithered output uses nearest neighbour to keep the pattern
//! crisp.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb};

use crate::api::{DitherError, InvalidParams};
use crate::raster::{Channels, Raster};

/// Extent after dividing by `scale_factor` (floor division).
///
/// A divisor of 0 leaves no pixels; [`DitherParams::validate`] reports it
/// as [`InvalidParams::ZeroScaleFactor`] before this is reached.
///
/// [`DitherParams::validate`]: crate::DitherParams::validate
///
/// # Errors
///
/// [`InvalidParams::EmptyOutput`] if either dimension would become 0
pub fn downscaled_extent(
    width: usize,
    height: usize,
    scale_factor: u32,
) -> Result<(usize, usize), DitherError> {
    let divisor = scale_factor as usize;
    let w = width.checked_div(divisor).unwrap_or(0);
    let h = height.checked_div(divisor).unwrap_or(0);
    if w == 0 || h == 0 {
        return Err(InvalidParams::EmptyOutput {
            width,
            height,
            scale_factor,
        }
        .into());
    }
    Ok((w, h))
}

fn resample(raster: &Raster, new_width: usize, new_height: usize, filter: FilterType) -> Raster {
    assert!(
        new_width > 0 && new_height > 0,
        "resize to empty extent {}x{}",
        new_width,
        new_height
    );
    if raster.width() == new_width && raster.height() == new_height {
        return raster.clone();
    }

    let (w, h) = (raster.width() as u32, raster.height() as u32);
    let (nw, nh) = (new_width as u32, new_height as u32);
    let data = match raster.channels() {
        Channels::Luma => {
            let img = ImageBuffer::from_fn(w, h, |x, y| {
                Luma([raster.sample(x as usize, y as usize, 0)])
            });
            imageops::resize(&img, nw, nh, filter).into_raw()
        }
        Channels::Rgb => {
            let img = ImageBuffer::from_fn(w, h, |x, y| {
                let p = raster.pixel(x as usize, y as usize);
                Rgb([p[0], p[1], p[2]])
            });
            imageops::resize(&img, nw, nh, filter).into_raw()
        }
    };

    Raster::from_parts(new_width, new_height, raster.channels(), data)
}

/// Resize with the triangle (bilinear) filter.
///
/// Returns a copy when the extent is unchanged, so a scale factor of 1 is an
/// exact identity. Results are rounded to the nearest 8-bit value.
///
/// # Panics
///
/// Panics if `new_width` or `new_height` is zero.
pub fn resize_bilinear(raster: &Raster, new_width: usize, new_height: usize) -> Raster {
    resample(raster, new_width, new_height, FilterType::Triangle)
}

/// Resize by picking the source pixel under each destination pixel center.
/// Integer upscales turn every pixel into a solid block.
///
/// # Panics
///
/// Panics if `new_width` or `new_height` is zero.
pub fn resize_nearest(raster: &Raster, new_width: usize, new_height: usize) -> Raster {
    resample(raster, new_width, new_height, FilterType::Nearest)
}
