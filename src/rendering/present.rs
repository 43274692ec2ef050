//! Presentation scaling for previews.
//!
//! Fitting a dithered image into a preview frame uses bilinear resampling,
//! which softens the pattern like the on-screen preview always did. Zooming
//! uses nearest neighbour so every dithered pixel stays a crisp block.

use bayer_dither::{resize_bilinear, resize_nearest, Raster};

/// Largest extent with the source aspect ratio that fits in the frame.
///
/// The constrained side takes the frame size; the other side is truncated.
/// Both sides are at least 1.
pub fn fit_within(
    src_width: usize,
    src_height: usize,
    frame_width: usize,
    frame_height: usize,
) -> (usize, usize) {
    let (sw, sh) = (src_width.max(1), src_height.max(1));
    let (fw, fh) = (frame_width.max(1), frame_height.max(1));

    // sw/sh > fw/fh, cross-multiplied
    if sw * fh > fw * sh {
        (fw, (fw * sh / sw).max(1))
    } else {
        ((fh * sw / sh).max(1), fh)
    }
}

/// Scale a raster to fit a `frame_width x frame_height` frame.
pub fn fit_to_frame(raster: &Raster, frame_width: usize, frame_height: usize) -> Raster {
    let (w, h) = fit_within(raster.width(), raster.height(), frame_width, frame_height);
    resize_bilinear(raster, w, h)
}

/// Enlarge by an integer factor with nearest-neighbour sampling.
///
/// Factors of 0 and 1 return the raster unchanged.
pub fn zoom(raster: &Raster, factor: u32) -> Raster {
    if factor <= 1 {
        return raster.clone();
    }
    let f = factor as usize;
    resize_nearest(raster, raster.width() * f, raster.height() * f)
}
