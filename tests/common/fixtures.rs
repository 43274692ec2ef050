//! Test fixtures.

use bayer_dither::{Channels, Raster};

/// Horizontal luma ramp from black to white
pub fn gradient(width: usize, height: usize) -> Raster {
    let denom = (width.max(2) - 1) as f64;
    let data = (0..height)
        .flat_map(|_| (0..width).map(move |x| (x as f64 * 255.0 / denom).round() as u8))
        .collect();
    Raster::new(width, height, Channels::Luma, data).expect("valid gradient")
}

/// Uniform grey raster
pub fn grey(width: usize, height: usize, value: u8) -> Raster {
    Raster::filled(width, height, Channels::Luma, value).expect("valid grey raster")
}

/// RGB raster with a different color in each quadrant
pub fn quadrants(size: usize) -> Raster {
    let half = size / 2;
    let mut data = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let px: [u8; 3] = match (x < half, y < half) {
                (true, true) => [255, 0, 0],
                (false, true) => [0, 255, 0],
                (true, false) => [0, 0, 255],
                (false, false) => [255, 255, 255],
            };
            data.extend_from_slice(&px);
        }
    }
    Raster::new(size, size, Channels::Rgb, data).expect("valid quadrant raster")
}
