//! Normalization to `[0, 1]` floats and channel reduction.

use crate::raster::Raster;

/// Largest representable 8-bit sample.
const SAMPLE_MAX: f32 = 255.0;

/// A floating-point image plane with samples in `[0, 1]`.
///
/// Same layout as [`Raster`]: row-major, channels interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Samples per pixel (1 or 3).
    pub channels: usize,
    /// Normalized samples.
    pub values: Vec<f32>,
}

/// Convert every 8-bit sample to `sample / 255`.
pub fn normalize(raster: &Raster) -> Plane {
    Plane {
        width: raster.width(),
        height: raster.height(),
        channels: raster.channels().count(),
        values: raster
            .data()
            .iter()
            .map(|&v| v as f32 / SAMPLE_MAX)
            .collect(),
    }
}

/// Settle a plane on the channel count the color mode requires.
///
/// - `color == false`: multi-channel planes collapse to the per-pixel mean.
/// - `color == true`: single-channel planes broadcast to three channels.
///
/// Planes that already match are returned as they are.
pub fn match_channels(plane: Plane, color: bool) -> Plane {
    match (color, plane.channels) {
        (false, 1) | (true, 3) => plane,
        (false, n) => {
            let values = plane
                .values
                .chunks_exact(n)
                .map(|px| px.iter().sum::<f32>() / n as f32)
                .collect();
            Plane {
                channels: 1,
                values,
                ..plane
            }
        }
        (true, _) => {
            let values = plane.values.iter().flat_map(|&v| [v, v, v]).collect();
            Plane {
                channels: 3,
                values,
                ..plane
            }
        }
    }
}
