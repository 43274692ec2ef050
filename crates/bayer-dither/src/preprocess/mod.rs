//! Image preprocessing ahead of quantization.
//!
//! Two stages run before the threshold comparison:
//!
//! 1. **Resize** ([`resize_bilinear`]): downsample by the scale factor.
//! 2. **Normalize** ([`normalize`], [`match_channels`]): convert 8-bit
//!    samples to `[0, 1]` floats and settle on one or three channels.
//!
//! [`resize_nearest`] is the blocky counterpart used to scale dithered
//! output back up without smoothing the pattern away.

mod normalize;
mod resize;

pub use normalize::{match_channels, normalize, Plane};
pub use resize::{downscaled_extent, resize_bilinear, resize_nearest};
