//! Image file decoding and encoding.
//!
//! Decoding goes through the `image` crate. PNG output is written with the
//! `png` crate so luma images can use the smallest bit depth that holds all
//! their levels, then re-compressed with oxipng.

use bayer_dither::{Channels, Raster};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use crate::error::CodecError;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| CodecError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(CodecError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decode an image file into a raster.
pub fn decode_file(path: &Path) -> Result<Raster, CodecError> {
    let bytes = std::fs::read(path)?;
    let raster = decode_bytes(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        channels = ?raster.channels(),
        "Decoded image"
    );
    Ok(raster)
}

/// Decode an in-memory image.
///
/// Greyscale images (with or without alpha) become luma rasters; everything
/// else becomes RGB. Alpha is discarded. Color images whose pixels are all
/// neutral (palette PNGs holding only greys) also decode to luma.
pub fn decode_bytes(bytes: &[u8]) -> Result<Raster, CodecError> {
    let img = image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);

    let (channels, data) = if img.color().has_color() {
        let rgb = img.into_rgb8().into_raw();
        if rgb.chunks_exact(3).all(|p| p[0] == p[1] && p[1] == p[2]) {
            (Channels::Luma, rgb.chunks_exact(3).map(|p| p[0]).collect())
        } else {
            (Channels::Rgb, rgb)
        }
    } else {
        (Channels::Luma, img.into_luma8().into_raw())
    };

    Raster::new(width, height, channels, data).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode with the default JPEG quality.
pub fn encode(raster: &Raster, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
    encode_with_quality(raster, format, DEFAULT_JPEG_QUALITY)
}

/// Encode a raster. `jpeg_quality` is ignored for PNG.
pub fn encode_with_quality(
    raster: &Raster,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, CodecError> {
    match format {
        ImageFormat::Png => encode_png(raster),
        ImageFormat::Jpeg => encode_jpeg(raster, jpeg_quality),
    }
}

/// Encode and write to `path`.
pub fn write_file(
    raster: &Raster,
    path: &Path,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<usize, CodecError> {
    let bytes = encode_with_quality(raster, format, jpeg_quality)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}

/// Smallest PNG grey bit depth whose levels contain every sample.
fn luma_bit_depth(samples: &[u8]) -> u8 {
    // 255 / (2^bits - 1): samples on that grid map exactly to bits-wide values
    for (bits, step) in [(1u8, 255u8), (2, 85), (4, 17)] {
        if samples.iter().all(|&v| v % step == 0) {
            return bits;
        }
    }
    8
}

fn encode_png(raster: &Raster) -> Result<Vec<u8>, CodecError> {
    let width = raster.width() as u32;
    let (color_type, bit_depth, packed) = match raster.channels() {
        Channels::Rgb => (
            png::ColorType::Rgb,
            png::BitDepth::Eight,
            raster.data().to_vec(),
        ),
        Channels::Luma => match luma_bit_depth(raster.data()) {
            8 => (
                png::ColorType::Grayscale,
                png::BitDepth::Eight,
                raster.data().to_vec(),
            ),
            bits => {
                let step = 255 / ((1u8 << bits) - 1);
                let levels: Vec<u8> = raster.data().iter().map(|&v| v / step).collect();
                let depth = match bits {
                    1 => png::BitDepth::One,
                    2 => png::BitDepth::Two,
                    _ => png::BitDepth::Four,
                };
                (png::ColorType::Grayscale, depth, pack_nbits(&levels, width, bits))
            }
        },
    };

    // Encode PNG (fast settings, oxipng re-compresses)
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, raster.height() as u32);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, CodecError> {
    let color = match raster.channels() {
        Channels::Luma => ExtendedColorType::L8,
        Channels::Rgb => ExtendedColorType::Rgb8,
    };
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(
            raster.data(),
            raster.width() as u32,
            raster.height() as u32,
            color,
        )
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(values: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = values.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in values.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &v) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (v & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn png_header(bytes: &[u8]) -> (png::ColorType, png::BitDepth) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        (info.color_type, info.bit_depth)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            "gif".parse::<ImageFormat>(),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert_eq!(
            ImageFormat::from_path(Path::new("out/photo.JPEG")).unwrap(),
            ImageFormat::Jpeg
        );
        assert!(ImageFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_luma_bit_depth_selection() {
        assert_eq!(luma_bit_depth(&[0, 255, 255]), 1);
        assert_eq!(luma_bit_depth(&[0, 85, 170, 255]), 2);
        assert_eq!(luma_bit_depth(&[0, 17, 119, 255]), 4);
        assert_eq!(luma_bit_depth(&[0, 127, 255]), 8);
    }

    #[test]
    fn test_pack_nbits() {
        // 1-bit: 10110 -> 1011_0000
        assert_eq!(pack_nbits(&[1, 0, 1, 1, 0], 5, 1), vec![0b1011_0000]);
        // 2-bit, two rows of three pixels
        assert_eq!(
            pack_nbits(&[3, 0, 1, 2, 2, 2], 3, 2),
            vec![0b1100_0100, 0b1010_1000]
        );
        // 4-bit
        assert_eq!(pack_nbits(&[0xA, 0x5, 0xF], 3, 4), vec![0xA5, 0xF0]);
    }

    #[test]
    fn test_png_luma_round_trip_at_one_bit() {
        let raster = Raster::new(5, 2, Channels::Luma, vec![0, 255, 0, 255, 255, 255, 0, 0, 255, 0])
            .unwrap();
        let bytes = encode(&raster, ImageFormat::Png).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let (color, depth) = png_header(&bytes);
        assert_eq!(color, png::ColorType::Grayscale);
        assert!(depth == png::BitDepth::One, "expected 1-bit, got {depth:?}");
        assert_eq!(decode_bytes(&bytes).unwrap(), raster);
    }

    #[test]
    fn test_png_luma_round_trip_multi_level() {
        let raster =
            Raster::new(4, 1, Channels::Luma, vec![0, 85, 170, 255]).unwrap();
        let bytes = encode(&raster, ImageFormat::Png).unwrap();
        assert_eq!(decode_bytes(&bytes).unwrap(), raster);

        let raster = Raster::new(3, 1, Channels::Luma, vec![0, 127, 255]).unwrap();
        let bytes = encode(&raster, ImageFormat::Png).unwrap();
        assert_eq!(decode_bytes(&bytes).unwrap(), raster);
    }

    #[test]
    fn test_png_rgb_round_trip() {
        let raster = Raster::new(2, 2, Channels::Rgb, vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 10, 20, 30,
        ])
        .unwrap();
        let bytes = encode(&raster, ImageFormat::Png).unwrap();
        assert_eq!(decode_bytes(&bytes).unwrap(), raster);
    }

    #[test]
    fn test_jpeg_encodes_and_decodes() {
        let raster = Raster::filled(16, 16, Channels::Rgb, 200).unwrap();
        let bytes = encode_with_quality(&raster, ImageFormat::Jpeg, 95).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
        // JPEG is lossy but a flat image survives almost exactly
        assert!(decoded.data().iter().all(|&v| v.abs_diff(200) <= 3));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_bytes(b"definitely not an image"),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_write_and_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let raster = Raster::filled(3, 3, Channels::Luma, 255).unwrap();

        let written = write_file(&raster, &path, ImageFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(written as u64, std::fs::metadata(&path).unwrap().len());
        assert_eq!(decode_file(&path).unwrap(), raster);
    }
}
