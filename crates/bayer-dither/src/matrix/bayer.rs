//! Canonical Bayer threshold matrices.
//!
//! The rank tables are fixed constants. A matrix of side `n` holds every rank
//! `0..n²` exactly once; dividing by `n²` yields thresholds in `[0, 1)`.

use crate::api::DitherError;

const BAYER_2: [u8; 4] = [
    0, 2, //
    3, 1,
];

const BAYER_4: [u8; 16] = [
    0, 8, 2, 10, //
    12, 4, 14, 6, //
    3, 11, 1, 9, //
    15, 7, 13, 5,
];

const BAYER_8: [u8; 64] = [
    0, 48, 12, 60, 3, 51, 15, 63, //
    32, 16, 44, 28, 35, 19, 47, 31, //
    8, 56, 4, 52, 11, 59, 7, 55, //
    40, 24, 36, 20, 43, 27, 39, 23, //
    2, 50, 14, 62, 1, 49, 13, 61, //
    34, 18, 46, 30, 33, 17, 45, 29, //
    10, 58, 6, 54, 9, 57, 5, 53, //
    42, 26, 38, 22, 41, 25, 37, 21,
];

/// Supported Bayer matrix sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BayerSize {
    /// 2x2 matrix, 4 threshold levels.
    #[default]
    Two,
    /// 4x4 matrix, 16 threshold levels.
    Four,
    /// 8x8 matrix, 64 threshold levels.
    Eight,
}

impl BayerSize {
    /// All supported sizes, smallest first.
    pub const ALL: [BayerSize; 3] = [BayerSize::Two, BayerSize::Four, BayerSize::Eight];

    /// Side length of the matrix.
    #[inline]
    pub fn as_usize(self) -> usize {
        match self {
            BayerSize::Two => 2,
            BayerSize::Four => 4,
            BayerSize::Eight => 8,
        }
    }

    /// Human readable name, e.g. `"Bayer 4x4"`.
    pub fn label(self) -> &'static str {
        match self {
            BayerSize::Two => "Bayer 2x2",
            BayerSize::Four => "Bayer 4x4",
            BayerSize::Eight => "Bayer 8x8",
        }
    }

    fn ranks(self) -> &'static [u8] {
        match self {
            BayerSize::Two => &BAYER_2,
            BayerSize::Four => &BAYER_4,
            BayerSize::Eight => &BAYER_8,
        }
    }
}

impl TryFrom<usize> for BayerSize {
    type Error = DitherError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            2 => Ok(BayerSize::Two),
            4 => Ok(BayerSize::Four),
            8 => Ok(BayerSize::Eight),
            other => Err(DitherError::UnsupportedSize(other)),
        }
    }
}

/// A normalized square Bayer threshold matrix.
///
/// Cheap to copy: it borrows one of the static rank tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdMatrix {
    size: BayerSize,
    ranks: &'static [u8],
}

impl ThresholdMatrix {
    /// The canonical matrix for a supported size.
    pub fn new(size: BayerSize) -> Self {
        Self {
            size,
            ranks: size.ranks(),
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size.as_usize()
    }

    /// Integer ranks, row-major, before normalization.
    #[inline]
    pub fn ranks(&self) -> &'static [u8] {
        self.ranks
    }

    /// Normalized threshold at `(row, col)`, in `[0, 1)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        let n = self.size();
        self.ranks[row * n + col] as f32 / (n * n) as f32
    }
}

/// Look up the Bayer matrix for `size`.
///
/// # Errors
///
/// Returns [`DitherError::UnsupportedSize`] unless `size` is 2, 4 or 8.
pub fn get_matrix(size: usize) -> Result<ThresholdMatrix, DitherError> {
    BayerSize::try_from(size).map(ThresholdMatrix::new)
}
