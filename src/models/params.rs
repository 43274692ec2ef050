use bayer_dither::{BayerSize, DitherParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

use crate::error::AppError;

/// User-facing parameter set.
///
/// Carries the four dither parameters plus the export-only upscale switch.
/// Shared by the YAML config, the watch-mode params file, the HTTP query
/// string and the CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ParamSet {
    /// Downsample divisor applied before dithering
    pub scale_factor: u32,
    /// Bayer matrix side (2, 4 or 8)
    pub matrix_size: usize,
    /// Dither each RGB channel independently
    pub color: bool,
    /// Quantization levels per channel
    pub steps: u32,
    /// Scale exports back up to the source dimensions (nearest neighbour)
    pub upscale_on_export: bool,
}

impl Default for ParamSet {
    fn default() -> Self {
        let d = DitherParams::default();
        Self {
            scale_factor: d.scale_factor,
            matrix_size: d.matrix_size,
            color: d.color,
            steps: d.steps,
            upscale_on_export: false,
        }
    }
}

impl ParamSet {
    /// The subset the dither engine consumes.
    pub fn dither_params(&self) -> DitherParams {
        DitherParams::new()
            .scale_factor(self.scale_factor)
            .matrix_size(self.matrix_size)
            .color(self.color)
            .steps(self.steps)
    }

    /// Human readable matrix name, or the raw size if unsupported.
    pub fn matrix_label(&self) -> String {
        BayerSize::try_from(self.matrix_size)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|_| format!("{}x{}", self.matrix_size, self.matrix_size))
    }

    /// Load a parameter file (YAML). Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }
}

/// Partial parameter update, e.g. from a query string.
///
/// Fields left out keep the value of the set the update is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ParamUpdate {
    pub scale_factor: Option<u32>,
    pub matrix_size: Option<usize>,
    pub color: Option<bool>,
    pub steps: Option<u32>,
    pub upscale_on_export: Option<bool>,
}

impl ParamUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: ParamSet) -> ParamSet {
        ParamSet {
            scale_factor: self.scale_factor.unwrap_or(base.scale_factor),
            matrix_size: self.matrix_size.unwrap_or(base.matrix_size),
            color: self.color.unwrap_or(base.color),
            steps: self.steps.unwrap_or(base.steps),
            upscale_on_export: self.upscale_on_export.unwrap_or(base.upscale_on_export),
        }
    }
}
