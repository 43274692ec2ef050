use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ParamSet;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Parameters used until the user changes them
    pub defaults: ParamSet,

    /// Quiet period before a burst of change events triggers a recompute
    pub debounce_ms: u64,

    /// JPEG export quality (1-100)
    pub jpeg_quality: u8,

    /// Listen address for the preview server
    pub bind_addr: String,

    /// Largest scale factor accepted from the CLI and the HTTP API
    pub max_scale_factor: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: ParamSet::default(),
            debounce_ms: 100,
            jpeg_quality: 90,
            bind_addr: "127.0.0.1:3000".to_string(),
            max_scale_factor: 12,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        matrix = %config.defaults.matrix_label(),
                        debounce_ms = config.debounce_ms,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Config path from an explicit flag or the `DITHERER_CONFIG` variable.
    pub fn resolve_path(flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| std::env::var("DITHERER_CONFIG").ok().map(PathBuf::from))
    }

    /// Listen address, with `BIND_ADDR` taking precedence over the file.
    pub fn effective_bind_addr(&self) -> String {
        std::env::var("BIND_ADDR").unwrap_or_else(|_| self.bind_addr.clone())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// JPEG quality clamped to the encoder's accepted range.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
