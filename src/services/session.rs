//! Preview session state.
//!
//! A [`PreviewSession`] owns everything a live preview needs between
//! parameter changes: the decoded source, the current (always valid)
//! parameter set and the single-slot result cache.

use bayer_dither::{resize_nearest, CacheStats, DitherCache, DitherError, Raster};
use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::ParamSet;
use crate::rendering;
use crate::services::codec::{self, ImageFormat};

/// Progress milestones of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Started,
    Dithered,
    /// Only reported when upscaling is enabled
    Upscaled,
    Written,
}

impl ExportPhase {
    /// Coarse progress percentage for display.
    pub fn percent(self) -> u8 {
        match self {
            ExportPhase::Started => 10,
            ExportPhase::Dithered | ExportPhase::Upscaled => 50,
            ExportPhase::Written => 100,
        }
    }
}

/// Presentation options for a preview image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Fit into this frame (bilinear), keeping the aspect ratio
    pub frame: Option<(usize, usize)>,
    /// Integer nearest-neighbour zoom, applied after fitting
    pub zoom: Option<u32>,
}

impl Presentation {
    /// Extent of a `width x height` image after fitting and zooming.
    pub fn extent(&self, width: usize, height: usize) -> (usize, usize) {
        let (w, h) = match self.frame {
            Some((fw, fh)) => rendering::fit_within(width, height, fw, fh),
            None => (width, height),
        };
        let factor = self.zoom.unwrap_or(1).max(1) as usize;
        (w.saturating_mul(factor), h.saturating_mul(factor))
    }
}

pub struct PreviewSession {
    source: Arc<Raster>,
    params: ParamSet,
    cache: DitherCache,
    jpeg_quality: u8,
}

impl PreviewSession {
    /// Start a session. Fails if `params` cannot be applied to `source`.
    pub fn new(source: Raster, params: ParamSet) -> Result<Self, DitherError> {
        let mut session = Self {
            source: Arc::new(source),
            params,
            cache: DitherCache::new(),
            jpeg_quality: codec::DEFAULT_JPEG_QUALITY,
        };
        session.preview()?;
        Ok(session)
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn source(&self) -> &Arc<Raster> {
        &self.source
    }

    pub fn params(&self) -> ParamSet {
        self.params
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Dithered image for the current parameters.
    pub fn preview(&mut self) -> Result<Arc<Raster>, DitherError> {
        self.cache
            .get_or_compute(&self.source, &self.params.dither_params())
    }

    /// Switch to new parameters.
    ///
    /// The new set is only committed if dithering with it succeeds; on error
    /// the session keeps its previous parameters.
    pub fn set_params(&mut self, params: ParamSet) -> Result<Arc<Raster>, DitherError> {
        let image = self
            .cache
            .get_or_compute(&self.source, &params.dither_params())?;
        if params != self.params {
            tracing::debug!(
                scale_factor = params.scale_factor,
                matrix = %params.matrix_label(),
                color = params.color,
                steps = params.steps,
                "Parameters changed"
            );
        }
        self.params = params;
        Ok(image)
    }

    /// Replace the source image, e.g. after the file changed on disk.
    ///
    /// Like [`set_params`](Self::set_params), nothing changes if the current
    /// parameters cannot be applied to the new source.
    pub fn replace_source(&mut self, source: Raster) -> Result<Arc<Raster>, DitherError> {
        let source = Arc::new(source);
        let image = self
            .cache
            .get_or_compute(&source, &self.params.dither_params())?;
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            "Source replaced"
        );
        self.source = source;
        Ok(image)
    }

    /// Preview scaled for display.
    pub fn present(&mut self, presentation: Presentation) -> Result<Raster, DitherError> {
        let image = self.preview()?;
        let mut out = match presentation.frame {
            Some((w, h)) => rendering::fit_to_frame(&image, w, h),
            None => (*image).clone(),
        };
        if let Some(factor) = presentation.zoom {
            out = rendering::zoom(&out, factor);
        }
        Ok(out)
    }

    /// Full-resolution export raster, upscaled to the source size if enabled.
    pub fn render_export(
        &mut self,
        progress: &mut dyn FnMut(ExportPhase),
    ) -> Result<Raster, DitherError> {
        progress(ExportPhase::Started);
        let dithered = self.preview()?;
        progress(ExportPhase::Dithered);

        if self.params.upscale_on_export {
            let upscaled = resize_nearest(&dithered, self.source.width(), self.source.height());
            progress(ExportPhase::Upscaled);
            Ok(upscaled)
        } else {
            Ok((*dithered).clone())
        }
    }

    /// Export encoded bytes.
    pub fn export(
        &mut self,
        format: ImageFormat,
        progress: &mut dyn FnMut(ExportPhase),
    ) -> Result<Vec<u8>, AppError> {
        let raster = self.render_export(progress)?;
        let bytes = codec::encode_with_quality(&raster, format, self.jpeg_quality)?;
        progress(ExportPhase::Written);
        Ok(bytes)
    }

    /// Export straight to a file. Returns the number of bytes written.
    pub fn export_to_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        progress: &mut dyn FnMut(ExportPhase),
    ) -> Result<usize, AppError> {
        let raster = self.render_export(progress)?;
        let written = codec::write_file(&raster, path, format, self.jpeg_quality)?;
        progress(ExportPhase::Written);
        tracing::info!(
            path = %path.display(),
            bytes = written,
            width = raster.width(),
            height = raster.height(),
            "Exported"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayer_dither::{Channels, InvalidParams};
    use pretty_assertions::assert_eq;

    fn gradient(width: usize, height: usize) -> Raster {
        let data = (0..width * height)
            .map(|i| ((i % width) * 255 / (width - 1)) as u8)
            .collect();
        Raster::new(width, height, Channels::Luma, data).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = ParamSet {
            steps: 1,
            ..Default::default()
        };
        assert!(PreviewSession::new(gradient(8, 8), params).is_err());
    }

    #[test]
    fn test_invalid_update_keeps_previous_params() {
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default()).unwrap();
        let before = session.params();

        let err = session
            .set_params(ParamSet {
                matrix_size: 3,
                ..before
            })
            .unwrap_err();
        assert_eq!(err, DitherError::UnsupportedSize(3));

        let err = session
            .set_params(ParamSet {
                scale_factor: 17,
                ..before
            })
            .unwrap_err();
        assert!(matches!(
            err,
            DitherError::InvalidParams(InvalidParams::EmptyOutput { .. })
        ));

        assert_eq!(session.params(), before);
    }

    #[test]
    fn test_repeated_preview_hits_cache() {
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default()).unwrap();
        session.preview().unwrap();
        session.preview().unwrap();

        let stats = session.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn test_replace_source_recomputes() {
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default()).unwrap();
        let image = session.replace_source(gradient(32, 8)).unwrap();

        assert_eq!((image.width(), image.height()), (16, 4));
        assert_eq!(session.source().width(), 32);
        assert_eq!(session.cache_stats().misses, 2);
    }

    #[test]
    fn test_replace_source_too_small_is_rejected() {
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default()).unwrap();
        let tiny = Raster::filled(1, 1, Channels::Luma, 0).unwrap();

        assert!(session.replace_source(tiny).is_err());
        assert_eq!(session.source().width(), 16);
    }

    #[test]
    fn test_present_fit_and_zoom() {
        let mut session = PreviewSession::new(gradient(40, 20), ParamSet::default()).unwrap();

        let fitted = session
            .present(Presentation {
                frame: Some((10, 10)),
                zoom: None,
            })
            .unwrap();
        assert_eq!((fitted.width(), fitted.height()), (10, 5));

        let zoomed = session
            .present(Presentation {
                frame: None,
                zoom: Some(3),
            })
            .unwrap();
        assert_eq!((zoomed.width(), zoomed.height()), (60, 30));
    }

    #[test]
    fn test_presentation_extent_matches_present() {
        let mut session = PreviewSession::new(gradient(40, 20), ParamSet::default()).unwrap();
        let presentation = Presentation {
            frame: Some((10, 10)),
            zoom: Some(4),
        };

        let image = session.present(presentation).unwrap();
        assert_eq!(presentation.extent(20, 10), (image.width(), image.height()));

        assert_eq!(Presentation::default().extent(7, 3), (7, 3));
        let huge = Presentation {
            frame: None,
            zoom: Some(u32::MAX),
        };
        let (w, h) = huge.extent(usize::MAX / 2, 2);
        assert_eq!(w, usize::MAX);
        assert!(h > 2);
    }

    #[test]
    fn test_export_phases_without_upscale() {
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default()).unwrap();
        let mut phases = Vec::new();

        let bytes = session
            .export(ImageFormat::Png, &mut |p| phases.push(p))
            .unwrap();

        assert_eq!(
            phases,
            vec![ExportPhase::Started, ExportPhase::Dithered, ExportPhase::Written]
        );
        let decoded = codec::decode_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_export_upscales_to_source_size() {
        let params = ParamSet {
            scale_factor: 3,
            upscale_on_export: true,
            ..Default::default()
        };
        let mut session = PreviewSession::new(gradient(16, 10), params).unwrap();
        let mut phases = Vec::new();

        let raster = session.render_export(&mut |p| phases.push(p)).unwrap();

        assert_eq!((raster.width(), raster.height()), (16, 10));
        assert_eq!(
            phases,
            vec![ExportPhase::Started, ExportPhase::Dithered, ExportPhase::Upscaled]
        );
        assert!(raster.data().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut session = PreviewSession::new(gradient(16, 16), ParamSet::default())
            .unwrap()
            .with_jpeg_quality(80);

        let written = session
            .export_to_file(&path, ImageFormat::Jpeg, &mut |_| {})
            .unwrap();
        assert!(written > 0);
        assert_eq!(std::fs::read(&path).unwrap().len(), written);
    }

    #[test]
    fn test_phase_percentages() {
        assert_eq!(ExportPhase::Started.percent(), 10);
        assert_eq!(ExportPhase::Dithered.percent(), 50);
        assert_eq!(ExportPhase::Upscaled.percent(), 50);
        assert_eq!(ExportPhase::Written.percent(), 100);
    }
}
