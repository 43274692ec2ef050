use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::{AppConfig, ParamSet, ParamUpdate};
use crate::server::AppState;
use crate::services::codec::{self, ImageFormat};
use crate::services::{ExportPhase, Presentation, PreviewSession};

// Bounds on presentation size to keep a single request cheap
const MAX_FRAME_DIMENSION: usize = 4096;
const MAX_ZOOM: u32 = 16;
const MAX_PREVIEW_PIXELS: usize = 4096 * 4096;

/// Query parameters for the preview endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Downsample divisor (1 to the configured maximum)
    pub scale_factor: Option<u32>,
    /// Bayer matrix side: 2, 4 or 8
    pub matrix_size: Option<usize>,
    /// Dither RGB channels independently
    pub color: Option<bool>,
    /// Quantization levels per channel (>= 2)
    pub steps: Option<u32>,
    /// Frame width to fit the preview into
    pub width: Option<usize>,
    /// Frame height to fit the preview into
    pub height: Option<usize>,
    /// Integer nearest-neighbour zoom
    pub zoom: Option<u32>,
}

impl PreviewQuery {
    fn update(&self) -> ParamUpdate {
        ParamUpdate {
            scale_factor: self.scale_factor,
            matrix_size: self.matrix_size,
            color: self.color,
            steps: self.steps,
            upscale_on_export: None,
        }
    }

    fn presentation(&self) -> Presentation {
        let frame = match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => {
                Some((w.min(MAX_FRAME_DIMENSION), h.min(MAX_FRAME_DIMENSION)))
            }
            _ => None,
        };
        Presentation {
            frame,
            zoom: self.zoom.map(|z| z.min(MAX_ZOOM)),
        }
    }
}

/// Query parameters for the export endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Output format: png (default), jpg or jpeg
    pub format: Option<String>,
    /// Downsample divisor (1 to the configured maximum)
    pub scale_factor: Option<u32>,
    /// Bayer matrix side: 2, 4 or 8
    pub matrix_size: Option<usize>,
    /// Dither RGB channels independently
    pub color: Option<bool>,
    /// Quantization levels per channel (>= 2)
    pub steps: Option<u32>,
    /// Scale the result back up to the source dimensions
    pub upscale_on_export: Option<bool>,
}

impl ExportQuery {
    fn update(&self) -> ParamUpdate {
        ParamUpdate {
            scale_factor: self.scale_factor,
            matrix_size: self.matrix_size,
            color: self.color,
            steps: self.steps,
            upscale_on_export: self.upscale_on_export,
        }
    }

    fn format(&self) -> Result<ImageFormat, ApiError> {
        match self.format.as_deref() {
            None => Ok(ImageFormat::Png),
            Some(f) => f
                .parse()
                .map_err(|_| ApiError::UnsupportedFormat(f.to_string())),
        }
    }
}

fn check_scale_limit(config: &AppConfig, update: &ParamUpdate) -> Result<(), ApiError> {
    match update.scale_factor {
        Some(value) if value > config.max_scale_factor => Err(ApiError::ScaleOutOfRange {
            value,
            max: config.max_scale_factor,
        }),
        _ => Ok(()),
    }
}

/// Apply a parameter update to the session, leaving it unchanged on error.
fn apply_update(session: &mut PreviewSession, update: ParamUpdate) -> Result<(), ApiError> {
    if update.is_empty() {
        return Ok(());
    }
    if let Err(e) = session.set_params(update.apply(session.params())) {
        tracing::debug!(error = %e, "Rejected parameter update");
        return Err(e.into());
    }
    Ok(())
}

/// Run `f` with exclusive access to the session on the blocking pool.
async fn with_session<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut PreviewSession) -> Result<T, ApiError> + Send + 'static,
{
    let session = state.session.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = session
            .lock()
            .map_err(|_| ApiError::Internal("preview session lock poisoned".to_string()))?;
        f(&mut guard)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("preview task failed: {e}")))?
}

/// Get the dithered preview
///
/// Applies any given parameters to the session, then returns the dithered
/// image as PNG. Parameters that are left out keep their current value.
/// Invalid parameters are rejected and the session keeps its last valid set.
#[utoipa::path(
    get,
    path = "/api/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Dithered preview", content_type = "image/png"),
        (status = 400, description = "Invalid parameters or preview too large"),
    ),
    tag = "Preview"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, ApiError> {
    let update = query.update();
    check_scale_limit(&state.config, &update)?;
    let presentation = query.presentation();

    let png = with_session(&state, move |session| {
        apply_update(session, update)?;
        let preview = session.preview()?;
        let (width, height) = presentation.extent(preview.width(), preview.height());
        if width.saturating_mul(height) > MAX_PREVIEW_PIXELS {
            return Err(ApiError::PreviewTooLarge {
                width,
                height,
                max_pixels: MAX_PREVIEW_PIXELS,
            });
        }
        let image = session.present(presentation)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            cache_hits = session.cache_stats().hits,
            "Serving preview"
        );
        Ok(codec::encode(&image, ImageFormat::Png)?)
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, ImageFormat::Png.content_type())], png).into_response())
}

/// Export the dithered image
///
/// Full-resolution export, upscaled to the source size when
/// `upscale_on_export` is set.
#[utoipa::path(
    get,
    path = "/api/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Exported image", content_type = "image/png"),
        (status = 400, description = "Invalid parameters or format"),
    ),
    tag = "Preview"
)]
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let update = query.update();
    check_scale_limit(&state.config, &update)?;
    let format = query.format()?;

    let bytes = with_session(&state, move |session| {
        apply_update(session, update)?;
        let bytes = session.export(format, &mut |phase: ExportPhase| {
            tracing::debug!(?phase, progress = phase.percent(), "Export progress");
        })?;
        Ok(bytes)
    })
    .await?;

    tracing::info!(format = ?format, bytes = bytes.len(), "Export served");

    let disposition = format!("attachment; filename=\"dithered.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Get the current parameters
#[utoipa::path(
    get,
    path = "/api/params",
    responses(
        (status = 200, description = "Current parameter set", body = ParamSet),
    ),
    tag = "Preview"
)]
pub async fn handle_params(State(state): State<AppState>) -> Result<Json<ParamSet>, ApiError> {
    let params = with_session(&state, |session| Ok(session.params())).await?;
    Ok(Json(params))
}
