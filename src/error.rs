use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bayer_dither::DitherError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Dither(#[from] DitherError),

    #[error("Scale factor {value} exceeds the maximum of {max}")]
    ScaleOutOfRange { value: u32, max: u32 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Preview of {width}x{height} exceeds the limit of {max_pixels} pixels")]
    PreviewTooLarge {
        width: usize,
        height: usize,
        max_pixels: usize,
    },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Dither(e) => ApiError::Dither(e),
            AppError::Codec(CodecError::UnsupportedFormat(f)) => ApiError::UnsupportedFormat(f),
            AppError::Codec(e) => ApiError::Codec(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Dither(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::ScaleOutOfRange { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::PreviewTooLarge { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Codec(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Errors from decoding or encoding image files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for CLI commands and the preview session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayer_dither::InvalidParams;

    #[test]
    fn test_api_error_dither_message() {
        let error = ApiError::from(DitherError::UnsupportedSize(5));
        assert_eq!(
            error.to_string(),
            "unsupported matrix size 5 (expected 2, 4 or 8)"
        );
    }

    #[test]
    fn test_api_error_scale_out_of_range() {
        let error = ApiError::ScaleOutOfRange { value: 20, max: 12 };
        assert_eq!(error.to_string(), "Scale factor 20 exceeds the maximum of 12");
    }

    #[test]
    fn test_codec_error_decode() {
        let error = CodecError::Decode("bad header".to_string());
        assert_eq!(error.to_string(), "Decode error: bad header");
    }

    #[test]
    fn test_app_error_config() {
        let error = AppError::Config("missing field".to_string());
        assert_eq!(error.to_string(), "Config error: missing field");
    }

    #[test]
    fn test_api_error_from_app_error() {
        let api: ApiError = AppError::Dither(DitherError::UnsupportedSize(3)).into();
        assert!(matches!(api, ApiError::Dither(_)));

        let api: ApiError =
            AppError::Codec(CodecError::UnsupportedFormat("gif".to_string())).into();
        assert!(matches!(api, ApiError::UnsupportedFormat(_)));

        let api: ApiError = AppError::Config("x".to_string()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        use axum::response::IntoResponse;

        // Dither errors -> BAD_REQUEST
        let response =
            ApiError::Dither(InvalidParams::TooFewSteps { steps: 1 }.into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Dither(DitherError::UnsupportedSize(3)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // ScaleOutOfRange -> BAD_REQUEST
        let response = ApiError::ScaleOutOfRange { value: 99, max: 12 }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // UnsupportedFormat -> BAD_REQUEST
        let response = ApiError::UnsupportedFormat("gif".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Codec -> INTERNAL_SERVER_ERROR
        let response =
            ApiError::Codec(CodecError::Encode("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Internal -> INTERNAL_SERVER_ERROR
        let response = ApiError::Internal("error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
