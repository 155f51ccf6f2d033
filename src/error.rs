use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::clients::{caption::CaptionError, speech::SpeechError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing `file` field in multipart form")]
    MissingImage,

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Model API error or quota exceeded")]
    Upstream { status: StatusCode },

    #[error("Invalid model response")]
    InvalidResponse,

    #[error("Caption generation error: {0}")]
    CaptionGeneration(String),

    #[error("No caption available for audio generation")]
    NoCaptionAvailable,

    #[error("Text-to-speech error: {0}")]
    TextToSpeech(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingImage
            | AppError::InvalidQuery(_)  => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoCaptionAvailable => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. }
            | AppError::InvalidResponse
            | AppError::CaptionGeneration(_)
            | AppError::TextToSpeech(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Upstream { status: upstream } => {
                tracing::error!(error = %self, %upstream);
            }
            _ => tracing::error!(error = %self),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CaptionError> for AppError {
    fn from(err: CaptionError) -> Self {
        match err {
            CaptionError::Upstream(status) => AppError::Upstream { status },
            CaptionError::InvalidResponse  => AppError::InvalidResponse,
            CaptionError::Request(msg)     => AppError::CaptionGeneration(msg),
        }
    }
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        AppError::TextToSpeech(err.to_string())
    }
}
