use std::{path::Path, sync::Arc};

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{app_state::AppState, clients::speech::synthesize, error::AppError};

const AUDIO_MIME_TYPE:      &str = "audio/mpeg";
const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"caption.mp3\"";

/// Write the clip under a per-request name, read it back and remove it, so
/// overlapping requests never share a file.
async fn stage_clip(dir: &Path, audio: &[u8]) -> std::io::Result<Vec<u8>> {
    let path = dir.join(format!("caption-{}.mp3", Uuid::new_v4()));

    tokio::fs::write(&path, audio).await?;
    let staged = tokio::fs::read(&path).await;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged clip");
    }

    staged
}

pub async fn handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let caption = state.snapshot().await.ok_or(AppError::NoCaptionAvailable)?;

    tracing::debug!(
        chars = caption.translated_caption.len(),
        lang  = %caption.language_code,
        "Synthesizing stored caption"
    );

    let audio = synthesize(
        &state.http_client,
        &state.config,
        &caption.translated_caption,
        &caption.language_code,
    )
    .await?;

    let clip = stage_clip(&state.config.audio_dir, &audio)
        .await
        .map_err(|e| AppError::TextToSpeech(e.to_string()))?;

    Ok((
        [
            (CONTENT_TYPE,        AUDIO_MIME_TYPE),
            (CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        clip,
    )
        .into_response())
}
