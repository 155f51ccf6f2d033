use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    Json,
};
use serde::Serialize;

use crate::{
    app_state::{AppState, LastCaption},
    clients::{
        caption::generate_caption,
        translate::{translate, SOURCE_LANGUAGE},
    },
    error::AppError,
};

const DEFAULT_FILENAME:     &str = "image";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Target language from the query string. A repeated `lang` resolves to its
/// last value; no `lang` means no translation.
fn requested_language(params: &[(String, String)]) -> String {
    params
        .iter()
        .rev()
        .find(|(key, _)| key == "lang")
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| SOURCE_LANGUAGE.to_string())
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub original_caption:   String,
    pub translated_caption: String,
}

struct UploadedImage {
    filename:     String,
    content_type: String,
    bytes:        Vec<u8>,
}

async fn read_image(mut multipart: Multipart) -> Result<UploadedImage, AppError> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::CaptionGeneration(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();

        // Read before consuming the field; `.bytes()` takes it by value.
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::CaptionGeneration(e.to_string()))?;

        image = Some(UploadedImage { filename, content_type, bytes: bytes.to_vec() });
    }

    image.ok_or(AppError::MissingImage)
}

pub async fn handler(
    State(state):  State<Arc<AppState>>,
    query:         Result<Query<Vec<(String, String)>>, QueryRejection>,
    multipart:     Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::InvalidQuery(e.body_text()))?;
    let lang          = requested_language(&params);
    let multipart     = multipart.map_err(|e| AppError::CaptionGeneration(e.body_text()))?;
    let image         = read_image(multipart).await?;

    tracing::debug!(
        bytes = image.bytes.len(),
        mime  = %image.content_type,
        lang  = %lang,
        "Sending image to captioning endpoint"
    );

    let caption = generate_caption(
        &state.http_client,
        &state.config,
        image.filename,
        &image.content_type,
        image.bytes,
    )
    .await?;

    let translated = if lang == SOURCE_LANGUAGE {
        caption.clone()
    } else {
        match translate(&state.http_client, &state.config, &caption, &lang).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, lang = %lang, "Translation failed, using placeholder");
                e.placeholder()
            }
        }
    };

    state
        .remember(LastCaption {
            translated_caption: translated.clone(),
            language_code:      lang,
        })
        .await;

    Ok(Json(CaptionResponse {
        original_caption:   caption,
        translated_caption: translated,
    }))
}
