use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("captioning endpoint returned {0}")]
    Upstream(StatusCode),

    #[error("captioning endpoint returned an unexpected shape")]
    InvalidResponse,

    #[error("{0}")]
    Request(String),
}

/// Pull the caption out of an inference response. The endpoint answers with
/// a list of candidates; only the first one is used.
pub fn extract_caption(body: &Value) -> Option<&str> {
    body.as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
}

pub async fn generate_caption(
    client:       &Client,
    config:       &Config,
    filename:     String,
    content_type: &str,
    image:        Vec<u8>,
) -> Result<String, CaptionError> {
    let file_part = reqwest::multipart::Part::bytes(image)
        .file_name(filename)
        .mime_str(content_type)
        .map_err(|e| CaptionError::Request(e.to_string()))?;

    let form = reqwest::multipart::Form::new().part("file", file_part);

    let mut request = client.post(&config.caption_api_url).multipart(form);
    if let Some(token) = config.api_token() {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = request
        .send()
        .await
        .map_err(|e| CaptionError::Request(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body   = response.text().await.unwrap_or_default();
        tracing::warn!(%status, body = %body, "Captioning endpoint rejected the request");
        return Err(CaptionError::Upstream(status));
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| CaptionError::Request(e.to_string()))?;

    let caption = extract_caption(&body)
        .ok_or(CaptionError::InvalidResponse)?
        .to_string();

    tracing::info!(chars = caption.len(), "Caption generated");

    Ok(caption)
}
