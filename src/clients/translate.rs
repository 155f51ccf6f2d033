use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

/// Language captions are produced in. Requests for it skip translation.
pub const SOURCE_LANGUAGE: &str = "en";

const MAX_LANGUAGE_CODE_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("invalid destination language: {0:?}")]
    InvalidLanguage(String),

    #[error("{0}")]
    Request(String),

    #[error("translation service returned {0}")]
    Status(StatusCode),

    #[error("unexpected translation response")]
    Malformed,
}

impl TranslationError {
    /// Text shown in place of the translated caption when translation fails.
    pub fn placeholder(&self) -> String {
        format!("[Translation error: {self}]")
    }
}

fn validate_language(code: &str) -> Result<(), TranslationError> {
    let valid = !code.is_empty()
        && code.len() <= MAX_LANGUAGE_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(TranslationError::InvalidLanguage(code.to_string()))
    }
}

/// Join the translated sentence segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists one entry per
/// sentence, each starting with the translated text.
pub fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.as_array()?.first()?.as_array()?;

    let mut out = String::new();
    for segment in segments {
        match segment.as_array().and_then(|s| s.first()) {
            Some(Value::String(text)) => out.push_str(text),
            // Transliteration rows carry null in the text slot.
            Some(Value::Null) => {}
            _ => return None,
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

pub async fn translate(
    client: &Client,
    config: &Config,
    text:   &str,
    target: &str,
) -> Result<String, TranslationError> {
    validate_language(target)?;

    tracing::debug!(target, chars = text.len(), "Translating caption");

    let response = client
        .get(&config.translate_api_url)
        .query(&[
            ("client", "gtx"),
            ("sl",     "auto"),
            ("tl",     target),
            ("dt",     "t"),
            ("q",      text),
        ])
        .send()
        .await
        .map_err(|e| TranslationError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(TranslationError::Status(response.status()));
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|_| TranslationError::Malformed)?;

    parse_translation(&body).ok_or(TranslationError::Malformed)
}
