use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::Config;

/// Longest text the speech endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No text to speak")]
    EmptyText,

    #[error("{0}")]
    Request(String),

    #[error("speech service returned {0}")]
    Status(StatusCode),

    #[error("speech service returned no audio")]
    EmptyAudio,
}

/// Break text into pieces of at most `max` characters, cutting on whitespace
/// and hard-splitting words that are longer than `max` on their own.
pub fn split_for_speech(text: &str, max: usize) -> Vec<String> {
    let mut chunks  = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Render `text` as MP3 audio in language `lang`.
pub async fn synthesize(
    client: &Client,
    config: &Config,
    text:   &str,
    lang:   &str,
) -> Result<Vec<u8>, SpeechError> {
    let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
    if chunks.is_empty() {
        return Err(SpeechError::EmptyText);
    }

    let total = chunks.len().to_string();
    let mut audio = Vec::new();

    for (idx, chunk) in chunks.iter().enumerate() {
        let idx     = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = client
            .get(&config.tts_api_url)
            .query(&[
                ("ie",      "UTF-8"),
                ("client",  "tw-ob"),
                ("tl",      lang),
                ("q",       chunk.as_str()),
                ("total",   total.as_str()),
                ("idx",     idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Status(response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        audio.extend_from_slice(&bytes);
    }

    if audio.is_empty() {
        return Err(SpeechError::EmptyAudio);
    }

    tracing::info!(chunks = chunks.len(), bytes = audio.len(), lang, "Speech synthesized");

    Ok(audio)
}
