use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CAPTION_API_URL: &str =
    "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base";
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_TTS_API_URL: &str = "https://translate.google.com/translate_tts";

#[derive(Parser, Debug, Clone)]
#[command(
    name    = "caption-service",
    about   = "Image captioning bridge with translation and spoken captions",
    version
)]
pub struct Config {
    /// Hugging Face API token sent to the captioning endpoint.
    /// Calls go out unauthenticated when it is not set.
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_api_token: Option<String>,

    /// Image-captioning inference endpoint.
    #[arg(long, env = "CAPTION_API_URL", default_value = DEFAULT_CAPTION_API_URL)]
    pub caption_api_url: String,

    /// Translation endpoint.
    #[arg(long, env = "TRANSLATE_API_URL", default_value = DEFAULT_TRANSLATE_API_URL)]
    pub translate_api_url: String,

    /// Speech synthesis endpoint.
    #[arg(long, env = "TTS_API_URL", default_value = DEFAULT_TTS_API_URL)]
    pub tts_api_url: String,

    /// Directory where synthesized clips are written before being served.
    #[arg(long, env = "CAPTION_AUDIO_DIR", default_value = ".")]
    pub audio_dir: PathBuf,

    /// Timeout applied to every outgoing request.
    #[arg(long, env = "CAPTION_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "CAPTION_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Host address to listen on.
    #[arg(long, env = "CAPTION_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "CAPTION_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("CAPTION_API_URL",   &self.caption_api_url),
            ("TRANSLATE_API_URL", &self.translate_api_url),
            ("TTS_API_URL",       &self.tts_api_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("{name} is not a valid URL ({url}): {e}"))?;
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("CAPTION_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("CAPTION_MAX_UPLOAD_BYTES must be greater than zero");
        }
        Ok(())
    }

    /// Token to send upstream, treating a blank value as absent.
    pub fn api_token(&self) -> Option<&str> {
        self.hf_api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["caption-service"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_point_at_public_services() {
        let config = parse(&["--hf-api-token", "hf_x"]);

        assert_eq!(config.caption_api_url, DEFAULT_CAPTION_API_URL);
        assert_eq!(config.translate_api_url, DEFAULT_TRANSLATE_API_URL);
        assert_eq!(config.tts_api_url, DEFAULT_TTS_API_URL);
        assert_eq!(config.addr(), "127.0.0.1:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_token_counts_as_absent() {
        let config = parse(&["--hf-api-token", "   "]);
        assert_eq!(config.api_token(), None);

        let config = parse(&["--hf-api-token", "hf_abc"]);
        assert_eq!(config.api_token(), Some("hf_abc"));
    }

    #[test]
    fn rejects_malformed_urls() {
        let config = parse(&["--caption-api-url", "not a url"]);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("CAPTION_API_URL"), "{err}");
    }

    #[test]
    fn rejects_zero_limits() {
        assert!(parse(&["--request-timeout-secs", "0"]).validate().is_err());
        assert!(parse(&["--max-upload-bytes", "0"]).validate().is_err());
    }
}
