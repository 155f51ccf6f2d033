use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::Config;

/// Shared application state injected into every request handler via Axum's
/// `State` extractor.
pub struct AppState {
    pub config: Config,
    /// A single `reqwest::Client` that owns a connection pool shared by the
    /// caption, translation and speech calls.
    pub http_client: Client,
    /// Most recent caption, read by `/audio`. The service assumes a single
    /// user: every successful `/caption/` call replaces it.
    pub last_caption: RwLock<Option<LastCaption>>,
}

impl AppState {
    pub fn new(config: Config, http_client: Client) -> Self {
        Self {
            config,
            http_client,
            last_caption: RwLock::new(None),
        }
    }

    /// Replace the stored caption and its language in one write.
    pub async fn remember(&self, caption: LastCaption) {
        *self.last_caption.write().await = Some(caption);
    }

    /// Copy of the stored caption, if one is usable for narration.
    pub async fn snapshot(&self) -> Option<LastCaption> {
        self.last_caption
            .read()
            .await
            .as_ref()
            .filter(|c| c.is_available())
            .cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCaption {
    pub translated_caption: String,
    pub language_code:      String,
}

impl LastCaption {
    pub fn is_available(&self) -> bool {
        !self.translated_caption.is_empty()
    }
}
