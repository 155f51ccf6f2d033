//! Helpers shared by the unit tests: a throwaway upstream server and
//! configuration pointing at it.

use std::{path::PathBuf, sync::Arc};

use axum::{body::Body, http::Request, response::Response, Router};
use tokio::{net::TcpListener, sync::oneshot};

use crate::{app_state::AppState, config::Config};

/// Serve `app` on an ephemeral port. Returns its base URL and a shutdown handle.
pub async fn spawn_upstream(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr     = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

/// Configuration with every remote service under `base_url`
/// (`/caption`, `/translate`, `/tts`) and a fresh audio directory.
pub fn test_config(base_url: &str) -> Config {
    Config {
        hf_api_token:         None,
        caption_api_url:      format!("{base_url}/caption"),
        translate_api_url:    format!("{base_url}/translate"),
        tts_api_url:          format!("{base_url}/tts"),
        audio_dir:            temp_audio_dir(),
        request_timeout_secs: 5,
        max_upload_bytes:     1024 * 1024,
        host:                 "127.0.0.1".into(),
        port:                 0,
    }
}

pub fn test_state(base_url: &str) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(base_url), reqwest::Client::new()))
}

fn temp_audio_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("caption-service-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const BOUNDARY: &str = "caption-test-boundary";

/// Build a `POST` carrying a multipart form with a single file field.
pub fn multipart_request(uri: &str, field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
