pub mod audio;
pub mod caption;
pub mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/",         get(health::handler))
        .route("/caption/", post(caption::handler))
        .route("/caption",  post(caption::handler))
        .route("/audio",    get(audio::handler))
        .layer(DefaultBodyLimit::max(body_limit))
        // Browser frontends may be served from any origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
