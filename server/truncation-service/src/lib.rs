//! Release Risk Truncation Service
//!
//! HTTP service exposing file classification, truncation passes, and prompt
//! rendering to the report backend. Bind to 127.0.0.1 by default (internal only).

mod handlers;
mod state;
mod types;

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{classify, health, prompt, truncate};
pub use state::AppState;
pub use types::{ClassifiedFile, ClassifyPayload, PromptPayload, PromptResponse};

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/classify", post(classify))
    .route("/truncate", post(truncate))
    .route("/prompt", post(prompt))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
