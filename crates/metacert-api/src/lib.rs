//! # metacert-api — Upload Service
//!
//! The HTTP surface this core exposes to its caller: a single publish
//! endpoint that turns an uploaded artwork plus display fields into two
//! linked pinned objects, answering with both references. Everything
//! else (minting, verification, indexing) happens against the ledger
//! through `metacert-chain` — this service holds no ledger connection.
//!
//! ## API Surface
//!
//! | Route          | Module              | Purpose                      |
//! |----------------|---------------------|------------------------------|
//! | `POST /upload` | [`routes::upload`]  | Publish artwork + metadata   |
//! | `GET /health`  | [`app`]             | Liveness probe               |
//!
//! ## OpenAPI
//!
//! Schema generated via utoipa derives; see [`openapi::ApiDoc`].

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Artwork files can be hefty; cap bodies at 25 MiB.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Assemble the application router.
///
/// The health probe is mounted outside the body limit so it stays
/// reachable regardless of upload traffic shape.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::upload::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
