/*
 * Responsibility
 * - v1 URL layout
 * - /health, /principals/resolve
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, principals::resolve_principal};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/principals/resolve", post(resolve_principal))
}
