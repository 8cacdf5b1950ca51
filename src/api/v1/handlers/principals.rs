/*
 * Responsibility
 * - POST /principals/resolve
 * - resolver outcome -> HTTP (NotFound becomes 401, provider failure 500)
 * - malformed JSON -> 400 with the common error body
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::v1::dto::principals::{PrincipalResponse, ResolvePrincipalRequest},
    error::AppError,
    state::AppState,
};

pub async fn resolve_principal(
    State(state): State<AppState>,
    payload: Result<Json<ResolvePrincipalRequest>, JsonRejection>,
) -> Result<Json<PrincipalResponse>, AppError> {
    let Json(req) = payload?;

    let principal = state
        .resolver
        .resolve(&req.identifier)
        .await
        .map_err(|e| AppError::from_resolve(e, state.app_env))?;

    tracing::info!(user_id = %principal.id(), "principal resolved");

    Ok(Json(PrincipalResponse::from(&principal)))
}
