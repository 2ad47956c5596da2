//! HTTP route handlers for Axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    api::{
        error::ApiError,
        types::{EntitiesRequest, EntitiesResponse, HealthDto},
    },
    pipeline, ui,
};

use super::AppState;

type ApiResult<T> = Result<T, ApiError>;

pub async fn home(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let page = ui::render_index(&state.registry.status())?;
    Ok(Html(page))
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

#[instrument(skip_all)]
pub async fn extract_entities(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<EntitiesResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(%rejection, "rejected request body");
        ApiError::MalformedRequest(rejection.body_text())
    })?;
    let request = EntitiesRequest::try_from(body)?;
    let extraction = pipeline::extract_entities(&state.registry, &request.text).await?;
    Ok(Json(extraction.into()))
}
