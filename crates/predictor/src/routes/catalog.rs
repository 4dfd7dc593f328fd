use std::sync::Arc;

use axum::{extract::State, Json};

use crate::AppState;

#[utoipa::path(
    get,
    path = "/provinces",
    responses(
        (status = OK, description = "Provinces with climate statistics, sorted by name", body = Vec<String>),
    ))]
pub async fn provinces_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.climate.provinces())
}

#[utoipa::path(
    get,
    path = "/classes",
    responses(
        (status = OK, description = "Weather categories the predictor can return, in tie-break order", body = Vec<String>),
    ))]
pub async fn classes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.predictor.categories().to_vec())
}
