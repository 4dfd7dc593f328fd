use axum::{extract::State, http::StatusCode, Json};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{engine, parse_timestamp, timestamp, AppState, PredictionQuery, PredictionResult};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Timestamp(#[from] timestamp::Error),
    #[error(transparent)]
    Query(#[from] engine::Error),
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct PredictRequest {
    /// `M/D/YYYY H:MM` (e.g. `6/30/2025 14:00`) or RFC 3339
    pub time: String,
    pub province: String,
    /// Current temperature in Celsius; the province average is used when omitted
    pub temperature: Option<f64>,
    /// Current relative humidity (0-100); the province average is used when omitted
    pub humidity: Option<f64>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub province: String,
    pub hour: u8,
    pub month: u8,
    pub prediction: PredictionResult,
}

impl PredictRequest {
    pub fn to_query(&self) -> Result<PredictionQuery, Error> {
        let features = parse_timestamp(&self.time)?;
        let mut query =
            PredictionQuery::new(features.hour, features.month, self.province.clone())?;
        if let Some(temperature) = self.temperature {
            query = query.with_temperature(temperature)?;
        }
        if let Some(humidity) = self.humidity {
            query = query.with_humidity(humidity)?;
        }
        Ok(query)
    }
}

#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = OK, description = "Predicted weather category and probability distribution", body = PredictResponse),
        (status = BAD_REQUEST, description = "Malformed timestamp or out of range temperature/humidity"),
    ))]
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, String)> {
    let query = body.to_query().map_err(|e| {
        warn!("rejected prediction request: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let prediction = state.predictor.predict(&query, &mut state.request_rng());
    if !prediction.location_found {
        warn!(
            "Province '{}' not found, using default '{}'",
            body.province, prediction.climate.province
        );
    }

    Ok(Json(PredictResponse {
        province: body.province,
        hour: query.hour(),
        month: query.month(),
        prediction,
    }))
}
