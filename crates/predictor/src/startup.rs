use crate::{
    classes_handler, predict_handler, provinces_handler, routes, CategoryProbability, ClimateData, ClimateProfile,
    ClimateTable, ModelMetadata, PredictionResult, Predictor,
};
use anyhow::{anyhow, Context};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::{path::Path, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use weather_predictor_core::{require_file, CLIMATE_STATS_FILE, METADATA_FILE};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub climate: Arc<dyn ClimateData>,
    pub jitter_seed: Option<u64>,
}

impl AppState {
    pub fn new(
        categories: Vec<String>,
        climate: Arc<dyn ClimateData>,
        jitter_seed: Option<u64>,
    ) -> Result<Self, crate::engine::Error> {
        let predictor = Arc::new(Predictor::new(categories, climate.clone())?);
        Ok(Self {
            predictor,
            climate,
            jitter_seed,
        })
    }

    /// Fresh generator per request; a configured seed makes every request draw the same jitter
    pub fn request_rng(&self) -> StdRng {
        match self.jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::predict::predict_handler,
        routes::catalog::provinces_handler,
        routes::catalog::classes_handler,
    ),
    components(
        schemas(
            routes::predict::PredictRequest,
            routes::predict::PredictResponse,
            PredictionResult,
            CategoryProbability,
            ClimateProfile,
        )
    ),
    tags(
        (name = "weather predictor api", description = "rule-based weather category prediction per province")
    )
)]
struct ApiDoc;

pub fn build_app_state(model_dir: &Path, jitter_seed: Option<u64>) -> anyhow::Result<AppState> {
    let metadata_path = require_file(model_dir, METADATA_FILE)?;
    let stats_path = require_file(model_dir, CLIMATE_STATS_FILE)?;

    let metadata = ModelMetadata::load(&metadata_path)
        .with_context(|| format!("error loading {}", metadata_path.display()))?;
    let climate = ClimateTable::load(&stats_path)
        .with_context(|| format!("error loading {}", stats_path.display()))?;

    AppState::new(
        metadata.categories().to_vec(),
        Arc::new(climate),
        jitter_seed,
    )
    .map_err(|e| anyhow!("error setting up predictor: {}", e))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/predict", post(predict_handler))
        .route("/provinces", get(provinces_handler))
        .route("/classes", get(classes_handler))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
