pub mod climate;
pub mod health;
pub mod placeholders;
pub mod prediction;

use axum::{routing::get, Router};

use crate::services::noaa::NoaaClient;
use crate::services::prediction::PredictionClient;

/// Shared application state. Holds no per-request data.
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) noaa: NoaaClient,
    pub(crate) predictor: PredictionClient,
}

/// All API routes, without docs or middleware layers.
pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route(
            "/noaa/solar-irradience",
            get(climate::get_climate_history),
        )
        .route("/api/solar-output", get(prediction::get_solar_output))
        .route(
            "/api/solar-irradience",
            get(placeholders::get_solar_irradience),
        )
        .route(
            "/api/total-energy-demand",
            get(placeholders::get_total_energy_demand),
        )
        .route("/api/energy-demand", get(placeholders::get_energy_demand))
        .with_state(state)
}
