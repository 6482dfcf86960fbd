// Solar Forecast API v0.1
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;

use config::{AppConfig, LogFormat};
use routes::AppState;
use services::noaa::NoaaClient;
use services::prediction::PredictionClient;

/// Solar Forecast API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Solar Forecast API",
        version = "0.1.0",
        description = "Fetches monthly climate history from NOAA Climate Data Online and \
            turns current temperature and wind into a solar output estimate using an \
            external prediction model.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Climate", description = "NOAA climate history"),
        (name = "Prediction", description = "Solar output prediction"),
        (name = "Reserved", description = "Endpoints reserved for the frontend, not built yet"),
    ),
    paths(
        routes::health::health_check,
        routes::climate::get_climate_history,
        routes::prediction::get_solar_output,
        routes::placeholders::get_solar_irradience,
        routes::placeholders::get_total_energy_demand,
        routes::placeholders::get_energy_demand,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::climate::ClimateResponse,
            routes::prediction::SolarOutputResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "solar_forecast_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    tracing::debug!("Loaded {:?}", config);

    // One connection pool for both upstreams; the timeout bounds every call
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .expect("Failed to build HTTP client");

    let noaa = match NoaaClient::new(
        http.clone(),
        &config.noaa_api_url,
        &config.noaa_api_token,
        config.noaa_result_limit,
    ) {
        Ok(noaa) => noaa,
        Err(e) => {
            tracing::error!("Invalid NOAA_API_TOKEN: {}", e);
            std::process::exit(1);
        }
    };
    let predictor = PredictionClient::new(http, &config.prediction_url);

    let app_state = AppState { noaa, predictor };

    // CORS: the browser frontend calls us directly; read-only API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/noaa/solar-irradience",
            "/api/solar-output",
            "/api/solar-irradience",
            "/api/total-energy-demand",
            "/api/energy-demand",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        assert!(!doc.paths.paths.contains_key("/api/token"));
    }
}
