//! Solar output prediction HTTP endpoint.
//!
//! - GET /api/solar-output?temperatureF=N&windSpeed=TEXT

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SolarOutputQuery {
    /// Air temperature in Fahrenheit
    pub temperature_f: Option<String>,
    /// Wind speed text, e.g. "15 mph" or "10 to 20 mph". Omitted means calm.
    pub wind_speed: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SolarOutputResponse {
    /// First prediction returned by the model
    pub prediction: f64,
}

/// Predict solar output from current temperature and wind.
///
/// Every failure past input validation is reported as a plain
/// "Prediction unavailable"; the specific cause is logged.
#[utoipa::path(
    get,
    path = "/api/solar-output",
    tag = "Prediction",
    params(SolarOutputQuery),
    responses(
        (status = 200, description = "Predicted solar output", body = SolarOutputResponse),
        (status = 400, description = "Invalid temperature or wind speed", body = ErrorResponse),
        (status = 502, description = "Prediction unavailable", body = ErrorResponse),
    )
)]
pub async fn get_solar_output(
    State(state): State<AppState>,
    Query(params): Query<SolarOutputQuery>,
) -> Result<Json<SolarOutputResponse>, AppError> {
    let raw = params
        .temperature_f
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: temperatureF".into()))?;

    // NaN and infinities parse as f64 but are not temperatures
    let temperature_f: f64 = raw
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid temperatureF '{}'", raw)))?;

    let prediction = state
        .predictor
        .predict(temperature_f, params.wind_speed.as_deref())
        .await?;

    Ok(Json(SolarOutputResponse { prediction }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::errors::PREDICTION_UNAVAILABLE;
    use crate::routes::test_support::{get_json, state_for, PREDICT_PATH};

    #[tokio::test]
    async fn test_prediction_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .and(body_json(json!({ "inputs": [[0.0, 0.1, 0.1, 15.0 * 0.44704]] })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "predictions": [128.75] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) = get_json(
            state_for(&server),
            "/api/solar-output?temperatureF=32&windSpeed=10%20to%2020%20mph",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], 128.75);
    }

    #[tokio::test]
    async fn test_missing_predictions_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "Invalid input data" })),
            )
            .mount(&server)
            .await;

        let (status, body) = get_json(
            state_for(&server),
            "/api/solar-output?temperatureF=70&windSpeed=5%20mph",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], PREDICTION_UNAVAILABLE);
        assert!(body.get("prediction").is_none());
    }

    #[tokio::test]
    async fn test_missing_temperature() {
        let server = MockServer::start().await;
        let (status, body) = get_json(state_for(&server), "/api/solar-output?windSpeed=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("temperatureF"));
    }

    #[tokio::test]
    async fn test_non_finite_temperature() {
        let server = MockServer::start().await;
        for t in ["NaN", "inf", "warm"] {
            let (status, _) =
                get_json(state_for(&server), &format!("/api/solar-output?temperatureF={}", t))
                    .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "temperatureF={}", t);
        }
    }

    #[tokio::test]
    async fn test_overflowing_temperature_makes_no_prediction_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [1.0] })))
            .expect(0)
            .mount(&server)
            .await;

        for t in ["1e308", "-1e308"] {
            let (status, body) = get_json(
                state_for(&server),
                &format!("/api/solar-output?temperatureF={}&windSpeed=5%20mph", t),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "temperatureF={}", t);
            assert!(body["error"].as_str().unwrap().contains("temperature_c"));
        }
    }

    #[tokio::test]
    async fn test_bad_wind_text_makes_no_prediction_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [1.0] })))
            .expect(0)
            .mount(&server)
            .await;

        let (status, body) = get_json(
            state_for(&server),
            "/api/solar-output?temperatureF=70&windSpeed=gusty",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("gusty"));
    }
}
