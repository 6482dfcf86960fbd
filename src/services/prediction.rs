//! Solar output prediction service client.
//!
//! The model behind `PREDICTION_URL` takes rows of
//! `[temperature_c, 0.1, 0.1, wind_speed_ms]` and answers
//! `{"predictions": [..]}`. The two middle features are fixed by the model's
//! input schema and are not derived from any observation.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;

use crate::helpers::{fahrenheit_to_celsius, mph_to_meters_per_second};
use crate::services::noaa::describe_transport_error;
use crate::services::wind::{parse_wind_speed, WindSpeedError};

pub const PREDICTION_URL: &str = "http://127.0.0.1:5000/predict";

/// Fixed value of the second and third model inputs.
pub const PLACEHOLDER_FEATURE: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    InvalidWindSpeed(#[from] WindSpeedError),

    #[error("Feature {name} is not a finite number after conversion ({value})")]
    NonFiniteFeature { name: &'static str, value: f64 },

    #[error("Prediction service request failed: {0}")]
    Transport(String),

    #[error("Prediction service returned HTTP {status}: {body}")]
    ServiceStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Prediction service returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("No predictions in prediction service response")]
    MissingPrediction,
}

/// The ordered model input row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
}

impl FeatureVector {
    /// Build the features from raw imperial inputs.
    ///
    /// Inputs that convert to NaN or an infinity are rejected; serde_json
    /// would otherwise send them to the model as `null`.
    pub fn from_imperial(
        temperature_f: f64,
        wind_speed_text: Option<&str>,
    ) -> Result<Self, PredictionError> {
        let wind_mph = parse_wind_speed(wind_speed_text)?;
        let features = Self {
            temperature_c: fahrenheit_to_celsius(temperature_f),
            wind_speed_ms: mph_to_meters_per_second(wind_mph),
        };
        features.check_finite()?;
        Ok(features)
    }

    fn check_finite(&self) -> Result<(), PredictionError> {
        for (name, value) in [
            ("temperature_c", self.temperature_c),
            ("wind_speed_ms", self.wind_speed_ms),
        ] {
            if !value.is_finite() {
                return Err(PredictionError::NonFiniteFeature { name, value });
            }
        }
        Ok(())
    }

    /// Features in the order the model expects.
    pub fn as_row(&self) -> [f64; 4] {
        [
            self.temperature_c,
            PLACEHOLDER_FEATURE,
            PLACEHOLDER_FEATURE,
            self.wind_speed_ms,
        ]
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    inputs: Vec<[f64; 4]>,
}

/// Client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Predict from a temperature in °F and a wind speed description.
    pub async fn predict(
        &self,
        temperature_f: f64,
        wind_speed_text: Option<&str>,
    ) -> Result<f64, PredictionError> {
        let features = FeatureVector::from_imperial(temperature_f, wind_speed_text)?;
        self.predict_features(&features).await
    }

    /// Submit a prepared feature vector and return the first prediction.
    pub async fn predict_features(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        features.check_finite()?;
        let payload = PredictRequest {
            inputs: vec![features.as_row()],
        };
        tracing::debug!("Requesting prediction for {:?}", payload.inputs[0]);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| PredictionError::Transport(describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::Transport(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(PredictionError::ServiceStatus { status, body });
        }

        first_prediction(&body)
    }
}

/// Extract `predictions[0]` from a response body.
fn first_prediction(body: &str) -> Result<f64, PredictionError> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;

    let predictions = match parsed.get("predictions") {
        None | Some(serde_json::Value::Null) => return Err(PredictionError::MissingPrediction),
        Some(p) => p,
    };

    let first = predictions
        .as_array()
        .ok_or_else(|| {
            PredictionError::MalformedResponse("'predictions' is not an array".to_string())
        })?
        .first()
        .ok_or(PredictionError::MissingPrediction)?;

    first.as_f64().ok_or_else(|| {
        PredictionError::MalformedResponse(format!("prediction {} is not a number", first))
    })
}
