//! Climate history HTTP endpoint.
//!
//! - GET /noaa/solar-irradience?startDate&endDate&locationId[&stationId][&datatypes]

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::climate::{ClimateQuery, ClimateResult, VariableCode};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClimateParams {
    /// First day of the range, YYYY-MM-DD
    pub start_date: Option<String>,
    /// Last day of the range, YYYY-MM-DD
    pub end_date: Option<String>,
    /// NOAA location identifier (e.g. "FIPS:37")
    pub location_id: Option<String>,
    /// NOAA station identifier (e.g. "GHCND:USW00013881")
    pub station_id: Option<String>,
    /// Comma-separated variable codes (e.g. "TAVG,PRCP,AWND"). Defaults to "TEMP".
    pub datatypes: Option<String>,
}

/// Observation records for every requested variable.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClimateResponse {
    pub start_date: String,
    pub end_date: String,
    pub location_id: String,
    pub station_id: Option<String>,
    /// Upstream records keyed by variable code, passed through unchanged
    #[schema(value_type = Object)]
    pub results: ClimateResult,
}

/// Get monthly climate history for a location.
///
/// Issues one NOAA request per variable in parallel. If any variable fails
/// the whole request fails; partial results are never returned.
#[utoipa::path(
    get,
    path = "/noaa/solar-irradience",
    tag = "Climate",
    params(ClimateParams),
    responses(
        (status = 200, description = "Observation records per variable", body = ClimateResponse),
        (status = 400, description = "Missing or invalid query parameters", body = ErrorResponse),
        (status = 502, description = "NOAA request failed for a variable", body = ErrorResponse),
    )
)]
pub async fn get_climate_history(
    State(state): State<AppState>,
    Query(params): Query<ClimateParams>,
) -> Result<Json<ClimateResponse>, AppError> {
    let variables = match params.datatypes.as_deref() {
        None => vec![VariableCode::temp()],
        Some(list) => list
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<VariableCode>, _>>()?,
    };

    let query = ClimateQuery::new(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.location_id.as_deref(),
        params.station_id.as_deref(),
        variables,
    )?;

    let results = state.noaa.fetch(&query).await?;

    Ok(Json(ClimateResponse {
        start_date: query.start_date_param(),
        end_date: query.end_date_param(),
        location_id: query.location_id,
        station_id: query.station_id,
        results,
    }))
}
