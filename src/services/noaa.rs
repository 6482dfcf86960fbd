//! NOAA Climate Data Online (CDO) v2 client.
//!
//! Fetches monthly summaries (GSOM) for one data type per request.
//! See: https://www.ncdc.noaa.gov/cdo-web/webservices/v2#data

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::Deserialize;

use crate::services::climate::{aggregate, ClimateError, ClimateQuery, ClimateResult, VariableCode};

pub const NOAA_API_URL: &str = "https://www.ncei.noaa.gov/cdo-web/api/v2/data";

/// Global Summary of the Month.
const DATASET_ID: &str = "GSOM";

/// Unit system requested from CDO.
const UNITS: &str = "metric";

/// Longest upstream error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the NOAA CDO data endpoint.
#[derive(Debug, Clone)]
pub struct NoaaClient {
    client: reqwest::Client,
    base_url: String,
    /// Pre-built `token` header; marked sensitive so it never shows in logs.
    headers: HeaderMap,
    limit: u32,
}

// --- CDO JSON response types ---

#[derive(Debug, Deserialize)]
struct CdoResponse {
    /// CDO answers `{}` when nothing matches, so a missing list means no rows.
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl NoaaClient {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        token: &str,
        limit: u32,
    ) -> Result<Self, InvalidHeaderValue> {
        let mut token = HeaderValue::from_str(token)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("token", token);

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            headers,
            limit,
        })
    }

    /// Fetch every variable in `query` concurrently and merge the results.
    ///
    /// All requests are awaited before merging. Any single failure fails the
    /// whole query; successful variables are discarded in that case.
    pub async fn fetch(&self, query: &ClimateQuery) -> Result<ClimateResult, ClimateError> {
        tracing::debug!(
            "Fetching {} variable(s) for {} from {} to {}",
            query.variables.len(),
            query.location_id,
            query.start_date,
            query.end_date
        );

        let fetches = query
            .variables
            .iter()
            .map(|variable| self.fetch_variable(query, variable));
        let outcomes = futures::future::join_all(fetches).await;

        let result = aggregate(query.variables.iter().cloned().zip(outcomes));
        if let Err(e) = &result {
            tracing::warn!("Climate query for {} failed: {}", query.location_id, e);
        }
        result
    }

    /// Fetch the observation records for a single variable.
    pub async fn fetch_variable(
        &self,
        query: &ClimateQuery,
        variable: &VariableCode,
    ) -> Result<Vec<serde_json::Value>, ClimateError> {
        let upstream_error = |detail: String| ClimateError::UpstreamFetch {
            variable: variable.clone(),
            detail,
        };

        let mut params: Vec<(&str, String)> = vec![
            ("datasetid", DATASET_ID.to_string()),
            ("datatypeid", variable.to_string()),
            ("startdate", query.start_date_param()),
            ("enddate", query.end_date_param()),
            ("locationid", query.location_id.clone()),
        ];
        if let Some(station_id) = &query.station_id {
            params.push(("stationid", station_id.clone()));
        }
        params.push(("units", UNITS.to_string()));
        params.push(("limit", self.limit.to_string()));

        let response = self
            .client
            .get(&self.base_url)
            .headers(self.headers.clone())
            .query(&params)
            .send()
            .await
            .map_err(|e| upstream_error(describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| upstream_error(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(upstream_error(format!(
                "NOAA returned HTTP {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let parsed: CdoResponse = serde_json::from_str(&body)
            .map_err(|e| upstream_error(format!("NOAA JSON parse error: {}", e)))?;

        tracing::debug!("NOAA returned {} record(s) for {}", parsed.results.len(), variable);
        Ok(parsed.results)
    }
}

/// Render a reqwest error, calling out timeouts explicitly.
pub(crate) fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
