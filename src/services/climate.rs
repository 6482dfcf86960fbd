//! Climate query model and per-variable result aggregation.
//!
//! A `ClimateQuery` fans out into one upstream request per `VariableCode`
//! (see `services::noaa`). The outcomes are merged by `aggregate`, which is
//! all-or-nothing: a feature vector built from a partial result set would be
//! silently wrong, so one failed variable fails the whole query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Date format accepted for `startDate` / `endDate`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Most distinct variables one query may fan out to. Every variable costs one
/// NOAA request against the shared token's quota.
pub const MAX_VARIABLES: usize = 10;

/// Identifier for a climate observation type in the GSOM dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariableCode(String);

impl VariableCode {
    /// Air temperature.
    pub fn temp() -> Self {
        Self("TEMP".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[allow(dead_code)] // Well-known codes; the HTTP layer parses whatever the caller sends
impl VariableCode {
    /// Average temperature.
    pub fn tavg() -> Self {
        Self("TAVG".to_string())
    }

    /// Precipitation.
    pub fn prcp() -> Self {
        Self("PRCP".to_string())
    }

    /// Average wind speed.
    pub fn awnd() -> Self {
        Self("AWND".to_string())
    }
}

impl fmt::Display for VariableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableCode {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(ClimateError::InvalidQuery(
                "Variable code must not be empty".to_string(),
            ));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(ClimateError::InvalidQuery(format!(
                "Invalid variable code '{}': expected uppercase letters and digits",
                code
            )));
        }
        Ok(Self(code.to_string()))
    }
}

impl TryFrom<String> for VariableCode {
    type Error = ClimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VariableCode> for String {
    fn from(code: VariableCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClimateError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Upstream fetch for {variable} failed: {detail}")]
    UpstreamFetch { variable: VariableCode, detail: String },
}

/// A validated request for climate observations.
///
/// Construct via `ClimateQuery::new`, which rejects missing fields before any
/// network call can be made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimateQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location_id: String,
    pub station_id: Option<String>,
    /// Requested variables, deduplicated, in request order.
    pub variables: Vec<VariableCode>,
}

impl ClimateQuery {
    pub fn new(
        start_date: Option<&str>,
        end_date: Option<&str>,
        location_id: Option<&str>,
        station_id: Option<&str>,
        variables: Vec<VariableCode>,
    ) -> Result<Self, ClimateError> {
        let start_date = parse_date("startDate", required("startDate", start_date)?)?;
        let end_date = parse_date("endDate", required("endDate", end_date)?)?;
        if start_date > end_date {
            return Err(ClimateError::InvalidQuery(format!(
                "startDate {} is after endDate {}",
                start_date, end_date
            )));
        }

        let location_id = required("locationId", location_id)?.to_string();
        let station_id = match station_id {
            Some(s) => Some(required("stationId", Some(s))?.to_string()),
            None => None,
        };

        let mut unique: Vec<VariableCode> = Vec::with_capacity(variables.len());
        for v in variables {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        if unique.is_empty() {
            return Err(ClimateError::InvalidQuery(
                "At least one variable code is required".to_string(),
            ));
        }
        if unique.len() > MAX_VARIABLES {
            return Err(ClimateError::InvalidQuery(format!(
                "Too many variable codes: {} requested, at most {} allowed",
                unique.len(),
                MAX_VARIABLES
            )));
        }

        Ok(Self {
            start_date,
            end_date,
            location_id,
            station_id,
            variables: unique,
        })
    }

    /// `startDate` formatted for the upstream API.
    pub fn start_date_param(&self) -> String {
        self.start_date.format(DATE_FORMAT).to_string()
    }

    /// `endDate` formatted for the upstream API.
    pub fn end_date_param(&self) -> String {
        self.end_date.format(DATE_FORMAT).to_string()
    }
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ClimateError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClimateError::InvalidQuery(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ClimateError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        ClimateError::InvalidQuery(format!(
            "Invalid {} '{}' (expected YYYY-MM-DD): {}",
            name, value, e
        ))
    })
}

/// Observation records keyed by variable. Records are passed through verbatim
/// from the upstream API.
pub type ClimateResult = BTreeMap<VariableCode, Vec<serde_json::Value>>;

/// Merge per-variable fetch outcomes into a single result.
///
/// Fails with the first error in `outcomes` order, discarding every
/// successful variable. On success the key set is exactly the set of
/// variables in `outcomes`.
pub fn aggregate<I>(outcomes: I) -> Result<ClimateResult, ClimateError>
where
    I: IntoIterator<Item = (VariableCode, Result<Vec<serde_json::Value>, ClimateError>)>,
{
    let mut merged = ClimateResult::new();
    for (variable, outcome) in outcomes {
        let records = outcome?;
        merged.insert(variable, records);
    }
    Ok(merged)
}
