use std::time::Duration;

use crate::services::noaa::NOAA_API_URL;
use crate::services::prediction::PREDICTION_URL;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration, parsed from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// Token for the NOAA CDO API. Never logged.
    pub noaa_api_token: String,
    pub noaa_api_url: String,
    /// `limit` sent with every CDO request.
    pub noaa_result_limit: u32,
    pub prediction_url: String,
    /// Timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,
    pub port: u16,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("noaa_api_token", &"<redacted>")
            .field("noaa_api_url", &self.noaa_api_url)
            .field("noaa_result_limit", &self.noaa_result_limit)
            .field("prediction_url", &self.prediction_url)
            .field("http_timeout", &self.http_timeout)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let noaa_api_token = lookup("NOAA_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("NOAA_API_TOKEN"))?;
        // Sent as a request header; the value is never echoed back.
        if reqwest::header::HeaderValue::from_str(&noaa_api_token).is_err() {
            return Err(ConfigError::Invalid {
                name: "NOAA_API_TOKEN",
                value: "<redacted>".to_string(),
            });
        }

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            noaa_api_token,
            noaa_api_url: lookup("NOAA_API_URL").unwrap_or_else(|| NOAA_API_URL.to_string()),
            noaa_result_limit: parse_or(&lookup, "NOAA_RESULT_LIMIT", 1000)?,
            prediction_url: lookup("PREDICTION_URL").unwrap_or_else(|| PREDICTION_URL.to_string()),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?),
            port: parse_or(&lookup, "PORT", 3000)?,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_lookup(lookup_from(&[("NOAA_API_TOKEN", "abc")])).unwrap();

        assert_eq!(config.noaa_api_token, "abc");
        assert_eq!(config.noaa_api_url, NOAA_API_URL);
        assert_eq!(config.noaa_result_limit, 1000);
        assert_eq!(config.prediction_url, PREDICTION_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("NOAA_API_TOKEN", "abc"),
            ("NOAA_API_URL", "http://localhost:9000/data"),
            ("NOAA_RESULT_LIMIT", "25"),
            ("PREDICTION_URL", "http://model:5000/predict"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.noaa_api_url, "http://localhost:9000/data");
        assert_eq!(config.noaa_result_limit, 25);
        assert_eq!(config.prediction_url, "http://model:5000/predict");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_token() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("NOAA_API_TOKEN")));

        let err = AppConfig::from_lookup(lookup_from(&[("NOAA_API_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("NOAA_API_TOKEN")));
    }

    #[test]
    fn test_token_must_be_valid_header_value() {
        for token in ["bad\ntoken", "bad\u{7f}token", "a\rb"] {
            let err =
                AppConfig::from_lookup(lookup_from(&[("NOAA_API_TOKEN", token)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "NOAA_API_TOKEN", .. }));
            assert!(!err.to_string().contains(token));
        }
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("NOAA_API_TOKEN", "abc"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_log_format() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("NOAA_API_TOKEN", "abc"),
            ("LOG_FORMAT", "xml"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LOG_FORMAT", .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("NOAA_API_TOKEN", "super-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
