//! Wind speed text parsing.
//!
//! Forecast providers describe wind as free text, either a single value
//! (`"15 mph"`) or a range (`"10 to 20 mph"`). A range is reduced to the mean
//! of its bounds. The result is in mph; conversion to m/s happens in
//! `helpers::mph_to_meters_per_second`.

/// Separator between the bounds of a range.
const RANGE_SEPARATOR: &str = "to";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindSpeedError {
    #[error("Invalid wind speed '{text}': expected '<n> mph' or '<a> to <b> mph'")]
    InvalidNumber { text: String },
}

/// Parse a wind speed description into mph.
///
/// Absent or blank input is treated as calm (0 mph). Only the first `"to"`
/// is treated as a range boundary. Negative values are passed through.
pub fn parse_wind_speed(text: Option<&str>) -> Result<f64, WindSpeedError> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(0.0),
    };

    let invalid = || WindSpeedError::InvalidNumber {
        text: text.to_string(),
    };

    match text.split_once(RANGE_SEPARATOR) {
        Some((low, high)) => {
            let low = parse_leading_number(low.trim()).ok_or_else(invalid)?;
            // The upper bound carries the unit label: "20 mph"
            let high = high
                .split_whitespace()
                .next()
                .and_then(parse_leading_number)
                .ok_or_else(invalid)?;
            Ok((low + high) / 2.0)
        }
        None => text
            .split_whitespace()
            .next()
            .and_then(parse_leading_number)
            .ok_or_else(invalid),
    }
}

/// Parse the base-10 integer at the start of `token`, ignoring anything after
/// the last digit (`"20mph"` → 20). Returns `None` when no digit leads.
///
/// The digit run is read as `f64`, so integers wider than `i64` still parse.
fn parse_leading_number(token: &str) -> Option<f64> {
    let sign_len = usize::from(token.starts_with(['+', '-']));
    let digits_len = token[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    token[..sign_len + digits_len].parse().ok()
}
