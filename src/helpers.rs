//! Shared helpers for unit conversions.
//!
//! The prediction model was trained on metric features, while the inputs we
//! receive (NWS-style forecast text, US thermometers) are imperial:
//!
//! - `fahrenheit_to_celsius`: °F → °C
//! - `mph_to_meters_per_second`: mph → m/s
//!
//! The conversion constants must stay exactly as written; the downstream
//! model compares against features produced with these values.

/// Metres per second in one mile per hour.
pub(crate) const METERS_PER_SECOND_PER_MPH: f64 = 0.44704;

/// Convert a temperature from Fahrenheit to Celsius.
pub(crate) fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Convert a speed from miles per hour to metres per second.
pub(crate) fn mph_to_meters_per_second(mph: f64) -> f64 {
    mph * METERS_PER_SECOND_PER_MPH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezing_point() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn test_boiling_point() {
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
    }

    #[test]
    fn test_minus_forty_is_shared() {
        assert_eq!(fahrenheit_to_celsius(-40.0), -40.0);
    }

    #[test]
    fn test_mph_zero() {
        assert_eq!(mph_to_meters_per_second(0.0), 0.0);
    }

    #[test]
    fn test_mph_is_linear() {
        for x in [0.5, 1.0, 7.0, 15.0, 42.25] {
            assert_eq!(
                mph_to_meters_per_second(2.0 * x),
                2.0 * mph_to_meters_per_second(x)
            );
        }
    }

    #[test]
    fn test_mph_fifteen() {
        assert!((mph_to_meters_per_second(15.0) - 6.7056).abs() < 1e-12);
    }
}
