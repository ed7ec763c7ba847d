//! Helpers for converting and parsing decibel gains and frequencies.

use serde::de::{Error as DeError, Visitor};
use serde::Deserializer;
use std::fmt;

/// Convert a dB value to linear gain.
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear gain to dB.
pub fn linear_to_db(value: f32) -> f32 {
    let v = value.max(f32::MIN_POSITIVE);
    20.0 * v.log10()
}

/// Deserialize a gain in dB, accepting numbers or strings like `"6db"`.
pub fn deserialize_db_gain<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_with_units(deserializer, "a number or a string like \"6db\"", parse_db_str)
}

/// Deserialize a frequency in Hz, accepting numbers or strings like `"750hz"` or `"2.5khz"`.
pub fn deserialize_hz<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_with_units(
        deserializer,
        "a number or a string like \"750hz\" or \"2.5khz\"",
        parse_hz_str,
    )
}

fn deserialize_with_units<'de, D>(
    deserializer: D,
    expecting: &'static str,
    parse_str: fn(&str) -> Option<f32>,
) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    struct UnitVisitor {
        expecting: &'static str,
        parse_str: fn(&str) -> Option<f32>,
    }

    impl<'de> Visitor<'de> for UnitVisitor {
        type Value = f32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str(self.expecting)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Ok(value as f32)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Ok(value as f32)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Ok(value as f32)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            (self.parse_str)(value)
                .ok_or_else(|| DeError::custom(format!("invalid value \"{}\"", value)))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            self.visit_str(&value)
        }
    }

    deserializer.deserialize_any(UnitVisitor {
        expecting,
        parse_str,
    })
}

fn parse_db_str(value: &str) -> Option<f32> {
    let lower = value.trim().to_ascii_lowercase();
    match lower.strip_suffix("db") {
        Some(db_part) => parse_number(db_part),
        None => parse_number(&lower),
    }
}

fn parse_hz_str(value: &str) -> Option<f32> {
    let lower = value.trim().to_ascii_lowercase();
    if let Some(khz) = lower.strip_suffix("khz") {
        return parse_number(khz).map(|v| v * 1_000.0);
    }
    if let Some(k) = lower.strip_suffix('k') {
        return parse_number(k).map(|v| v * 1_000.0);
    }
    match lower.strip_suffix("hz") {
        Some(hz) => parse_number(hz),
        None => parse_number(&lower),
    }
}

fn parse_number(value: &str) -> Option<f32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_conversions_round_trip_common_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
        assert!((linear_to_db(0.5) - -6.0206).abs() < 1e-3);
    }

    #[test]
    fn linear_to_db_does_not_return_infinity_for_silence() {
        assert!(linear_to_db(0.0).is_finite());
    }

    #[test]
    fn parses_unit_suffixes() {
        assert_eq!(parse_db_str("-3dB"), Some(-3.0));
        assert_eq!(parse_db_str(" 4.5 "), Some(4.5));
        assert_eq!(parse_hz_str("750Hz"), Some(750.0));
        assert_eq!(parse_hz_str("2.5kHz"), Some(2_500.0));
        assert_eq!(parse_hz_str("12k"), Some(12_000.0));
        assert_eq!(parse_hz_str("hz"), None);
    }
}
