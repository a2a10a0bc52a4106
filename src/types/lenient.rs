// src/types/lenient.rs
//! Field deserializers for model output: blanks and nulls mean "nothing found",
//! wrong types are rejected

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// `null`, `""` and whitespace-only strings become `None`
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Enum text parsed through `FromStr`, blanks become `None`
pub fn optional_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = anyhow::Error>,
{
    match blank_as_none(deserializer)? {
        Some(raw) => raw.parse::<T>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// Number or numeric string; anything else is malformed
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got \"{}\"", s))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// Percentage in 0..=100; fractional values are rounded
pub fn optional_percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_number(deserializer)? {
        None => Ok(None),
        Some(v) if (0.0..=100.0).contains(&v) => Ok(Some(v.round() as u8)),
        Some(v) => Err(D::Error::custom(format!(
            "percentage must be between 0 and 100, got {}",
            v
        ))),
    }
}

/// `null` or missing numbers fall back to zero
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

/// `null` falls back to the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Year given as a number or numeric string
pub fn optional_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.map(|y| y.round() as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct LenientFields {
        #[serde(default, deserialize_with = "blank_as_none")]
        text: Option<String>,
        #[serde(default, deserialize_with = "optional_percent")]
        percent: Option<u8>,
        #[serde(default, deserialize_with = "optional_number")]
        number: Option<f64>,
    }

    #[test]
    fn test_blank_and_null_are_absent() {
        let fields: LenientFields =
            serde_json::from_str(r#"{"text": "  ", "percent": null, "number": ""}"#).unwrap();
        assert_eq!(fields.text, None);
        assert_eq!(fields.percent, None);
        assert_eq!(fields.number, None);
    }

    #[test]
    fn test_missing_keys_are_absent() {
        let fields: LenientFields = serde_json::from_str("{}").unwrap();
        assert_eq!(fields.text, None);
        assert_eq!(fields.number, None);
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let fields: LenientFields = serde_json::from_str(r#"{"percent": "80", "number": 7.5}"#).unwrap();
        assert_eq!(fields.percent, Some(80));
        assert_eq!(fields.number, Some(7.5));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(serde_json::from_str::<LenientFields>(r#"{"number": "seven"}"#).is_err());
        assert!(serde_json::from_str::<LenientFields>(r#"{"number": [1]}"#).is_err());
        assert!(serde_json::from_str::<LenientFields>(r#"{"percent": 140}"#).is_err());
    }
}
