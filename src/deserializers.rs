//! Custom deserializers for flexible request payload parsing.
//!
//! Clients of the scoring endpoints historically sent flags and numbers as strings
//! (`"personalized": "False"`, `"rank_boundary": "5000"`). These deserializers accept
//! those forms while keeping the request structs strongly typed.

use serde::{Deserialize, Deserializer};

/// Deserializes an optional boolean flag.
///
/// # Accepted Formats
///
/// * **Boolean**: `true` / `false`
/// * **Number**: `0` → false, anything else → true
/// * **String** (case-insensitive): `"false"`, `"0"`, `"no"`, `"off"` → false;
///   any other non-empty string → true
///
/// # Examples
///
/// ```json
/// { "personalized": false }
/// { "personalized": "False" }
/// { "personalized": "0" }
/// ```
pub fn de_option_bool_forgiving<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Bool(b) => Ok(Some(b)),
        serde_json::Value::Number(n) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.to_lowercase().as_str() {
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Ok(Some(true)),
            }
        }
        other => Err(D::Error::custom(format!("invalid type for bool: {}", other))),
    }
}

/// Deserializes Option<f64> accepting numbers and numeric strings.
/// Examples: 5000, 5000.5, "5000"
///
/// # Errors
///
/// Returns an error for non-numeric strings and non-finite values.
pub fn de_option_f64_forgiving<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    let val = match v {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("invalid numeric for f64"))?,
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid numeric value: '{}'", s)))?
        }
        other => return Err(D::Error::custom(format!("invalid type for f64: {}", other))),
    };
    if !val.is_finite() {
        return Err(D::Error::custom("non-finite numeric for f64"));
    }
    Ok(Some(val))
}

/// Deserializes Option<u64> accepting integers, floats (rounded), and numeric strings.
/// Negative values become 0. Examples: 5, 5.0, "5", "5.7" -> 6
pub fn de_option_u64_forgiving<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    let f = match v {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(Some(u));
            }
            n.as_f64()
                .ok_or_else(|| D::Error::custom("invalid numeric for u64"))?
        }
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(u) = s.parse::<u64>() {
                return Ok(Some(u));
            }
            s.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid u64 value: '{}'", s)))?
        }
        other => return Err(D::Error::custom(format!("invalid type for u64: {}", other))),
    };
    if !f.is_finite() {
        return Err(D::Error::custom("non-finite numeric for u64"));
    }
    let r = f.round();
    Ok(Some(if r < 0.0 { 0 } else { r as u64 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "de_option_bool_forgiving")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "de_option_f64_forgiving")]
        boundary: Option<f64>,
        #[serde(default, deserialize_with = "de_option_u64_forgiving")]
        timeout: Option<u64>,
    }

    fn parse(json: &str) -> Payload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bool_string_forms() {
        assert_eq!(parse(r#"{"flag": "False"}"#).flag, Some(false));
        assert_eq!(parse(r#"{"flag": "0"}"#).flag, Some(false));
        assert_eq!(parse(r#"{"flag": "true"}"#).flag, Some(true));
        assert_eq!(parse(r#"{"flag": "yes please"}"#).flag, Some(true));
        assert_eq!(parse(r#"{"flag": ""}"#).flag, None);
    }

    #[test]
    fn test_bool_native_and_numeric() {
        assert_eq!(parse(r#"{"flag": false}"#).flag, Some(false));
        assert_eq!(parse(r#"{"flag": 0}"#).flag, Some(false));
        assert_eq!(parse(r#"{"flag": 2}"#).flag, Some(true));
        assert_eq!(parse("{}").flag, None);
    }

    #[test]
    fn test_f64_forms() {
        assert_eq!(parse(r#"{"boundary": 5000}"#).boundary, Some(5000.0));
        assert_eq!(parse(r#"{"boundary": "2500.5"}"#).boundary, Some(2500.5));
        assert!(serde_json::from_str::<Payload>(r#"{"boundary": "lots"}"#).is_err());
        assert!(serde_json::from_str::<Payload>(r#"{"boundary": [1]}"#).is_err());
    }

    #[test]
    fn test_u64_forms() {
        assert_eq!(parse(r#"{"timeout": 5}"#).timeout, Some(5));
        assert_eq!(parse(r#"{"timeout": "7"}"#).timeout, Some(7));
        assert_eq!(parse(r#"{"timeout": 2.6}"#).timeout, Some(3));
        assert_eq!(parse(r#"{"timeout": -4}"#).timeout, Some(0));
        assert_eq!(parse(r#"{"timeout": null}"#).timeout, None);
    }
}
