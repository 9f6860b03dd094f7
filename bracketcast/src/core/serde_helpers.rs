//! Serde helpers for numbers that JSON cannot represent directly.
//!
//! JSON has no infinity and no NaN. Persisted documents encode an unbounded
//! bracket threshold as `null`, and a blank forecast input as `null` too.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize a bracket threshold, mapping `null` (or a missing value) to `+∞`.
pub fn deserialize_max<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.unwrap_or(f64::INFINITY))
}

/// Deserialize a user-entered number, mapping `null` to NaN ("no input").
pub fn deserialize_number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) => n,
        // Form fields sometimes arrive as strings
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}

/// Deserialize a probability vector. Entries that are `null`, unparsable or
/// non-finite become 0 so one bad entry does not cost the whole record.
pub fn deserialize_probs<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Prob(#[serde(deserialize_with = "deserialize_number_or_nan")] f64);

    let probs = Vec::<Prob>::deserialize(deserializer)?;
    Ok(probs
        .into_iter()
        .map(|Prob(p)| if p.is_finite() { p } else { 0.0 })
        .collect())
}

/// Serialize a float, writing `null` for any non-finite value.
pub fn serialize_finite_or_null<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

/// Deserialize an optional outcome, dropping non-numeric or non-finite values.
pub fn deserialize_optional_actual<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(serde_json::Value::String(s)) => {
            s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    })
}

/// Accept either an RFC 3339 string or epoch milliseconds for timestamps.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrMillis {
        String(String),
        Millis(i64),
        Float(f64),
    }

    match StringOrMillis::deserialize(deserializer)? {
        StringOrMillis::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom),
        StringOrMillis::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", ms))),
        StringOrMillis::Float(ms) => Utc
            .timestamp_millis_opt(ms as i64)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", ms))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Threshold {
        #[serde(
            deserialize_with = "deserialize_max",
            serialize_with = "serialize_finite_or_null"
        )]
        max: f64,
    }

    #[derive(Debug, Deserialize)]
    struct Stamp {
        #[serde(deserialize_with = "deserialize_timestamp")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_null_max_is_unbounded() {
        let t: Threshold = serde_json::from_str(r#"{"max": null}"#).unwrap();
        assert!(t.max.is_infinite());
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"{"max":null}"#);
    }

    #[test]
    fn test_finite_max_roundtrips() {
        let t: Threshold = serde_json::from_str(r#"{"max": 91}"#).unwrap();
        assert_eq!(t.max, 91.0);
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"{"max":91.0}"#);
    }

    #[derive(Debug, Deserialize)]
    struct Dist {
        #[serde(deserialize_with = "deserialize_probs")]
        probs: Vec<f64>,
    }

    #[test]
    fn test_null_probs_read_as_zero() {
        let d: Dist = serde_json::from_str(r#"{"probs": [null, 1.0, "0.5"]}"#).unwrap();
        assert_eq!(d.probs, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_timestamp_accepts_millis_and_rfc3339() {
        let a: Stamp = serde_json::from_str(r#"{"at": 1700000000000}"#).unwrap();
        let b: Stamp = serde_json::from_str(r#"{"at": "2023-11-14T22:13:20Z"}"#).unwrap();
        assert_eq!(a.at, b.at);
    }
}
