//! Lenient deserializers for fields the bank renders inconsistently.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

/// Accepts `"600"`, `600` or `null`.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

/// Timestamp with or without an offset; a bare one is taken as UTC.
pub(crate) fn bank_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_bank_datetime(&raw).map_err(D::Error::custom)
}

/// [`bank_datetime`] for optional fields.
pub(crate) fn opt_bank_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_bank_datetime(&raw).map_err(D::Error::custom))
        .transpose()
}

fn parse_bank_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp: {raw:?}"))
}

/// Accepts a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "bank_datetime")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "opt_bank_datetime")]
        until: Option<DateTime<Utc>>,
    }

    #[test]
    fn timestamps_without_offset_are_utc() {
        let expected = Utc.with_ymd_and_hms(2020, 6, 30, 7, 23, 53).unwrap();
        for raw in ["2020-06-30T10:23:53+03:00", "2020-06-30T07:23:53", "2020-06-30 07:23:53"] {
            let stamped: Stamped = serde_json::from_value(serde_json::json!({ "at": raw })).unwrap();
            assert_eq!(stamped.at, expected, "{raw}");
            assert_eq!(stamped.until, None);
        }

        let stamped: Stamped = serde_json::from_value(serde_json::json!({
            "at": "2020-06-30T07:23:53.464",
            "until": null
        }))
        .unwrap();
        assert_eq!(stamped.at.timestamp_subsec_millis(), 464);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let err = serde_json::from_value::<Stamped>(serde_json::json!({ "at": "yesterday" }))
            .err()
            .unwrap();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
