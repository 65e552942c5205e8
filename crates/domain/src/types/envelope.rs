//! The `{"Data": .., "Links": .., "Meta": ..}` wrapper around every payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Data")]
    pub data: T,
    #[serde(rename = "Links", default)]
    pub links: Value,
    #[serde(rename = "Meta", default)]
    pub meta: Value,
}

/// Request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<T> {
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T> RequestEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `Data` of the endpoints that only acknowledge a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BooleanResponse {
    pub result: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_and_meta_are_optional() {
        let envelope: Envelope<BooleanResponse> =
            serde_json::from_str(r#"{"Data": {"result": true}}"#).unwrap();

        assert!(envelope.data.result);
        assert!(envelope.links.is_null());
    }

    #[test]
    fn request_envelope_wraps_in_data() {
        let body = serde_json::to_value(RequestEnvelope::new(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(body, serde_json::json!({"Data": {"a": 1}}));
    }
}
