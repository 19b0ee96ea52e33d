//! JSON representation: the payload as a single JSON object.

use crate::error::SerializeError;
use crate::Payload;

pub fn serialize(payload: &Payload) -> Result<Vec<u8>, SerializeError> {
    Ok(serde_json::to_vec(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_payload_as_object() {
        let payload = json!({"title": "Test", "tags": ["a", null]});
        let body = serialize(payload.as_object().unwrap()).unwrap();
        let back: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn output_is_deterministic() {
        let payload = json!({"b": 1, "a": 2});
        let body = serialize(payload.as_object().unwrap()).unwrap();
        assert_eq!(body, br#"{"a":2,"b":1}"#);
    }
}
