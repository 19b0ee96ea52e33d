//! XML-RPC representation.
//!
//! The payload travels as the single parameter of a `<params>` envelope, using
//! the layout of the classic XML-RPC marshaller: one element per line, struct
//! members in key order, and `<nil/>` for null so absent values stay explicit.

mod decoder;
mod encoder;
mod error;

pub use decoder::decode_params;
pub use encoder::{encode_params, XmlRpcEncoder};
pub use error::DecodeError;

use serde_json::Value;

use crate::error::SerializeError;
use crate::Payload;

/// Serialize `payload` as a one-parameter `<params>` envelope.
pub fn serialize(payload: &Payload) -> Result<Vec<u8>, SerializeError> {
    let mut encoder = XmlRpcEncoder::new();
    encoder.begin_params();
    encoder.begin_param();
    encoder.write_struct(payload)?;
    encoder.end_param();
    encoder.end_params();
    Ok(encoder.into_string().into_bytes())
}

/// Decode a one-parameter envelope back into a payload.
pub fn deserialize(body: &str) -> Result<Payload, DecodeError> {
    let mut params = decode_params(body)?;
    if params.len() != 1 {
        return Err(DecodeError::ParamCount(params.len()));
    }
    match params.pop() {
        Some(Value::Object(map)) => Ok(map),
        _ => Err(DecodeError::NotAStruct),
    }
}
