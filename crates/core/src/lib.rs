//! `records-core`: content negotiation building blocks.
//!
//! Framework-agnostic: media types and `Accept` parsing, the serializer
//! registry with its negotiation rules, and the JSON and XML-RPC serializers.
//! HTTP wiring lives in `records-api`.

pub mod error;
pub mod media_type;
pub mod registry;
pub mod serializers;

pub use error::{ConfigError, DispatchError, MediaTypeError, NegotiationError, SerializeError};
pub use media_type::{AcceptPreferences, MediaRange, MediaType, Quality};
pub use registry::{Negotiated, RegistryBuilder, Rendered, Selection, Serializer, SerializerRegistry};

/// Handler output: string keys to JSON-like values, independent of wire format.
///
/// Keys iterate in sorted order, so every serialization of a payload is byte-stable.
pub type Payload = serde_json::Map<String, serde_json::Value>;
