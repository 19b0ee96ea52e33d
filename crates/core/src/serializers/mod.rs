//! Payload serializers, one per supported representation.
//!
//! Each serializer has the [`Serializer`](crate::Serializer) signature so it can be
//! registered directly in a [`SerializerRegistry`](crate::SerializerRegistry).

pub mod json;
pub mod xmlrpc;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";
