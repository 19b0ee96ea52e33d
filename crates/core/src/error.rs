//! Error model for negotiation and serialization.

use thiserror::Error;

/// A media type string failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("media type is empty")]
    Empty,

    #[error("media type `{0}` is missing a `/` separator")]
    MissingSlash(String),

    #[error("media type `{0}` contains an invalid token")]
    InvalidToken(String),

    /// Wildcards are only meaningful in `Accept` ranges, never as a registered type.
    #[error("media type `{0}` must not contain wildcards")]
    Wildcard(String),
}

/// Registry construction failure.
///
/// A registry that cannot always resolve a serializer is rejected at build time,
/// so the application refuses to start instead of failing requests later.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid media type for method {method}: {source}")]
    InvalidMediaType {
        method: String,
        #[source]
        source: MediaTypeError,
    },

    #[error("method {method} registers {media_type} more than once")]
    DuplicateMediaType { method: String, media_type: String },

    #[error("default media type {media_type} is configured for unknown method {method}")]
    DefaultForUnknownMethod { method: String, media_type: String },

    #[error("default media type {media_type} is not registered for method {method}")]
    DefaultNotRegistered { method: String, media_type: String },

    #[error("method {0} has no default media type and no global default is configured")]
    MissingDefault(String),

    #[error("query alias `{alias}` maps to an invalid media type: {source}")]
    InvalidAlias {
        alias: String,
        #[source]
        source: MediaTypeError,
    },

    #[error("no serializers registered")]
    Empty,
}

/// A serializer could not encode a payload.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// XML-RPC `<int>` is a signed 32-bit integer.
    #[error("integer {0} exceeds XML-RPC limits")]
    IntegerOverflow(serde_json::Number),
}

/// Negotiation failure. Only reachable when asked about a method the registry does not serve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("no serializers registered for method {0}")]
    MethodNotRegistered(String),
}

/// Failure of the full negotiate-then-serialize path.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}
