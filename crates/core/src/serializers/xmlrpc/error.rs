//! XML-RPC decoder error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid xml-rpc: unexpected end of input")]
    UnexpectedEof,
    #[error("invalid xml-rpc: expected {expected} at position {position}")]
    Expected { expected: String, position: usize },
    #[error("invalid xml-rpc: unsupported value type <{0}>")]
    UnknownType(String),
    #[error("invalid xml-rpc: bad number `{0}`")]
    InvalidNumber(String),
    #[error("invalid xml-rpc: bad boolean `{0}`")]
    InvalidBoolean(String),
    #[error("invalid xml-rpc: bad entity `&{0};`")]
    InvalidEntity(String),
    #[error("invalid xml-rpc: values nested deeper than {0}")]
    TooDeep(usize),
    #[error("invalid xml-rpc: trailing content at position {0}")]
    TrailingContent(usize),
    #[error("invalid xml-rpc: expected exactly one parameter, found {0}")]
    ParamCount(usize),
    #[error("invalid xml-rpc: parameter is not a struct")]
    NotAStruct,
}
