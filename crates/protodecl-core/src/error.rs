//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout protodecl. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema errors describe a problem with the descriptor graph itself and
//!   name the offending type or field.
//! - Codec errors describe a problem with one message payload and name the
//!   message type being processed.
//! - A failed lookup never leaves the registry partially mutated; every
//!   error is reported synchronously at the offending call.

use thiserror::Error;

/// Top-level error type for protodecl.
#[derive(Error, Debug)]
pub enum ProtodeclError {
    /// The descriptor graph is malformed or a lookup failed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A message payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// IO error while loading a schema unit.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised while ingesting or resolving descriptors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Bad container framing or an undecodable descriptor set.
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    /// Lookup of a name that was never registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The field uses a wire type this engine does not support (groups).
    #[error("unsupported field '{field}': {reason}")]
    UnsupportedField {
        /// Name of the offending field.
        field: String,
        /// Why the field was rejected.
        reason: String,
    },

    /// A map-entry message lacks a usable `key` or `value` field.
    #[error("invalid map descriptor '{type_name}': {reason}")]
    InvalidMapDescriptor {
        /// Fully-qualified name of the synthetic map-entry message.
        type_name: String,
        /// Which part of the entry could not be resolved.
        reason: String,
    },

    /// A message or enum field carries no referenced type name.
    #[error("field '{field}' does not name its referenced type")]
    MissingTypeName {
        /// Name of the offending field.
        field: String,
    },

    /// Ingestion was attempted after the database was resolved.
    #[error("descriptor database is already resolved; re-ingestion is unsupported")]
    AlreadyResolved,

    /// The field type code is absent or outside the descriptor table.
    #[error("field '{field}' has unknown field type {code:?}")]
    UnknownFieldType {
        /// Name of the offending field.
        field: String,
        /// The raw type code, if one was present.
        code: Option<i32>,
    },
}

/// Error raised while converting a single message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The binary payload does not match the message type.
    #[error("failed to decode '{type_name}': {reason}")]
    Decode {
        /// Fully-qualified name of the message being decoded.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A record does not fit the message type it is being encoded with.
    #[error("failed to encode '{type_name}': {reason}")]
    Encode {
        /// Fully-qualified name of the message being encoded.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A JSON value does not fit the shape of the message type.
    #[error("invalid JSON for '{type_name}': {reason}")]
    Json {
        /// Fully-qualified name of the message being converted.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// Nested messages exceed the configured depth.
    #[error("recursion limit of {limit} nested messages exceeded")]
    RecursionLimit {
        /// The configured limit.
        limit: u32,
    },

    /// A deferred type reference could not be resolved at first use.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CodecError {
    /// Build a [`CodecError::Decode`] for the given message type.
    pub fn decode(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a [`CodecError::Encode`] for the given message type.
    pub fn encode(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Encode {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a [`CodecError::Json`] for the given message type.
    pub fn json(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Json {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_converts_into_top_level() {
        let err: ProtodeclError = SchemaError::UnknownType("test.Missing".into()).into();
        assert_eq!(err.to_string(), "schema error: unknown type: test.Missing");
    }

    #[test]
    fn codec_error_wraps_schema_error_transparently() {
        let err: CodecError = SchemaError::UnknownType("a.B".into()).into();
        assert_eq!(err.to_string(), "unknown type: a.B");
    }

    #[test]
    fn decode_helper_names_the_type() {
        let err = CodecError::decode("test.Message", "truncated");
        assert_eq!(err.to_string(), "failed to decode 'test.Message': truncated");
    }
}
