//! # Scalar Kinds
//!
//! The fifteen scalar field kinds a descriptor can declare, keyed by their
//! `FieldDescriptorProto.Type` code. Message, enum and group codes are not
//! scalars and map to `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// 64-bit IEEE float, fixed 8 bytes on the wire.
    Double,
    /// 32-bit IEEE float, fixed 4 bytes on the wire.
    Float,
    /// Signed 64-bit varint.
    Int64,
    /// Unsigned 64-bit varint.
    Uint64,
    /// Signed 32-bit varint (negative values take 10 bytes).
    Int32,
    /// Unsigned 64-bit, fixed 8 bytes.
    Fixed64,
    /// Unsigned 32-bit, fixed 4 bytes.
    Fixed32,
    /// Boolean varint.
    Bool,
    /// UTF-8 text, length-delimited.
    String,
    /// Opaque bytes, length-delimited.
    Bytes,
    /// Unsigned 32-bit varint.
    Uint32,
    /// Signed 32-bit, fixed 4 bytes.
    Sfixed32,
    /// Signed 64-bit, fixed 8 bytes.
    Sfixed64,
    /// Signed 32-bit zigzag varint.
    Sint32,
    /// Signed 64-bit zigzag varint.
    Sint64,
}

impl ScalarType {
    /// Map a `FieldDescriptorProto.Type` code to its scalar kind.
    pub fn from_descriptor_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::Double,
            2 => Self::Float,
            3 => Self::Int64,
            4 => Self::Uint64,
            5 => Self::Int32,
            6 => Self::Fixed64,
            7 => Self::Fixed32,
            8 => Self::Bool,
            9 => Self::String,
            12 => Self::Bytes,
            13 => Self::Uint32,
            15 => Self::Sfixed32,
            16 => Self::Sfixed64,
            17 => Self::Sint32,
            18 => Self::Sint64,
            _ => return None,
        })
    }

    /// Returns the proto keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uint32 => "uint32",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
        }
    }

    /// Repeated fields of this kind may use packed encoding.
    pub fn is_packable(&self) -> bool {
        !matches!(self, Self::String | Self::Bytes)
    }

    /// The kind may be used as a map key (integral, bool or string).
    pub fn is_valid_map_key(&self) -> bool {
        !matches!(self, Self::Double | Self::Float | Self::Bytes)
    }

    /// The kind holds a 64-bit integer.
    pub fn is_64_bit_integer(&self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::Uint64 | Self::Fixed64 | Self::Sfixed64 | Self::Sint64
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire field-type code of a group field.
pub const FIELD_TYPE_GROUP: i32 = 10;
/// Wire field-type code of a message field.
pub const FIELD_TYPE_MESSAGE: i32 = 11;
/// Wire field-type code of an enum field.
pub const FIELD_TYPE_ENUM: i32 = 14;
