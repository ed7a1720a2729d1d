//! # Dynamic Values
//!
//! The data model of a created or decoded message. A [`Record`] holds one
//! slot per field of its [`MessageType`](crate::MessageType), in declared
//! order; the type supplies names, kinds and defaults, the record only
//! stores values.

use std::collections::BTreeMap;
use std::fmt;

use protodecl_core::ScalarType;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `bool`.
    Bool(bool),
    /// `int32`, `sint32`, `sfixed32`.
    I32(i32),
    /// `int64`, `sint64`, `sfixed64`.
    I64(i64),
    /// `uint32`, `fixed32`.
    U32(u32),
    /// `uint64`, `fixed64`.
    U64(u64),
    /// `float`.
    F32(f32),
    /// `double`.
    F64(f64),
    /// `string`.
    String(String),
    /// `bytes`.
    Bytes(Vec<u8>),
    /// Enum value number.
    Enum(i32),
    /// Nested message.
    Message(Record),
    /// Repeated field.
    List(Vec<Value>),
    /// Map field, ordered by key.
    Map(BTreeMap<MapKey, Value>),
}

impl Value {
    /// The zero value of a scalar kind.
    pub fn default_scalar(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Double => Self::F64(0.0),
            ScalarType::Float => Self::F32(0.0),
            ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => Self::I64(0),
            ScalarType::Uint64 | ScalarType::Fixed64 => Self::U64(0),
            ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => Self::I32(0),
            ScalarType::Uint32 | ScalarType::Fixed32 => Self::U32(0),
            ScalarType::Bool => Self::Bool(false),
            ScalarType::String => Self::String(String::new()),
            ScalarType::Bytes => Self::Bytes(Vec::new()),
        }
    }

    /// True if the value equals the zero value of its variant.
    ///
    /// `-0.0` counts as non-default so that it survives a binary round trip.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::I32(v) | Self::Enum(v) => *v == 0,
            Self::I64(v) => *v == 0,
            Self::U32(v) => *v == 0,
            Self::U64(v) => *v == 0,
            Self::F32(v) => v.to_bits() == 0,
            Self::F64(v) => v.to_bits() == 0,
            Self::String(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Message(_) => false,
            Self::List(l) => l.is_empty(),
            Self::Map(m) => m.is_empty(),
        }
    }

    /// True if the variant is the one used to store `ty`.
    pub fn matches_scalar(&self, ty: ScalarType) -> bool {
        matches!(
            (self, ty),
            (Self::F64(_), ScalarType::Double)
                | (Self::F32(_), ScalarType::Float)
                | (
                    Self::I64(_),
                    ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64
                )
                | (Self::U64(_), ScalarType::Uint64 | ScalarType::Fixed64)
                | (
                    Self::I32(_),
                    ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32
                )
                | (Self::U32(_), ScalarType::Uint32 | ScalarType::Fixed32)
                | (Self::Bool(_), ScalarType::Bool)
                | (Self::String(_), ScalarType::String)
                | (Self::Bytes(_), ScalarType::Bytes)
        )
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed integer view of any integral or enum variant that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I32(v) | Self::Enum(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::U32(v) => Some(i64::from(*v)),
            Self::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Record> {
        match self {
            Self::Message(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Message(v)
    }
}

/// A map key. Keys are restricted to integral, bool and string kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl MapKey {
    /// Convert a scalar value into a key, if the variant is a valid key.
    pub fn from_value(value: Value) -> Option<Self> {
        Some(match value {
            Value::Bool(v) => Self::Bool(v),
            Value::I32(v) => Self::I32(v),
            Value::I64(v) => Self::I64(v),
            Value::U32(v) => Self::U32(v),
            Value::U64(v) => Self::U64(v),
            Value::String(v) => Self::String(v),
            _ => return None,
        })
    }

    /// The key as a scalar value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(*v),
            Self::I32(v) => Value::I32(*v),
            Self::I64(v) => Value::I64(*v),
            Self::U32(v) => Value::U32(*v),
            Self::U64(v) => Value::U64(*v),
            Self::String(v) => Value::String(v.clone()),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for MapKey {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// The data record of one message instance.
///
/// Slots line up with the owning type's field list. `None` marks an unset
/// singular message field; every other field always holds a value once the
/// record has been created or decoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    slots: Vec<Option<Value>>,
}

impl Record {
    pub(crate) fn from_slots(slots: Vec<Option<Value>>) -> Self {
        Self { slots }
    }

    /// Number of slots. Records built by the codec carry one per declared
    /// field; trailing slots left out read as unset.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value of the slot at `index`, if set.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable access to the slot at `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<Value>> {
        self.slots.get_mut(index)
    }

    /// All slots in field order.
    pub fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }
}
