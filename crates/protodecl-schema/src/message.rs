//! # Message Wrapper
//!
//! [`DynamicMessage`] pairs a finalized [`MessageType`] with one data
//! [`Record`] and implements the uniform [`Message`] interface on top of it.
//!
//! Field values are read through [`DynamicMessage::get`], which accepts the
//! declared, local or JSON name of any field of the resolved type.

use std::fmt;
use std::future::{ready, Ready};
use std::ops::BitOr;
use std::sync::Arc;

use protodecl_core::CodecError;

use crate::descriptor::{FieldInfo, MessageType, TypeLookup};
use crate::value::{Record, Value};

/// Flags for [`Message::to_debug_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonPrintOptions(u32);

impl JsonPrintOptions {
    /// Compact output.
    pub const NONE: Self = Self(0);
    /// Indented, multi-line output.
    pub const PRETTY: Self = Self(1);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for JsonPrintOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Allocation target accepted by [`Message::clone_message`].
///
/// Dynamic messages own their records, so the target is never consulted.
pub trait MessageArena: Send + Sync {}

/// Uniform interface over a message instance.
pub trait Message {
    /// Fully-qualified name of the message type.
    fn type_name(&self) -> &str;

    /// Serialize to protobuf wire format.
    fn encode(&self) -> Result<Vec<u8>, CodecError>;

    /// [`encode`](Self::encode), delivered as an already-completed future.
    fn encode_async(&self) -> Ready<Result<Vec<u8>, CodecError>> {
        ready(self.encode())
    }

    /// Deep copy. `arena` is accepted for interface compatibility only.
    fn clone_message(&self, arena: Option<&dyn MessageArena>) -> Self
    where
        Self: Sized;

    /// The underlying data record, unchanged.
    fn to_plain_object(&self) -> &Record;

    /// Render the plain object as JSON text.
    fn to_debug_json(&self, options: JsonPrintOptions) -> Result<String, CodecError>;
}

/// A message instance built from a runtime-resolved type.
#[derive(Clone)]
pub struct DynamicMessage {
    lookup: Arc<dyn TypeLookup>,
    message_type: Arc<MessageType>,
    data: Record,
}

impl DynamicMessage {
    pub fn new(lookup: Arc<dyn TypeLookup>, message_type: Arc<MessageType>, data: Record) -> Self {
        Self {
            lookup,
            message_type,
            data,
        }
    }

    pub fn message_type(&self) -> &Arc<MessageType> {
        &self.message_type
    }

    pub fn lookup(&self) -> &dyn TypeLookup {
        self.lookup.as_ref()
    }

    pub fn into_record(self) -> Record {
        self.data
    }

    /// Value of the field named `field`; `None` for unset messages and
    /// unknown names.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.message_type
            .field_index(field)
            .and_then(|idx| self.data.get(idx))
    }

    /// Every field of the type with its current value.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldInfo, Option<&Value>)> + '_ {
        self.message_type
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| (field, self.data.get(idx)))
    }

    /// The plain object as a `serde_json` value.
    pub fn to_json_value(&self) -> Result<serde_json::Value, CodecError> {
        self.message_type.to_json(&self.data, self.lookup.as_ref())
    }
}

impl Message for DynamicMessage {
    fn type_name(&self) -> &str {
        self.message_type.type_name()
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        self.message_type.to_binary(&self.data, self.lookup.as_ref())
    }

    fn clone_message(&self, _arena: Option<&dyn MessageArena>) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            message_type: Arc::clone(&self.message_type),
            data: self.message_type.clone_record(&self.data),
        }
    }

    fn to_plain_object(&self) -> &Record {
        &self.data
    }

    fn to_debug_json(&self, options: JsonPrintOptions) -> Result<String, CodecError> {
        let json = self.to_json_value()?;
        let text = if options.contains(JsonPrintOptions::PRETTY) {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        text.map_err(|e| CodecError::json(self.type_name(), e.to_string()))
    }
}

impl fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicMessage")
            .field("type_name", &self.message_type.type_name())
            .field("data", &self.data)
            .finish()
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.message_type.type_name() == other.message_type.type_name() && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_flags_combine() {
        let both = JsonPrintOptions::PRETTY | JsonPrintOptions::from_bits(4);
        assert!(both.contains(JsonPrintOptions::PRETTY));
        assert!(!JsonPrintOptions::NONE.contains(JsonPrintOptions::PRETTY));
        assert_eq!(both.bits(), 5);
    }
}
