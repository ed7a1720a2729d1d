//! # Message Codecs
//!
//! Binary and JSON conversion for finalized [`MessageType`]s. The
//! operations are exposed as methods on `MessageType`; every one takes the
//! [`TypeLookup`] that nested message and enum fields resolve through.

pub mod binary;
pub mod json;

use protodecl_core::CodecError;

use crate::descriptor::{FieldKind, MessageType, TypeLookup};
use crate::value::Record;
use json::UnknownKeys;

impl MessageType {
    /// Build a record with every default applied, then override the fields
    /// named by `values`.
    ///
    /// Keys that name no field are ignored and `null` keeps the default.
    pub fn create(&self, values: Option<&serde_json::Value>, lookup: &dyn TypeLookup) -> Result<Record, CodecError> {
        match values {
            None | Some(serde_json::Value::Null) => Ok(self.default_record()),
            Some(values) => json::read_record(self, values, lookup, UnknownKeys::Ignore),
        }
    }

    /// Serialize a record to protobuf wire format.
    pub fn to_binary(&self, record: &Record, lookup: &dyn TypeLookup) -> Result<Vec<u8>, CodecError> {
        binary::encode_message(self, record, lookup)
    }

    /// Parse protobuf wire format into a record.
    pub fn from_binary(&self, bytes: &[u8], lookup: &dyn TypeLookup) -> Result<Record, CodecError> {
        binary::decode_message(self, bytes, lookup)
    }

    /// Parse a JSON value in protobuf JSON flavour.
    ///
    /// Unlike [`create`](Self::create), unknown keys are rejected unless the
    /// lookup's options say otherwise.
    pub fn from_json(&self, json: &serde_json::Value, lookup: &dyn TypeLookup) -> Result<Record, CodecError> {
        let unknown = if lookup.codec_options().ignore_unknown_json_fields {
            UnknownKeys::Ignore
        } else {
            UnknownKeys::Reject
        };
        json::read_record(self, json, lookup, unknown)
    }

    /// Parse JSON text in protobuf JSON flavour.
    pub fn from_json_str(&self, text: &str, lookup: &dyn TypeLookup) -> Result<Record, CodecError> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CodecError::json(self.type_name(), e.to_string()))?;
        self.from_json(&json, lookup)
    }

    /// The plain-object JSON view of a record.
    pub fn to_json(&self, record: &Record, lookup: &dyn TypeLookup) -> Result<serde_json::Value, CodecError> {
        json::write_record(self, record, lookup)
    }

    /// Bring a possibly partial record of this type into canonical form.
    ///
    /// Missing trailing slots are treated as empty, so `Record::default()`
    /// normalizes to the all-defaults record. Empty slots of fields that have
    /// a default receive it; unset singular messages stay unset. A record with
    /// more slots than the type has fields is rejected.
    pub fn normalize(&self, record: &Record) -> Result<Record, CodecError> {
        check_slot_count(self, record).map_err(|reason| CodecError::encode(self.type_name(), reason))?;
        let slots = self
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| match record.get(idx) {
                Some(value) => Some(value.clone()),
                None if matches!(field.kind, FieldKind::Message { repeated: false, .. }) => None,
                None => field.kind.default_value(),
            })
            .collect();
        Ok(Record::from_slots(slots))
    }
}

/// A record may leave trailing slots out but never carry more than the type
/// declares.
pub(crate) fn check_slot_count(ty: &MessageType, record: &Record) -> Result<(), String> {
    if record.len() > ty.fields().len() {
        return Err(format!(
            "record has {} slots but the type declares {} fields",
            record.len(),
            ty.fields().len()
        ));
    }
    Ok(())
}
