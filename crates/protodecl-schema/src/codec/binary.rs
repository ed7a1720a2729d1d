//! # Binary Codec
//!
//! Protobuf wire-format conversion between [`Record`]s and bytes, driven by
//! a finalized [`MessageType`]. Per-scalar varint/fixed/length-delimited
//! encoding is delegated to `prost::encoding`; this module only walks the
//! field list, applies the default-omission rules and resolves nested types
//! through [`TypeLookup`].
//!
//! ## Encoding Rules
//!
//! - Fields are written in ascending field-number order.
//! - Singular scalars and enums are omitted when equal to their default;
//!   unset singular messages are omitted.
//! - Repeated numeric, bool and enum fields are written packed; repeated
//!   string, bytes and message fields are written one element at a time.
//! - Map entries always carry both key (1) and value (2).
//!
//! ## Decoding Rules
//!
//! Packed and unpacked repeated encodings are both accepted, the last
//! singular scalar wins, singular messages merge, and unknown fields are
//! skipped. Nesting deeper than the configured recursion limit fails.

use prost::encoding::{
    self, check_wire_type, decode_key, decode_varint, encode_key, encode_varint, skip_field,
    DecodeContext, WireType,
};
use protodecl_core::{CodecError, ScalarType};
use std::collections::BTreeMap;

use crate::descriptor::{FieldInfo, FieldKind, MapValueKind, MessageType, TypeLookup};
use crate::value::{MapKey, Record, Value};

/// Serialize `record` as a `ty` message.
pub fn encode_message(ty: &MessageType, record: &Record, lookup: &dyn TypeLookup) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    encode_record(ty, record, lookup, &mut buf)?;
    Ok(buf)
}

/// Parse `bytes` as a `ty` message, applying defaults to absent fields.
pub fn decode_message(ty: &MessageType, bytes: &[u8], lookup: &dyn TypeLookup) -> Result<Record, CodecError> {
    let limit = lookup.codec_options().recursion_limit;
    let mut record = ty.default_record();
    merge_record(ty, &mut record, bytes, lookup, 0, limit)?;
    Ok(record)
}

fn encode_record(ty: &MessageType, record: &Record, lookup: &dyn TypeLookup, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    super::check_slot_count(ty, record).map_err(|reason| CodecError::encode(ty.type_name(), reason))?;
    for &idx in ty.wire_order() {
        let field = &ty.fields()[idx];
        if let Some(value) = record.get(idx) {
            encode_field(ty, field, value, lookup, buf)?;
        }
    }
    Ok(())
}

fn encode_field(
    owner: &MessageType,
    field: &FieldInfo,
    value: &Value,
    lookup: &dyn TypeLookup,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let tag = field.number;
    let mismatch = |reason: String| CodecError::encode(owner.type_name(), format!("field '{}': {reason}", field.name));

    match &field.kind {
        FieldKind::Scalar { ty, repeated: false } => {
            if !value.is_default() {
                encode_scalar(*ty, tag, value, buf).map_err(mismatch)?;
            } else if !value.matches_scalar(*ty) {
                return Err(mismatch(scalar_mismatch(*ty, value)));
            }
        }
        FieldKind::Scalar { ty, repeated: true } => {
            let items = expect_list(value).map_err(mismatch)?;
            if items.is_empty() {
                return Ok(());
            }
            if ty.is_packable() {
                encode_packed(*ty, tag, items, buf).map_err(mismatch)?;
            } else {
                for item in items {
                    encode_scalar(*ty, tag, item, buf).map_err(mismatch)?;
                }
            }
        }
        FieldKind::Enum { repeated: false, .. } => {
            let n = expect_enum(value).map_err(mismatch)?;
            if n != 0 {
                encoding::int32::encode(tag, &n, buf);
            }
        }
        FieldKind::Enum { repeated: true, .. } => {
            let items = expect_list(value).map_err(mismatch)?;
            let numbers = items.iter().map(expect_enum).collect::<Result<Vec<i32>, _>>().map_err(mismatch)?;
            if !numbers.is_empty() {
                encoding::int32::encode_packed(tag, &numbers, buf);
            }
        }
        FieldKind::Message { ty, repeated: false } => {
            let child = ty.message(lookup)?;
            let record = expect_message(value).map_err(mismatch)?;
            encode_nested(&child, record, tag, lookup, buf)?;
        }
        FieldKind::Message { ty, repeated: true } => {
            let items = expect_list(value).map_err(mismatch)?;
            if items.is_empty() {
                return Ok(());
            }
            let child = ty.message(lookup)?;
            for item in items {
                let record = expect_message(item).map_err(mismatch)?;
                encode_nested(&child, record, tag, lookup, buf)?;
            }
        }
        FieldKind::Map { key, value: value_kind } => {
            let entries = match value {
                Value::Map(m) => m,
                other => return Err(mismatch(format!("expected map, found {}", other.kind_name()))),
            };
            for (k, v) in entries {
                let mut entry = Vec::new();
                encode_scalar(*key, 1, &k.to_value(), &mut entry).map_err(mismatch)?;
                match value_kind {
                    MapValueKind::Scalar(st) => encode_scalar(*st, 2, v, &mut entry).map_err(mismatch)?,
                    MapValueKind::Enum(_) => {
                        let n = expect_enum(v).map_err(mismatch)?;
                        encoding::int32::encode(2, &n, &mut entry);
                    }
                    MapValueKind::Message(r) => {
                        let child = r.message(lookup)?;
                        let record = expect_message(v).map_err(mismatch)?;
                        encode_nested(&child, record, 2, lookup, &mut entry)?;
                    }
                }
                encode_key(tag, WireType::LengthDelimited, buf);
                encode_varint(entry.len() as u64, buf);
                buf.extend_from_slice(&entry);
            }
        }
    }
    Ok(())
}

fn encode_nested(
    child: &MessageType,
    record: &Record,
    tag: u32,
    lookup: &dyn TypeLookup,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let mut body = Vec::new();
    encode_record(child, record, lookup, &mut body)?;
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(body.len() as u64, buf);
    buf.extend_from_slice(&body);
    Ok(())
}

fn encode_scalar(ty: ScalarType, tag: u32, value: &Value, buf: &mut Vec<u8>) -> Result<(), String> {
    match (ty, value) {
        (ScalarType::Double, Value::F64(v)) => encoding::double::encode(tag, v, buf),
        (ScalarType::Float, Value::F32(v)) => encoding::float::encode(tag, v, buf),
        (ScalarType::Int64, Value::I64(v)) => encoding::int64::encode(tag, v, buf),
        (ScalarType::Sint64, Value::I64(v)) => encoding::sint64::encode(tag, v, buf),
        (ScalarType::Sfixed64, Value::I64(v)) => encoding::sfixed64::encode(tag, v, buf),
        (ScalarType::Uint64, Value::U64(v)) => encoding::uint64::encode(tag, v, buf),
        (ScalarType::Fixed64, Value::U64(v)) => encoding::fixed64::encode(tag, v, buf),
        (ScalarType::Int32, Value::I32(v)) => encoding::int32::encode(tag, v, buf),
        (ScalarType::Sint32, Value::I32(v)) => encoding::sint32::encode(tag, v, buf),
        (ScalarType::Sfixed32, Value::I32(v)) => encoding::sfixed32::encode(tag, v, buf),
        (ScalarType::Uint32, Value::U32(v)) => encoding::uint32::encode(tag, v, buf),
        (ScalarType::Fixed32, Value::U32(v)) => encoding::fixed32::encode(tag, v, buf),
        (ScalarType::Bool, Value::Bool(v)) => encoding::bool::encode(tag, v, buf),
        (ScalarType::String, Value::String(v)) => encoding::string::encode(tag, v, buf),
        (ScalarType::Bytes, Value::Bytes(v)) => encoding::bytes::encode(tag, v, buf),
        _ => return Err(scalar_mismatch(ty, value)),
    }
    Ok(())
}

macro_rules! pack {
    ($module:ident, $variant:ident, $ty:expr, $tag:expr, $items:expr, $buf:expr) => {{
        let mut values = Vec::with_capacity($items.len());
        for item in $items {
            match item {
                Value::$variant(v) => values.push(*v),
                other => return Err(scalar_mismatch($ty, other)),
            }
        }
        encoding::$module::encode_packed($tag, &values, $buf);
    }};
}

fn encode_packed(ty: ScalarType, tag: u32, items: &[Value], buf: &mut Vec<u8>) -> Result<(), String> {
    match ty {
        ScalarType::Double => pack!(double, F64, ty, tag, items, buf),
        ScalarType::Float => pack!(float, F32, ty, tag, items, buf),
        ScalarType::Int64 => pack!(int64, I64, ty, tag, items, buf),
        ScalarType::Sint64 => pack!(sint64, I64, ty, tag, items, buf),
        ScalarType::Sfixed64 => pack!(sfixed64, I64, ty, tag, items, buf),
        ScalarType::Uint64 => pack!(uint64, U64, ty, tag, items, buf),
        ScalarType::Fixed64 => pack!(fixed64, U64, ty, tag, items, buf),
        ScalarType::Int32 => pack!(int32, I32, ty, tag, items, buf),
        ScalarType::Sint32 => pack!(sint32, I32, ty, tag, items, buf),
        ScalarType::Sfixed32 => pack!(sfixed32, I32, ty, tag, items, buf),
        ScalarType::Uint32 => pack!(uint32, U32, ty, tag, items, buf),
        ScalarType::Fixed32 => pack!(fixed32, U32, ty, tag, items, buf),
        ScalarType::Bool => pack!(bool, Bool, ty, tag, items, buf),
        ScalarType::String | ScalarType::Bytes => return Err(format!("{ty} cannot be packed")),
    }
    Ok(())
}

fn scalar_mismatch(ty: ScalarType, value: &Value) -> String {
    format!("expected {ty}, found {}", value.kind_name())
}

fn expect_list(value: &Value) -> Result<&[Value], String> {
    value
        .as_list()
        .ok_or_else(|| format!("expected list, found {}", value.kind_name()))
}

fn expect_enum(value: &Value) -> Result<i32, String> {
    match value {
        Value::Enum(n) | Value::I32(n) => Ok(*n),
        other => Err(format!("expected enum, found {}", other.kind_name())),
    }
}

fn expect_message(value: &Value) -> Result<&Record, String> {
    value
        .as_message()
        .ok_or_else(|| format!("expected message, found {}", value.kind_name()))
}

fn merge_record(
    ty: &MessageType,
    record: &mut Record,
    mut buf: &[u8],
    lookup: &dyn TypeLookup,
    depth: u32,
    limit: u32,
) -> Result<(), CodecError> {
    if depth > limit {
        return Err(CodecError::RecursionLimit { limit });
    }
    let wire = |e: prost::DecodeError| CodecError::decode(ty.type_name(), e.to_string());

    while !buf.is_empty() {
        let (tag, wire_type) = decode_key(&mut buf).map_err(wire)?;
        let Some(idx) = ty.fields().iter().position(|f| f.number == tag) else {
            tracing::trace!(type_name = ty.type_name(), tag, "skipping unknown field");
            skip_field(wire_type, tag, &mut buf, DecodeContext::default()).map_err(wire)?;
            continue;
        };
        let field = &ty.fields()[idx];
        let slot = record
            .slot_mut(idx)
            .ok_or_else(|| CodecError::decode(ty.type_name(), "record does not match its type"))?;

        match &field.kind {
            FieldKind::Scalar { ty: st, repeated: false } => {
                *slot = Some(merge_scalar(*st, wire_type, &mut buf).map_err(wire)?);
            }
            FieldKind::Scalar { ty: st, repeated: true } => {
                let mut items = take_list(slot);
                merge_repeated_scalar(*st, wire_type, &mut buf, &mut items).map_err(wire)?;
                *slot = Some(Value::List(items));
            }
            FieldKind::Enum { repeated: false, .. } => {
                let mut n = 0i32;
                encoding::int32::merge(wire_type, &mut n, &mut buf, DecodeContext::default()).map_err(wire)?;
                *slot = Some(Value::Enum(n));
            }
            FieldKind::Enum { repeated: true, .. } => {
                let mut numbers = Vec::new();
                encoding::int32::merge_repeated(wire_type, &mut numbers, &mut buf, DecodeContext::default())
                    .map_err(wire)?;
                let mut items = take_list(slot);
                items.extend(numbers.into_iter().map(Value::Enum));
                *slot = Some(Value::List(items));
            }
            FieldKind::Message { ty: target, repeated } => {
                check_wire_type(WireType::LengthDelimited, wire_type).map_err(wire)?;
                let body = take_length_delimited(&mut buf).map_err(|r| CodecError::decode(ty.type_name(), r))?;
                let child = target.message(lookup)?;
                if *repeated {
                    let mut nested = child.default_record();
                    merge_record(&child, &mut nested, body, lookup, depth + 1, limit)?;
                    let mut items = take_list(slot);
                    items.push(Value::Message(nested));
                    *slot = Some(Value::List(items));
                } else {
                    let mut nested = match slot.take() {
                        Some(Value::Message(existing)) => existing,
                        _ => child.default_record(),
                    };
                    merge_record(&child, &mut nested, body, lookup, depth + 1, limit)?;
                    *slot = Some(Value::Message(nested));
                }
            }
            FieldKind::Map { key, value } => {
                check_wire_type(WireType::LengthDelimited, wire_type).map_err(wire)?;
                let body = take_length_delimited(&mut buf).map_err(|r| CodecError::decode(ty.type_name(), r))?;
                let (k, v) = merge_map_entry(ty, *key, value, body, lookup, depth, limit)?;
                let mut entries = take_map(slot);
                entries.insert(k, v);
                *slot = Some(Value::Map(entries));
            }
        }
    }
    Ok(())
}

fn merge_map_entry(
    owner: &MessageType,
    key_ty: ScalarType,
    value_kind: &MapValueKind,
    mut body: &[u8],
    lookup: &dyn TypeLookup,
    depth: u32,
    limit: u32,
) -> Result<(MapKey, Value), CodecError> {
    let wire = |e: prost::DecodeError| CodecError::decode(owner.type_name(), e.to_string());
    let mut key = Value::default_scalar(key_ty);
    let mut value: Option<Value> = None;

    while !body.is_empty() {
        let (tag, wire_type) = decode_key(&mut body).map_err(wire)?;
        match tag {
            1 => key = merge_scalar(key_ty, wire_type, &mut body).map_err(wire)?,
            2 => {
                value = Some(match value_kind {
                    MapValueKind::Scalar(st) => merge_scalar(*st, wire_type, &mut body).map_err(wire)?,
                    MapValueKind::Enum(_) => {
                        let mut n = 0i32;
                        encoding::int32::merge(wire_type, &mut n, &mut body, DecodeContext::default())
                            .map_err(wire)?;
                        Value::Enum(n)
                    }
                    MapValueKind::Message(target) => {
                        check_wire_type(WireType::LengthDelimited, wire_type).map_err(wire)?;
                        let nested_body =
                            take_length_delimited(&mut body).map_err(|r| CodecError::decode(owner.type_name(), r))?;
                        let child = target.message(lookup)?;
                        let mut nested = match value.take() {
                            Some(Value::Message(existing)) => existing,
                            _ => child.default_record(),
                        };
                        merge_record(&child, &mut nested, nested_body, lookup, depth + 1, limit)?;
                        Value::Message(nested)
                    }
                });
            }
            _ => skip_field(wire_type, tag, &mut body, DecodeContext::default()).map_err(wire)?,
        }
    }

    let value = match value {
        Some(v) => v,
        None => match value_kind {
            MapValueKind::Scalar(st) => Value::default_scalar(*st),
            MapValueKind::Enum(_) => Value::Enum(0),
            MapValueKind::Message(target) => Value::Message(target.message(lookup)?.default_record()),
        },
    };
    let key = MapKey::from_value(key)
        .ok_or_else(|| CodecError::decode(owner.type_name(), format!("{key_ty} is not a valid map key")))?;
    Ok((key, value))
}

macro_rules! merge_one {
    ($module:ident, $variant:ident, $init:expr, $wire_type:expr, $buf:expr) => {{
        let mut v = $init;
        encoding::$module::merge($wire_type, &mut v, $buf, DecodeContext::default())?;
        Value::$variant(v)
    }};
}

fn merge_scalar(ty: ScalarType, wire_type: WireType, buf: &mut &[u8]) -> Result<Value, prost::DecodeError> {
    Ok(match ty {
        ScalarType::Double => merge_one!(double, F64, 0f64, wire_type, buf),
        ScalarType::Float => merge_one!(float, F32, 0f32, wire_type, buf),
        ScalarType::Int64 => merge_one!(int64, I64, 0i64, wire_type, buf),
        ScalarType::Sint64 => merge_one!(sint64, I64, 0i64, wire_type, buf),
        ScalarType::Sfixed64 => merge_one!(sfixed64, I64, 0i64, wire_type, buf),
        ScalarType::Uint64 => merge_one!(uint64, U64, 0u64, wire_type, buf),
        ScalarType::Fixed64 => merge_one!(fixed64, U64, 0u64, wire_type, buf),
        ScalarType::Int32 => merge_one!(int32, I32, 0i32, wire_type, buf),
        ScalarType::Sint32 => merge_one!(sint32, I32, 0i32, wire_type, buf),
        ScalarType::Sfixed32 => merge_one!(sfixed32, I32, 0i32, wire_type, buf),
        ScalarType::Uint32 => merge_one!(uint32, U32, 0u32, wire_type, buf),
        ScalarType::Fixed32 => merge_one!(fixed32, U32, 0u32, wire_type, buf),
        ScalarType::Bool => merge_one!(bool, Bool, false, wire_type, buf),
        ScalarType::String => merge_one!(string, String, String::new(), wire_type, buf),
        ScalarType::Bytes => merge_one!(bytes, Bytes, Vec::<u8>::new(), wire_type, buf),
    })
}

macro_rules! merge_many {
    ($module:ident, $variant:ident, $elem:ty, $wire_type:expr, $buf:expr, $out:expr) => {{
        let mut values: Vec<$elem> = Vec::new();
        encoding::$module::merge_repeated($wire_type, &mut values, $buf, DecodeContext::default())?;
        $out.extend(values.into_iter().map(Value::$variant));
    }};
}

fn merge_repeated_scalar(
    ty: ScalarType,
    wire_type: WireType,
    buf: &mut &[u8],
    out: &mut Vec<Value>,
) -> Result<(), prost::DecodeError> {
    match ty {
        ScalarType::Double => merge_many!(double, F64, f64, wire_type, buf, out),
        ScalarType::Float => merge_many!(float, F32, f32, wire_type, buf, out),
        ScalarType::Int64 => merge_many!(int64, I64, i64, wire_type, buf, out),
        ScalarType::Sint64 => merge_many!(sint64, I64, i64, wire_type, buf, out),
        ScalarType::Sfixed64 => merge_many!(sfixed64, I64, i64, wire_type, buf, out),
        ScalarType::Uint64 => merge_many!(uint64, U64, u64, wire_type, buf, out),
        ScalarType::Fixed64 => merge_many!(fixed64, U64, u64, wire_type, buf, out),
        ScalarType::Int32 => merge_many!(int32, I32, i32, wire_type, buf, out),
        ScalarType::Sint32 => merge_many!(sint32, I32, i32, wire_type, buf, out),
        ScalarType::Sfixed32 => merge_many!(sfixed32, I32, i32, wire_type, buf, out),
        ScalarType::Uint32 => merge_many!(uint32, U32, u32, wire_type, buf, out),
        ScalarType::Fixed32 => merge_many!(fixed32, U32, u32, wire_type, buf, out),
        ScalarType::Bool => merge_many!(bool, Bool, bool, wire_type, buf, out),
        ScalarType::String => merge_many!(string, String, String, wire_type, buf, out),
        ScalarType::Bytes => merge_many!(bytes, Bytes, Vec<u8>, wire_type, buf, out),
    }
    Ok(())
}

fn take_length_delimited<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], String> {
    let len = decode_varint(buf).map_err(|e| e.to_string())?;
    let len = usize::try_from(len)
        .ok()
        .filter(|&l| l <= buf.len())
        .ok_or_else(|| format!("length-delimited field of {len} bytes overruns buffer"))?;
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

fn take_list(slot: &mut Option<Value>) -> Vec<Value> {
    match slot.take() {
        Some(Value::List(items)) => items,
        _ => Vec::new(),
    }
}

fn take_map(slot: &mut Option<Value>) -> BTreeMap<MapKey, Value> {
    match slot.take() {
        Some(Value::Map(entries)) => entries,
        _ => BTreeMap::new(),
    }
}
