//! # JSON Conversion
//!
//! Maps records to and from `serde_json` values.
//!
//! Reading is shared by `create` (lenient: keys that name no field are
//! ignored) and debug-JSON decode (strict: such keys are rejected unless
//! [`CodecOptions::ignore_unknown_json_fields`] is set). Both accept a field
//! under its JSON name, declared name or local name, treat `null` as "keep
//! the default", take 64-bit integers as numbers or decimal strings, enums
//! as numbers or value names, and bytes as base64 or an array of octets.
//!
//! Writing produces the plain-object view: `local_name` keys (the declared
//! name where two fields share a local name), unset messages omitted, 64-bit
//! integers as strings, bytes as base64, enums as numbers, and non-finite
//! floats as `"NaN"`, `"Infinity"`, `"-Infinity"`.
//!
//! [`CodecOptions::ignore_unknown_json_fields`]: crate::CodecOptions::ignore_unknown_json_fields

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use protodecl_core::{CodecError, ScalarType};
use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;

use crate::descriptor::{EnumInfo, FieldInfo, FieldKind, MapValueKind, MessageType, TypeLookup};
use crate::value::{MapKey, Record, Value};

/// How keys that name no field are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnknownKeys {
    Ignore,
    Reject,
}

/// Build a record of `ty` from a JSON object.
pub(crate) fn read_record(
    ty: &MessageType,
    json: &Json,
    lookup: &dyn TypeLookup,
    unknown: UnknownKeys,
) -> Result<Record, CodecError> {
    let reader = Reader {
        lookup,
        unknown,
        limit: lookup.codec_options().recursion_limit,
    };
    reader.record(ty, json, 0)
}

/// Render a record of `ty` as its plain-object JSON view.
pub(crate) fn write_record(ty: &MessageType, record: &Record, lookup: &dyn TypeLookup) -> Result<Json, CodecError> {
    Writer { lookup }.record(ty, record)
}

struct Reader<'a> {
    lookup: &'a dyn TypeLookup,
    unknown: UnknownKeys,
    limit: u32,
}

impl Reader<'_> {
    fn record(&self, ty: &MessageType, json: &Json, depth: u32) -> Result<Record, CodecError> {
        if depth > self.limit {
            return Err(CodecError::RecursionLimit { limit: self.limit });
        }
        let object = json
            .as_object()
            .ok_or_else(|| CodecError::json(ty.type_name(), format!("expected object, found {}", json_kind(json))))?;

        let mut record = ty.default_record();
        for (key, value) in object {
            let Some(idx) = ty.field_index(key) else {
                match self.unknown {
                    UnknownKeys::Ignore => continue,
                    UnknownKeys::Reject => {
                        return Err(CodecError::json(ty.type_name(), format!("unknown field '{key}'")));
                    }
                }
            };
            if value.is_null() {
                continue;
            }
            let converted = self.field(ty, &ty.fields()[idx], value, depth)?;
            if let Some(slot) = record.slot_mut(idx) {
                *slot = Some(converted);
            }
        }
        Ok(record)
    }

    fn field(&self, owner: &MessageType, field: &FieldInfo, json: &Json, depth: u32) -> Result<Value, CodecError> {
        let err = |reason: String| CodecError::json(owner.type_name(), format!("field '{}': {reason}", field.name));

        match &field.kind {
            FieldKind::Scalar { ty, repeated: false } => scalar_from_json(*ty, json).map_err(err),
            FieldKind::Scalar { ty, repeated: true } => expect_array(json)
                .and_then(|items| items.iter().map(|j| scalar_from_json(*ty, j)).collect::<Result<Vec<_>, _>>())
                .map(Value::List)
                .map_err(err),
            FieldKind::Enum { ty, repeated } => {
                let info = ty.enumeration(self.lookup)?;
                if *repeated {
                    expect_array(json)
                        .and_then(|items| {
                            items
                                .iter()
                                .map(|j| enum_from_json(&info, j).map(Value::Enum))
                                .collect::<Result<Vec<_>, _>>()
                        })
                        .map(Value::List)
                        .map_err(err)
                } else {
                    enum_from_json(&info, json).map(Value::Enum).map_err(err)
                }
            }
            FieldKind::Message { ty, repeated } => {
                let child = ty.message(self.lookup)?;
                if *repeated {
                    let items = expect_array(json).map_err(err)?;
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(Value::Message(self.record(&child, item, depth + 1)?));
                    }
                    Ok(Value::List(out))
                } else {
                    self.record(&child, json, depth + 1).map(Value::Message)
                }
            }
            FieldKind::Map { key, value } => {
                let object = json
                    .as_object()
                    .ok_or_else(|| err(format!("expected object, found {}", json_kind(json))))?;
                let mut entries = BTreeMap::new();
                for (k, v) in object {
                    let map_key = map_key_from_str(*key, k).map_err(err)?;
                    let map_value = match value {
                        MapValueKind::Scalar(st) => scalar_from_json(*st, v).map_err(err)?,
                        MapValueKind::Enum(r) => {
                            Value::Enum(enum_from_json(&*r.enumeration(self.lookup)?, v).map_err(err)?)
                        }
                        MapValueKind::Message(r) => {
                            Value::Message(self.record(&*r.message(self.lookup)?, v, depth + 1)?)
                        }
                    };
                    entries.insert(map_key, map_value);
                }
                Ok(Value::Map(entries))
            }
        }
    }
}

struct Writer<'a> {
    lookup: &'a dyn TypeLookup,
}

impl Writer<'_> {
    fn record(&self, ty: &MessageType, record: &Record) -> Result<Json, CodecError> {
        super::check_slot_count(ty, record).map_err(|reason| CodecError::json(ty.type_name(), reason))?;
        let mut out = Map::new();
        for (idx, field) in ty.fields().iter().enumerate() {
            if let Some(value) = record.get(idx) {
                let key = ty.plain_key(idx).unwrap_or(&field.local_name);
                out.insert(key.to_string(), self.field(ty, field, value)?);
            }
        }
        Ok(Json::Object(out))
    }

    fn field(&self, owner: &MessageType, field: &FieldInfo, value: &Value) -> Result<Json, CodecError> {
        let err = |reason: String| CodecError::json(owner.type_name(), format!("field '{}': {reason}", field.name));

        match (&field.kind, value) {
            (FieldKind::Message { ty, .. }, Value::Message(record)) => self.record(&*ty.message(self.lookup)?, record),
            (FieldKind::Message { ty, .. }, Value::List(items)) => {
                let child = ty.message(self.lookup)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let record = item
                        .as_message()
                        .ok_or_else(|| err(format!("expected message, found {}", item.kind_name())))?;
                    out.push(self.record(&child, record)?);
                }
                Ok(Json::Array(out))
            }
            (FieldKind::Map { value: kind, .. }, Value::Map(entries)) => {
                let child = match kind {
                    MapValueKind::Message(r) => Some(r.message(self.lookup)?),
                    _ => None,
                };
                let mut out = Map::new();
                for (k, v) in entries {
                    let rendered = match (&child, v) {
                        (Some(child), Value::Message(record)) => self.record(child, record)?,
                        _ => plain_json(v).map_err(err)?,
                    };
                    out.insert(k.to_string(), rendered);
                }
                Ok(Json::Object(out))
            }
            _ => plain_json(value).map_err(err),
        }
    }
}

fn plain_json(value: &Value) -> Result<Json, String> {
    Ok(match value {
        Value::Bool(v) => Json::Bool(*v),
        Value::I32(v) | Value::Enum(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::I64(v) => Json::String(v.to_string()),
        Value::U64(v) => Json::String(v.to_string()),
        Value::F32(v) => float_json(f64::from(*v)),
        Value::F64(v) => float_json(*v),
        Value::String(v) => Json::String(v.clone()),
        Value::Bytes(v) => Json::String(STANDARD.encode(v)),
        Value::List(items) => Json::Array(items.iter().map(plain_json).collect::<Result<_, _>>()?),
        Value::Message(_) | Value::Map(_) => {
            return Err(format!("{} value outside a message or map field", value.kind_name()));
        }
    })
}

fn float_json(v: f64) -> Json {
    match Number::from_f64(v) {
        Some(n) => Json::Number(n),
        None if v.is_nan() => Json::String("NaN".into()),
        None if v.is_sign_positive() => Json::String("Infinity".into()),
        None => Json::String("-Infinity".into()),
    }
}

fn scalar_from_json(ty: ScalarType, json: &Json) -> Result<Value, String> {
    match ty {
        ScalarType::Double => parse_float(json).map(Value::F64),
        ScalarType::Float => {
            let v = parse_float(json)?;
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                return Err(format!("{v} is out of range for float"));
            }
            Ok(Value::F32(v as f32))
        }
        ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => {
            let v = parse_int(json)?;
            i32::try_from(v)
                .map(Value::I32)
                .map_err(|_| format!("{v} is out of range for {ty}"))
        }
        ScalarType::Uint32 | ScalarType::Fixed32 => {
            let v = parse_uint(json)?;
            u32::try_from(v)
                .map(Value::U32)
                .map_err(|_| format!("{v} is out of range for {ty}"))
        }
        ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => parse_int(json).map(Value::I64),
        ScalarType::Uint64 | ScalarType::Fixed64 => parse_uint(json).map(Value::U64),
        ScalarType::Bool => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| format!("expected bool, found {}", json_kind(json))),
        ScalarType::String => json
            .as_str()
            .map(Value::from)
            .ok_or_else(|| format!("expected string, found {}", json_kind(json))),
        ScalarType::Bytes => parse_bytes(json).map(Value::Bytes),
    }
}

fn parse_float(json: &Json) -> Result<f64, String> {
    match json {
        Json::Number(n) => n.as_f64().ok_or_else(|| format!("{n} is not a float")),
        Json::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other.trim().parse().map_err(|_| format!("'{other}' is not a float")),
        },
        other => Err(format!("expected number, found {}", json_kind(other))),
    }
}

fn parse_int(json: &Json) -> Result<i64, String> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| integral_in_range(*f, i64::MIN as f64, i64::MAX as f64)).map(|f| f as i64))
            .ok_or_else(|| format!("{n} is not a signed integer")),
        Json::String(s) => s.trim().parse().map_err(|_| format!("'{s}' is not a signed integer")),
        other => Err(format!("expected integer, found {}", json_kind(other))),
    }
}

fn parse_uint(json: &Json) -> Result<u64, String> {
    match json {
        Json::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| integral_in_range(*f, 0.0, u64::MAX as f64)).map(|f| f as u64))
            .ok_or_else(|| format!("{n} is not an unsigned integer")),
        Json::String(s) => s.trim().parse().map_err(|_| format!("'{s}' is not an unsigned integer")),
        other => Err(format!("expected integer, found {}", json_kind(other))),
    }
}

fn integral_in_range(f: f64, min: f64, max: f64) -> bool {
    f.fract() == 0.0 && f >= min && f < max
}

fn parse_bytes(json: &Json) -> Result<Vec<u8>, String> {
    match json {
        Json::String(s) => STANDARD
            .decode(s)
            .or_else(|_| URL_SAFE.decode(s))
            .map_err(|e| format!("invalid base64: {e}")),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| format!("{item} is not an octet"))
            })
            .collect(),
        other => Err(format!("expected base64 string, found {}", json_kind(other))),
    }
}

fn enum_from_json(info: &EnumInfo, json: &Json) -> Result<i32, String> {
    match json {
        Json::Number(_) => {
            let v = parse_int(json)?;
            i32::try_from(v).map_err(|_| format!("{v} is out of range for enum {}", info.type_name()))
        }
        Json::String(name) => info
            .number_of(name)
            .ok_or_else(|| format!("'{name}' is not a value of enum {}", info.type_name())),
        other => Err(format!("expected enum name or number, found {}", json_kind(other))),
    }
}

fn map_key_from_str(ty: ScalarType, key: &str) -> Result<MapKey, String> {
    let as_json = Json::String(key.to_string());
    match ty {
        ScalarType::Bool => match key {
            "true" => Ok(MapKey::Bool(true)),
            "false" => Ok(MapKey::Bool(false)),
            _ => Err(format!("'{key}' is not a bool map key")),
        },
        ScalarType::String => Ok(MapKey::from(key)),
        _ if ty.is_valid_map_key() => {
            let value = scalar_from_json(ty, &as_json)?;
            MapKey::from_value(value).ok_or_else(|| format!("{ty} is not a valid map key"))
        }
        _ => Err(format!("{ty} is not a valid map key")),
    }
}

fn expect_array(json: &Json) -> Result<&Vec<Json>, String> {
    json.as_array()
        .ok_or_else(|| format!("expected array, found {}", json_kind(json)))
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sixty_four_bit_from_string_or_number() {
        assert_eq!(scalar_from_json(ScalarType::Int64, &json!("-9007199254740993")), Ok(Value::I64(-9_007_199_254_740_993)));
        assert_eq!(scalar_from_json(ScalarType::Uint64, &json!(7)), Ok(Value::U64(7)));
        assert!(scalar_from_json(ScalarType::Uint64, &json!(-1)).is_err());
    }

    #[test]
    fn int32_range_is_checked() {
        assert_eq!(scalar_from_json(ScalarType::Int32, &json!(2.0)), Ok(Value::I32(2)));
        assert!(scalar_from_json(ScalarType::Int32, &json!(3_000_000_000u64)).is_err());
        assert!(scalar_from_json(ScalarType::Int32, &json!(1.5)).is_err());
    }

    #[test]
    fn bytes_accept_base64_and_arrays() {
        assert_eq!(parse_bytes(&json!("AQID")), Ok(vec![1, 2, 3]));
        assert_eq!(parse_bytes(&json!([1, 2, 255])), Ok(vec![1, 2, 255]));
        assert!(parse_bytes(&json!([256])).is_err());
    }

    #[test]
    fn non_finite_floats_render_as_strings() {
        assert_eq!(plain_json(&Value::F64(f64::NAN)), Ok(json!("NaN")));
        assert_eq!(plain_json(&Value::F32(f32::NEG_INFINITY)), Ok(json!("-Infinity")));
        assert_eq!(plain_json(&Value::F64(1.5)), Ok(json!(1.5)));
        assert_eq!(parse_float(&json!("Infinity")), Ok(f64::INFINITY));
    }

    #[test]
    fn wide_integers_render_as_strings() {
        assert_eq!(plain_json(&Value::I64(5)), Ok(json!("5")));
        assert_eq!(plain_json(&Value::U32(5)), Ok(json!(5)));
    }

    #[test]
    fn map_keys_parse_by_kind() {
        assert_eq!(map_key_from_str(ScalarType::Int64, "-4"), Ok(MapKey::I64(-4)));
        assert_eq!(map_key_from_str(ScalarType::Bool, "true"), Ok(MapKey::Bool(true)));
        assert!(map_key_from_str(ScalarType::Double, "1.0").is_err());
    }

    #[test]
    fn enums_by_name_or_number() {
        let info = EnumInfo::new("t.E".into(), vec![("ZERO".to_string(), 0), ("ONE".to_string(), 1)]);
        assert_eq!(enum_from_json(&info, &json!("ONE")), Ok(1));
        assert_eq!(enum_from_json(&info, &json!(9)), Ok(9));
        assert!(enum_from_json(&info, &json!("TWO")).is_err());
    }
}
