//! # Descriptor Database: Two-Pass Type Registry
//!
//! Ingests `FileDescriptorSet` buffers into pending type records (pass 1)
//! and finalizes them into immutable [`MessageType`]s (pass 2).
//!
//! ## Ingestion
//!
//! Each file is staged in isolation and committed only once every one of
//! its descriptors converted cleanly, so a failing file never leaves half
//! of its types behind. Within a message, nested types are ingested before
//! the message's own fields are converted: a map field refers to a nested
//! map-entry message, and that entry must already be synthesized into a
//! map type when the field is seen. Map-entry messages are never listed as
//! visible types.
//!
//! Files whose package name is not a strict dotted identifier, or whose file
//! name contains control characters, are skipped with a warning while the
//! rest of the batch is ingested.
//!
//! ## Resolution
//!
//! [`DescriptorDatabase::resolve`] finalizes every pending record.
//! Message- and enum-typed fields become [`TypeRef`]s, which look their
//! target up by name at first use; finalizing a type therefore never
//! touches another type and cyclic graphs finalize without recursion.
//! Lookups against a still-pending name finalize that one record on demand,
//! so the resolution order is irrelevant.
//!
//! ## Concurrency
//!
//! Ingestion and `resolve` take `&mut self`. After resolution the database
//! is read-only and may be shared behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use prost::Message as _;
use prost_types::field_descriptor_proto::Label;
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use protodecl_core::{
    contains_control_chars, is_valid_package_name, strip_container, FullyQualifiedName, ScalarType, SchemaError,
    FIELD_TYPE_ENUM, FIELD_TYPE_GROUP, FIELD_TYPE_MESSAGE,
};
use serde::Serialize;

use crate::descriptor::{
    colliding_local_names, lower_camel_case, EnumInfo, FieldInfo, FieldKind, MapValueKind, MessageType, TypeLookup,
    TypeRef,
};
use crate::options::CodecOptions;

/// Field numbers a protobuf message may declare.
pub const FIELD_NUMBER_RANGE: std::ops::RangeInclusive<u32> = 1..=536_870_911;

/// A visible type in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredDescriptor {
    /// Fully-qualified name with its parent chain.
    pub name: Arc<FullyQualifiedName>,
    /// True for enums, false for messages.
    pub is_enum: bool,
}

/// Outcome of [`DescriptorDatabase::add_file_descriptor_set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Files whose types were registered.
    pub files_ingested: usize,
    /// Files rejected by package or file-name validation.
    pub files_skipped: usize,
}

#[derive(Debug, Clone)]
struct MapType {
    key: ScalarType,
    value: MapValueKind,
}

#[derive(Debug, Clone)]
enum PendingKind {
    Scalar { ty: ScalarType, repeated: bool },
    Map { key: ScalarType, value: MapValueKind },
    Message { type_name: String, repeated: bool },
    Enum { type_name: String, repeated: bool },
}

#[derive(Debug, Clone)]
struct PendingField {
    number: u32,
    name: String,
    json_name: Option<String>,
    kind: PendingKind,
}

impl PendingField {
    fn finalize(&self) -> FieldInfo {
        let kind = match &self.kind {
            PendingKind::Scalar { ty, repeated } => FieldKind::Scalar {
                ty: *ty,
                repeated: *repeated,
            },
            PendingKind::Map { key, value } => FieldKind::Map {
                key: *key,
                value: value.clone(),
            },
            PendingKind::Message { type_name, repeated } => FieldKind::Message {
                ty: TypeRef::new(type_name),
                repeated: *repeated,
            },
            PendingKind::Enum { type_name, repeated } => FieldKind::Enum {
                ty: TypeRef::new(type_name),
                repeated: *repeated,
            },
        };
        FieldInfo::new(self.number, &self.name, self.json_name.as_deref(), kind)
    }
}

#[derive(Debug)]
struct PendingMessageType {
    type_name: String,
    fields: Vec<PendingField>,
    finalized: OnceLock<Arc<MessageType>>,
}

impl PendingMessageType {
    fn finalize(&self) -> Arc<MessageType> {
        self.finalized
            .get_or_init(|| {
                let fields = self.fields.iter().map(PendingField::finalize).collect();
                Arc::new(MessageType::new(self.type_name.clone(), fields))
            })
            .clone()
    }
}

/// Types converted from one file, not yet visible to lookups.
#[derive(Default)]
struct Staging {
    messages: Vec<PendingMessageType>,
    map_types: HashMap<String, MapType>,
    enums: Vec<EnumInfo>,
    descriptors: Vec<RegisteredDescriptor>,
}

/// Registry of message and enum types decoded from descriptor sets.
#[derive(Debug, Default)]
pub struct DescriptorDatabase {
    options: CodecOptions,
    pending: HashMap<String, PendingMessageType>,
    messages: HashMap<String, Arc<MessageType>>,
    map_types: HashMap<String, MapType>,
    enums: HashMap<String, Arc<EnumInfo>>,
    descriptors: Vec<RegisteredDescriptor>,
    listed: HashSet<String>,
    resolved: bool,
}

impl DescriptorDatabase {
    /// Empty database with default codec options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty database whose codecs run with `options`.
    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// True once [`resolve`](Self::resolve) has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Ingest a (possibly container-framed) serialized `FileDescriptorSet`.
    ///
    /// Files failing package or file-name validation are skipped. Any other
    /// failure aborts the batch; files ingested before it stay registered.
    pub fn add_file_descriptor_set(&mut self, buffer: &[u8]) -> Result<IngestSummary, SchemaError> {
        if self.resolved {
            return Err(SchemaError::AlreadyResolved);
        }
        let payload = strip_container(buffer)?;
        let set = FileDescriptorSet::decode(payload)
            .map_err(|e| SchemaError::MalformedSchema(format!("invalid descriptor set: {e}")))?;

        let mut summary = IngestSummary::default();
        for file in &set.file {
            if let Some(reason) = rejection_reason(file) {
                tracing::warn!(file = file.name(), package = file.package(), reason, "skipping file descriptor");
                summary.files_skipped += 1;
                continue;
            }
            self.add_file_descriptor(file)?;
            summary.files_ingested += 1;
        }

        tracing::debug!(
            files_ingested = summary.files_ingested,
            files_skipped = summary.files_skipped,
            "ingested descriptor set"
        );
        Ok(summary)
    }

    /// Ingest one file: top-level messages, then top-level enums.
    pub fn add_file_descriptor(&mut self, file: &FileDescriptorProto) -> Result<(), SchemaError> {
        if self.resolved {
            return Err(SchemaError::AlreadyResolved);
        }
        let package = FullyQualifiedName::parse(file.package());
        let mut staging = Staging::default();
        for message in &file.message_type {
            self.add_descriptor(&mut staging, package.as_ref(), message)?;
        }
        for enumeration in &file.enum_type {
            add_enum_descriptor(&mut staging, package.as_ref(), enumeration);
        }

        tracing::debug!(
            file = file.name(),
            messages = staging.messages.len(),
            enums = staging.enums.len(),
            map_types = staging.map_types.len(),
            "ingested file descriptor"
        );
        self.commit(staging);
        Ok(())
    }

    fn add_descriptor(
        &self,
        staging: &mut Staging,
        parent: Option<&Arc<FullyQualifiedName>>,
        descriptor: &DescriptorProto,
    ) -> Result<(), SchemaError> {
        if descriptor.name().is_empty() {
            return Ok(());
        }
        let fqn = Arc::new(FullyQualifiedName::new(parent.cloned(), descriptor.name()));

        if descriptor.options.as_ref().is_some_and(|o| o.map_entry()) {
            let map_type = self.synthesize_map(staging, &fqn, descriptor)?;
            staging.map_types.insert(fqn.full_name().to_string(), map_type);
            return Ok(());
        }

        // Nested map entries must exist before this message's fields convert.
        for nested in &descriptor.nested_type {
            self.add_descriptor(staging, Some(&fqn), nested)?;
        }
        let fields = descriptor
            .field
            .iter()
            .map(|field| self.convert_field(staging, field))
            .collect::<Result<Vec<_>, _>>()?;
        let local_names: Vec<String> = fields.iter().map(|f| lower_camel_case(&f.name)).collect();
        for shared in colliding_local_names(local_names.iter().map(String::as_str)) {
            tracing::warn!(
                type_name = fqn.full_name(),
                local_name = shared,
                "fields share a local name; the plain object keys them by declared name"
            );
        }

        staging.messages.push(PendingMessageType {
            type_name: fqn.full_name().to_string(),
            fields,
            finalized: OnceLock::new(),
        });
        staging.descriptors.push(RegisteredDescriptor {
            name: Arc::clone(&fqn),
            is_enum: false,
        });
        for enumeration in &descriptor.enum_type {
            add_enum_descriptor(staging, Some(&fqn), enumeration);
        }
        Ok(())
    }

    fn synthesize_map(
        &self,
        staging: &Staging,
        fqn: &FullyQualifiedName,
        descriptor: &DescriptorProto,
    ) -> Result<MapType, SchemaError> {
        let invalid = |reason: &str| SchemaError::InvalidMapDescriptor {
            type_name: fqn.full_name().to_string(),
            reason: reason.to_string(),
        };
        let find = |name: &str, number: i32| {
            descriptor
                .field
                .iter()
                .find(|f| f.name() == name)
                .or_else(|| descriptor.field.iter().find(|f| f.number() == number))
        };
        let key_field = find("key", 1).ok_or_else(|| invalid("missing key field"))?;
        let value_field = find("value", 2).ok_or_else(|| invalid("missing value field"))?;
        if std::ptr::eq(key_field, value_field) {
            return Err(invalid("key and value resolve to the same field"));
        }

        let key = match self.convert_field(staging, key_field)?.kind {
            PendingKind::Scalar { ty, repeated: false } if ty.is_valid_map_key() => ty,
            _ => return Err(invalid("key must be an integral, bool or string scalar")),
        };
        let value = match self.convert_field(staging, value_field)?.kind {
            PendingKind::Scalar { ty, repeated: false } => MapValueKind::Scalar(ty),
            PendingKind::Enum {
                type_name,
                repeated: false,
            } => MapValueKind::Enum(TypeRef::new(&type_name)),
            PendingKind::Message {
                type_name,
                repeated: false,
            } => MapValueKind::Message(TypeRef::new(&type_name)),
            _ => return Err(invalid("value must be a singular scalar, enum or message")),
        };
        Ok(MapType { key, value })
    }

    fn convert_field(&self, staging: &Staging, field: &FieldDescriptorProto) -> Result<PendingField, SchemaError> {
        let name = field.name();
        let number = u32::try_from(field.number())
            .ok()
            .filter(|n| FIELD_NUMBER_RANGE.contains(n))
            .ok_or_else(|| SchemaError::MalformedSchema(format!("field '{name}' has invalid number {}", field.number())))?;
        let repeated = field.label() == Label::Repeated;
        let code = field.r#type.ok_or_else(|| SchemaError::UnknownFieldType {
            field: name.to_string(),
            code: None,
        })?;

        let kind = match code {
            FIELD_TYPE_GROUP => {
                return Err(SchemaError::UnsupportedField {
                    field: name.to_string(),
                    reason: "group fields are not supported".into(),
                });
            }
            FIELD_TYPE_MESSAGE => {
                let type_name = referenced_type(field)?;
                match self.map_type(staging, &type_name) {
                    Some(map) => PendingKind::Map {
                        key: map.key,
                        value: map.value,
                    },
                    None => PendingKind::Message { type_name, repeated },
                }
            }
            FIELD_TYPE_ENUM => PendingKind::Enum {
                type_name: referenced_type(field)?,
                repeated,
            },
            other => PendingKind::Scalar {
                ty: ScalarType::from_descriptor_code(other).ok_or_else(|| SchemaError::UnknownFieldType {
                    field: name.to_string(),
                    code: Some(other),
                })?,
                repeated,
            },
        };

        Ok(PendingField {
            number,
            name: name.to_string(),
            json_name: field.json_name.clone().filter(|j| !j.is_empty()),
            kind,
        })
    }

    fn map_type(&self, staging: &Staging, type_name: &str) -> Option<MapType> {
        staging
            .map_types
            .get(type_name)
            .or_else(|| self.map_types.get(type_name))
            .cloned()
    }

    fn commit(&mut self, staging: Staging) {
        self.map_types.extend(staging.map_types);
        for info in staging.enums {
            let type_name = info.type_name().to_string();
            if self.enums.insert(type_name.clone(), Arc::new(info)).is_some() {
                tracing::warn!(type_name = %type_name, "duplicate enum definition replaces the earlier one");
            }
        }
        for pending in staging.messages {
            let type_name = pending.type_name.clone();
            if self.pending.insert(type_name.clone(), pending).is_some() {
                tracing::warn!(type_name = %type_name, "duplicate message definition replaces the earlier one");
            }
        }
        for descriptor in staging.descriptors {
            if self.listed.insert(descriptor.name.full_name().to_string()) {
                self.descriptors.push(descriptor);
            }
        }
    }

    /// Finalize every pending message type. Further ingestion is rejected.
    pub fn resolve(&mut self) {
        if self.resolved {
            return;
        }
        for (type_name, pending) in self.pending.drain() {
            self.messages.insert(type_name, pending.finalize());
        }
        self.resolved = true;
        tracing::debug!(
            messages = self.messages.len(),
            enums = self.enums.len(),
            "descriptor database resolved"
        );
    }

    /// Look up a message type, finalizing it on demand if still pending.
    ///
    /// A leading `.` is ignored.
    pub fn get_message_type(&self, type_name: &str) -> Result<Arc<MessageType>, SchemaError> {
        let type_name = trim_leading_dot(type_name);
        if let Some(ty) = self.messages.get(type_name) {
            return Ok(Arc::clone(ty));
        }
        self.pending
            .get(type_name)
            .map(PendingMessageType::finalize)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    /// Look up an enum. A leading `.` is ignored.
    pub fn get_enum_info(&self, type_name: &str) -> Result<Arc<EnumInfo>, SchemaError> {
        let type_name = trim_leading_dot(type_name);
        self.enums
            .get(type_name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    /// Names of every visible message and enum, in discovery order.
    pub fn get_all_type_names(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| d.name.full_name().to_string())
            .collect()
    }

    /// Names of every visible message, in discovery order.
    pub fn get_all_message_descriptor_type_names(&self) -> Vec<Arc<FullyQualifiedName>> {
        self.descriptors
            .iter()
            .filter(|d| !d.is_enum)
            .map(|d| Arc::clone(&d.name))
            .collect()
    }

    /// Every visible type with its kind, in discovery order.
    pub fn get_all_descriptors(&self) -> &[RegisteredDescriptor] {
        &self.descriptors
    }
}

impl TypeLookup for DescriptorDatabase {
    fn message_type(&self, type_name: &str) -> Result<Arc<MessageType>, SchemaError> {
        self.get_message_type(type_name)
    }

    fn enum_info(&self, type_name: &str) -> Result<Arc<EnumInfo>, SchemaError> {
        self.get_enum_info(type_name)
    }

    fn codec_options(&self) -> CodecOptions {
        self.options
    }
}

fn add_enum_descriptor(
    staging: &mut Staging,
    parent: Option<&Arc<FullyQualifiedName>>,
    descriptor: &EnumDescriptorProto,
) {
    if descriptor.name().is_empty() {
        return;
    }
    let fqn = Arc::new(FullyQualifiedName::new(parent.cloned(), descriptor.name()));
    let values = descriptor
        .value
        .iter()
        .filter(|v| !v.name().is_empty())
        .map(|v| (v.name().to_string(), v.number()));
    staging.enums.push(EnumInfo::new(fqn.full_name().to_string(), values));
    staging.descriptors.push(RegisteredDescriptor { name: fqn, is_enum: true });
}

fn rejection_reason(file: &FileDescriptorProto) -> Option<&'static str> {
    if !file.package().is_empty() && !is_valid_package_name(file.package()) {
        return Some("invalid package name");
    }
    if contains_control_chars(file.name()) {
        return Some("control characters in file name");
    }
    None
}

fn referenced_type(field: &FieldDescriptorProto) -> Result<String, SchemaError> {
    let type_name = trim_leading_dot(field.type_name());
    if type_name.is_empty() {
        return Err(SchemaError::MissingTypeName {
            field: field.name().to_string(),
        });
    }
    Ok(type_name.to_string())
}

fn trim_leading_dot(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Record, Value};
    use prost_types::field_descriptor_proto::Type;
    use prost_types::{EnumValueDescriptorProto, MessageOptions};

    fn field(name: &str, number: i32, ty: Type, type_name: Option<&str>) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.into()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(ty as i32),
            type_name: type_name.map(str::to_string),
            ..Default::default()
        }
    }

    fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.into()),
            field: fields,
            ..Default::default()
        }
    }

    fn file(package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(format!("{package}.proto")),
            package: Some(package.into()),
            message_type: messages,
            syntax: Some("proto3".into()),
            ..Default::default()
        }
    }

    #[test]
    fn pending_types_finalize_on_demand() {
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file("t", vec![message("M", vec![field("n", 1, Type::Int32, None)])]))
            .unwrap();
        let ty = db.get_message_type(".t.M").unwrap();
        assert_eq!(ty.fields().len(), 1);
        db.resolve();
        assert!(Arc::ptr_eq(&ty, &db.get_message_type("t.M").unwrap()));
    }

    #[test]
    fn unknown_type_lookup_fails() {
        let mut db = DescriptorDatabase::new();
        db.resolve();
        assert_eq!(
            db.get_message_type("t.Nope").unwrap_err(),
            SchemaError::UnknownType("t.Nope".into())
        );
        assert!(db.get_enum_info("t.Nope").is_err());
    }

    #[test]
    fn group_fields_are_rejected() {
        let mut db = DescriptorDatabase::new();
        let err = db
            .add_file_descriptor(&file("t", vec![message("M", vec![field("g", 1, Type::Group, None)])]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedField { ref field, .. } if field == "g"));
        assert!(db.get_all_type_names().is_empty());
    }

    #[test]
    fn message_field_without_type_name_is_rejected() {
        let mut db = DescriptorDatabase::new();
        let err = db
            .add_file_descriptor(&file("t", vec![message("M", vec![field("m", 1, Type::Message, None)])]))
            .unwrap_err();
        assert_eq!(err, SchemaError::MissingTypeName { field: "m".into() });
    }

    #[test]
    fn field_numbers_outside_the_wire_range_are_rejected() {
        for number in [0, -3, 536_870_912, 1 << 30] {
            let mut db = DescriptorDatabase::new();
            let err = db
                .add_file_descriptor(&file("t", vec![message("M", vec![field("big", number, Type::Int32, None)])]))
                .unwrap_err();
            assert!(matches!(err, SchemaError::MalformedSchema(_)), "number {number}");
            assert!(db.get_all_type_names().is_empty());
        }
    }

    #[test]
    fn largest_field_number_is_accepted() {
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file("t", vec![message("M", vec![field("top", 536_870_911, Type::Int32, None)])]))
            .unwrap();
        db.resolve();
        assert_eq!(db.get_message_type("t.M").unwrap().fields()[0].number, 536_870_911);
    }

    #[test]
    fn short_records_normalize_to_defaults() {
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file(
            "t",
            vec![message("M", vec![field("n", 1, Type::Int32, None), field("s", 2, Type::String, None)])],
        ))
        .unwrap();
        db.resolve();
        let ty = db.get_message_type("t.M").unwrap();

        let partial = Record::from_slots(vec![Some(Value::I32(3))]);
        let normalized = ty.normalize(&partial).unwrap();
        assert_eq!(normalized.slots(), &[Some(Value::I32(3)), Some(Value::from(""))]);
        assert_eq!(ty.to_binary(&partial, &db).unwrap(), vec![0x08, 0x03]);

        let long = Record::from_slots(vec![None, None, Some(Value::I32(1))]);
        assert!(ty.normalize(&long).is_err());
        assert!(ty.to_binary(&long, &db).is_err());
    }

    #[test]
    fn colliding_local_names_key_by_declared_name() {
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file(
            "t",
            vec![message(
                "M",
                vec![field("foo_bar", 1, Type::Int32, None), field("fooBar", 2, Type::Int32, None)],
            )],
        ))
        .unwrap();
        db.resolve();
        let ty = db.get_message_type("t.M").unwrap();
        assert_eq!(ty.plain_key(0), Some("foo_bar"));
        assert_eq!(ty.plain_key(1), Some("fooBar"));

        let record = ty.from_binary(&[0x08, 0x01, 0x10, 0x02], &db).unwrap();
        let json = ty.to_json(&record, &db).unwrap();
        assert_eq!(json, serde_json::json!({"foo_bar": 1, "fooBar": 2}));
        assert_eq!(ty.from_json(&json, &db).unwrap(), record);
    }

    #[test]
    fn missing_type_code_is_rejected() {
        let mut f = field("x", 1, Type::Int32, None);
        f.r#type = None;
        let mut db = DescriptorDatabase::new();
        let err = db.add_file_descriptor(&file("t", vec![message("M", vec![f])])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownFieldType {
                field: "x".into(),
                code: None
            }
        );
    }

    #[test]
    fn map_entry_without_value_is_invalid() {
        let mut entry = message("BadEntry", vec![field("key", 1, Type::String, None)]);
        entry.options = Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        });
        let mut owner = message("M", vec![]);
        owner.nested_type.push(entry);

        let mut db = DescriptorDatabase::new();
        let err = db.add_file_descriptor(&file("t", vec![owner])).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidMapDescriptor { ref type_name, .. } if type_name == "t.M.BadEntry"));
    }

    #[test]
    fn ingestion_after_resolve_is_rejected() {
        let mut db = DescriptorDatabase::new();
        db.resolve();
        assert_eq!(
            db.add_file_descriptor(&file("t", vec![])),
            Err(SchemaError::AlreadyResolved)
        );
    }

    #[test]
    fn duplicate_types_are_listed_once() {
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file("t", vec![message("M", vec![])])).unwrap();
        db.add_file_descriptor(&file("t", vec![message("M", vec![field("n", 1, Type::Int32, None)])]))
            .unwrap();
        db.resolve();
        assert_eq!(db.get_all_type_names(), vec!["t.M".to_string()]);
        assert_eq!(db.get_message_type("t.M").unwrap().fields().len(), 1);
    }

    #[test]
    fn nested_enums_follow_their_message() {
        let mut owner = message("M", vec![]);
        owner.enum_type.push(EnumDescriptorProto {
            name: Some("Kind".into()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("KIND_A".into()),
                    number: Some(0),
                    ..Default::default()
                },
                EnumValueDescriptorProto {
                    name: Some(String::new()),
                    number: Some(9),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        let mut db = DescriptorDatabase::new();
        db.add_file_descriptor(&file("t", vec![owner])).unwrap();
        db.resolve();

        let descriptors = db.get_all_descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[1].name.full_name(), "t.M.Kind");
        assert!(descriptors[1].is_enum);
        assert_eq!(db.get_enum_info("t.M.Kind").unwrap().values().len(), 1);
        assert_eq!(db.get_all_message_descriptor_type_names().len(), 1);
    }
}
