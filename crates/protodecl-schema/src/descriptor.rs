//! # Finalized Descriptor Types
//!
//! The read-only shapes produced by [`DescriptorDatabase::resolve`]:
//! [`MessageType`], [`FieldInfo`] and [`EnumInfo`].
//!
//! ## Cycle Safety
//!
//! Message- and enum-typed fields never hold a direct reference to their
//! target type. They hold a [`TypeRef`], a deferred resolver that looks the
//! target up by name through a [`TypeLookup`] only when invoked (at create,
//! encode or decode time). Finalizing `A` therefore never touches `B`, so
//! `A <-> B` and self-referential graphs finalize in one pass without
//! recursion.
//!
//! [`DescriptorDatabase::resolve`]: crate::DescriptorDatabase::resolve

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use protodecl_core::{ScalarType, SchemaError};

use crate::options::CodecOptions;
use crate::value::{Record, Value};

/// Source of finalized types for deferred resolvers.
pub trait TypeLookup: Send + Sync {
    /// Look up a message type by fully-qualified name.
    fn message_type(&self, type_name: &str) -> Result<Arc<MessageType>, SchemaError>;

    /// Look up an enum by fully-qualified name.
    fn enum_info(&self, type_name: &str) -> Result<Arc<EnumInfo>, SchemaError>;

    /// Options applied by codecs running against this lookup.
    fn codec_options(&self) -> CodecOptions {
        CodecOptions::default()
    }
}

/// Deferred resolver for a message or enum type referenced by a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    type_name: Arc<str>,
}

impl TypeRef {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            type_name: Arc::from(type_name),
        }
    }

    /// Fully-qualified name of the referenced type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resolve the reference as a message type.
    pub fn message(&self, lookup: &dyn TypeLookup) -> Result<Arc<MessageType>, SchemaError> {
        lookup.message_type(&self.type_name)
    }

    /// Resolve the reference as an enum.
    pub fn enumeration(&self, lookup: &dyn TypeLookup) -> Result<Arc<EnumInfo>, SchemaError> {
        lookup.enum_info(&self.type_name)
    }
}

/// The value side of a map field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapValueKind {
    Scalar(ScalarType),
    Enum(TypeRef),
    Message(TypeRef),
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A scalar, optionally repeated (written packed when repeated).
    Scalar { ty: ScalarType, repeated: bool },
    /// An enum, optionally repeated (written packed when repeated).
    Enum { ty: TypeRef, repeated: bool },
    /// A nested message, optionally repeated.
    Message { ty: TypeRef, repeated: bool },
    /// A map synthesized from a map-entry message.
    Map { key: ScalarType, value: MapValueKind },
}

impl FieldKind {
    /// Short label used in listings and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Enum { .. } => "enum",
            Self::Message { .. } => "message",
            Self::Map { .. } => "map",
        }
    }

    /// True for repeated scalar, enum and message fields.
    pub fn is_repeated(&self) -> bool {
        match self {
            Self::Scalar { repeated, .. } | Self::Enum { repeated, .. } | Self::Message { repeated, .. } => {
                *repeated
            }
            Self::Map { .. } => false,
        }
    }

    /// The default slot value of a field of this kind.
    ///
    /// Singular message fields have no default and stay unset.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Scalar { repeated: true, .. }
            | Self::Enum { repeated: true, .. }
            | Self::Message { repeated: true, .. } => Some(Value::List(Vec::new())),
            Self::Scalar { ty, .. } => Some(Value::default_scalar(*ty)),
            Self::Enum { .. } => Some(Value::Enum(0)),
            Self::Message { .. } => None,
            Self::Map { .. } => Some(Value::Map(BTreeMap::new())),
        }
    }
}

/// One finalized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field number on the wire.
    pub number: u32,
    /// Name as declared in the descriptor.
    pub name: String,
    /// lowerCamelCase name used as the record key.
    pub local_name: String,
    /// Name used by the JSON mapping.
    pub json_name: String,
    /// Value kind.
    pub kind: FieldKind,
}

impl FieldInfo {
    pub(crate) fn new(number: u32, name: &str, json_name: Option<&str>, kind: FieldKind) -> Self {
        let local_name = lower_camel_case(name);
        let json_name = json_name
            .filter(|j| !j.is_empty())
            .map_or_else(|| local_name.clone(), str::to_string);
        Self {
            number,
            name: name.to_string(),
            local_name,
            json_name,
            kind,
        }
    }

    /// True if `key` names this field by any of its three names.
    pub fn answers_to(&self, key: &str) -> bool {
        self.local_name == key || self.name == key || self.json_name == key
    }
}

/// A finalized message type: an ordered, immutable field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageType {
    type_name: String,
    fields: Vec<FieldInfo>,
    wire_order: Vec<usize>,
    plain_keys: Vec<String>,
}

impl MessageType {
    pub(crate) fn new(type_name: String, fields: Vec<FieldInfo>) -> Self {
        let mut wire_order: Vec<usize> = (0..fields.len()).collect();
        wire_order.sort_by_key(|&i| fields[i].number);
        let plain_keys = plain_object_keys(&fields);
        Self {
            type_name,
            fields,
            wire_order,
            plain_keys,
        }
    }

    /// Fully-qualified name of the type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fields in declared order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Field indices in ascending field-number order.
    pub(crate) fn wire_order(&self) -> &[usize] {
        &self.wire_order
    }

    /// Key of the field at `index` in the plain-object JSON view.
    ///
    /// This is the local name, or the declared name when another field of the
    /// type shares that local name.
    pub fn plain_key(&self, index: usize) -> Option<&str> {
        self.plain_keys.get(index).map(String::as_str)
    }

    /// Index of the field declared with `key` as name, local name or JSON name.
    ///
    /// A declared name wins over another field's local or JSON name.
    pub fn field_index(&self, key: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name == key)
            .or_else(|| self.fields.iter().position(|f| f.answers_to(key)))
    }

    /// Field matched by name, local name or JSON name.
    pub fn field_by_name(&self, key: &str) -> Option<&FieldInfo> {
        self.field_index(key).map(|i| &self.fields[i])
    }

    /// Field matched by wire number.
    pub fn field_by_number(&self, number: u32) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// A record holding the default of every field.
    pub fn default_record(&self) -> Record {
        Record::from_slots(self.fields.iter().map(|f| f.kind.default_value()).collect())
    }

    /// Deep copy of a record of this type.
    pub fn clone_record(&self, record: &Record) -> Record {
        record.clone()
    }
}

/// An enum with its bidirectional name/number mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    type_name: String,
    by_name: HashMap<String, i32>,
    by_number: BTreeMap<i32, String>,
    declared: Vec<(String, i32)>,
}

impl EnumInfo {
    pub(crate) fn new(type_name: String, values: impl IntoIterator<Item = (String, i32)>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_number = BTreeMap::new();
        let mut declared = Vec::new();
        for (name, number) in values {
            by_name.insert(name.clone(), number);
            // First declaration wins for aliased numbers.
            by_number.entry(number).or_insert_with(|| name.clone());
            declared.push((name, number));
        }
        Self {
            type_name,
            by_name,
            by_number,
            declared,
        }
    }

    /// Fully-qualified name of the enum.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Number of the value called `name`.
    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    /// Name of the value numbered `number`.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.by_number.get(&number).map(String::as_str)
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[(String, i32)] {
        &self.declared
    }
}

/// Local names shared by more than one field fall back to the declared name.
fn plain_object_keys(fields: &[FieldInfo]) -> Vec<String> {
    let shared = colliding_local_names(fields.iter().map(|f| f.local_name.as_str()));
    fields
        .iter()
        .map(|f| {
            if shared.contains(&f.local_name.as_str()) {
                f.name.clone()
            } else {
                f.local_name.clone()
            }
        })
        .collect()
}

/// Local names that occur more than once, sorted.
pub(crate) fn colliding_local_names<'a>(local_names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for name in local_names {
        *uses.entry(name).or_default() += 1;
    }
    let mut shared: Vec<&str> = uses.into_iter().filter(|&(_, n)| n > 1).map(|(name, _)| name).collect();
    shared.sort_unstable();
    shared
}

/// lowerCamelCase conversion used for record keys.
///
/// Underscores are dropped and capitalize the next letter; a digit also
/// capitalizes the letter after it; the first character is lowercased.
pub fn lower_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut cap_next = false;
    for (i, c) in snake.chars().enumerate() {
        if c == '_' {
            cap_next = true;
        } else if c.is_ascii_digit() {
            out.push(c);
            cap_next = true;
        } else if cap_next {
            out.extend(c.to_uppercase());
            cap_next = false;
        } else if i == 0 {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_conversion() {
        assert_eq!(lower_camel_case("int32"), "int32");
        assert_eq!(lower_camel_case("other_message"), "otherMessage");
        assert_eq!(lower_camel_case("string_to_string"), "stringToString");
        assert_eq!(lower_camel_case("Foo_bar"), "fooBar");
        assert_eq!(lower_camel_case("field1name"), "field1Name");
        assert_eq!(lower_camel_case("already"), "already");
    }

    #[test]
    fn field_answers_to_all_names() {
        let f = FieldInfo::new(
            3,
            "child_message",
            Some("childMsg"),
            FieldKind::Scalar {
                ty: ScalarType::String,
                repeated: false,
            },
        );
        assert!(f.answers_to("child_message"));
        assert!(f.answers_to("childMessage"));
        assert!(f.answers_to("childMsg"));
        assert!(!f.answers_to("child"));
    }

    #[test]
    fn wire_order_sorts_by_number() {
        let scalar = |n, name| {
            FieldInfo::new(
                n,
                name,
                None,
                FieldKind::Scalar {
                    ty: ScalarType::Int32,
                    repeated: false,
                },
            )
        };
        let ty = MessageType::new("t.M".into(), vec![scalar(9, "c"), scalar(1, "a"), scalar(4, "b")]);
        assert_eq!(ty.wire_order(), &[1usize, 2, 0]);
        assert_eq!(ty.field_by_number(4).map(|f| f.name.as_str()), Some("b"));
    }

    #[test]
    fn default_record_leaves_messages_unset() {
        let ty = MessageType::new(
            "t.M".into(),
            vec![
                FieldInfo::new(
                    1,
                    "n",
                    None,
                    FieldKind::Scalar {
                        ty: ScalarType::Int32,
                        repeated: false,
                    },
                ),
                FieldInfo::new(
                    2,
                    "child",
                    None,
                    FieldKind::Message {
                        ty: TypeRef::new("t.M"),
                        repeated: false,
                    },
                ),
                FieldInfo::new(
                    3,
                    "kids",
                    None,
                    FieldKind::Message {
                        ty: TypeRef::new("t.M"),
                        repeated: true,
                    },
                ),
            ],
        );
        let r = ty.default_record();
        assert_eq!(r.get(0), Some(&Value::I32(0)));
        assert_eq!(r.get(1), None);
        assert_eq!(r.get(2), Some(&Value::List(vec![])));
    }

    #[test]
    fn enum_info_is_bidirectional() {
        let e = EnumInfo::new(
            "test.Enum".into(),
            vec![("VALUE_0".to_string(), 0), ("VALUE_1".to_string(), 1), ("ALIAS_1".to_string(), 1)],
        );
        assert_eq!(e.number_of("VALUE_1"), Some(1));
        assert_eq!(e.number_of("ALIAS_1"), Some(1));
        assert_eq!(e.name_of(1), Some("VALUE_1"));
        assert_eq!(e.name_of(7), None);
        assert_eq!(e.values().len(), 3);
    }
}
