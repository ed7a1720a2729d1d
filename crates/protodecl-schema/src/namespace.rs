//! # Namespace Generator
//!
//! Builds a tree of [`NamespaceNode`]s mirroring the package and nesting
//! structure of a list of fully-qualified names. Each name's parent chain is
//! walked root-first; one node per segment is created or reused, and the
//! final node is bound to a [`MessageNamespace`] exposing create, decode and
//! encode for that type.
//!
//! Population is insert-if-absent: running it again with an overlapping
//! name list reuses every existing node and leaves bound types in place.

use std::collections::BTreeMap;
use std::fmt;
use std::future::{ready, Ready};
use std::sync::Arc;

use protodecl_core::{CodecError, FullyQualifiedName, SchemaError};

use crate::database::DescriptorDatabase;
use crate::descriptor::{MessageType, TypeLookup};
use crate::message::{DynamicMessage, Message};
use crate::value::Record;

/// Input accepted by [`MessageNamespace::encode`].
#[derive(Debug, Clone, Copy)]
pub enum EncodeInput<'a> {
    /// An existing wrapper; its record is encoded.
    Message(&'a DynamicMessage),
    /// A possibly partial record of the bound type.
    Record(&'a Record),
    /// Initial values, as accepted by [`MessageNamespace::create`].
    Json(&'a serde_json::Value),
}

impl<'a> From<&'a DynamicMessage> for EncodeInput<'a> {
    fn from(v: &'a DynamicMessage) -> Self {
        Self::Message(v)
    }
}

impl<'a> From<&'a Record> for EncodeInput<'a> {
    fn from(v: &'a Record) -> Self {
        Self::Record(v)
    }
}

impl<'a> From<&'a serde_json::Value> for EncodeInput<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Operations bound to one message type.
#[derive(Clone)]
pub struct MessageNamespace {
    database: Arc<DescriptorDatabase>,
    message_type: Arc<MessageType>,
}

impl MessageNamespace {
    pub fn new(database: Arc<DescriptorDatabase>, message_type: Arc<MessageType>) -> Self {
        Self {
            database,
            message_type,
        }
    }

    pub fn message_type(&self) -> &Arc<MessageType> {
        &self.message_type
    }

    pub fn type_name(&self) -> &str {
        self.message_type.type_name()
    }

    fn wrap(&self, data: Record) -> DynamicMessage {
        let lookup: Arc<dyn TypeLookup> = self.database.clone();
        DynamicMessage::new(lookup, Arc::clone(&self.message_type), data)
    }

    /// New message with defaults applied and `values` layered on top.
    pub fn create(&self, values: Option<&serde_json::Value>) -> Result<DynamicMessage, CodecError> {
        let data = self.message_type.create(values, &*self.database)?;
        Ok(self.wrap(data))
    }

    /// Parse protobuf wire format.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicMessage, CodecError> {
        let data = self.message_type.from_binary(bytes, &*self.database)?;
        Ok(self.wrap(data))
    }

    /// [`decode`](Self::decode), delivered as an already-completed future.
    pub fn decode_async(&self, bytes: &[u8]) -> Ready<Result<DynamicMessage, CodecError>> {
        ready(self.decode(bytes))
    }

    /// Parse debug JSON text, delivered as an already-completed future.
    pub fn decode_debug_json_async(&self, text: &str) -> Ready<Result<DynamicMessage, CodecError>> {
        ready(
            self.message_type
                .from_json_str(text, &*self.database)
                .map(|data| self.wrap(data)),
        )
    }

    /// Serialize a wrapper, record or set of initial values.
    ///
    /// Records are normalized first so that partially filled slots receive
    /// their defaults.
    pub fn encode<'a>(&self, value: impl Into<EncodeInput<'a>>) -> Result<Vec<u8>, CodecError> {
        let lookup = &*self.database;
        let record = match value.into() {
            EncodeInput::Message(message) => {
                if message.message_type().type_name() != self.type_name() {
                    return Err(CodecError::encode(
                        self.type_name(),
                        format!("cannot encode a '{}' message", message.message_type().type_name()),
                    ));
                }
                self.message_type.normalize(message.to_plain_object())?
            }
            EncodeInput::Record(record) => self.message_type.normalize(record)?,
            EncodeInput::Json(values) => self.message_type.create(Some(values), lookup)?,
        };
        self.message_type.to_binary(&record, lookup)
    }

    /// [`encode`](Self::encode), delivered as an already-completed future.
    pub fn encode_async<'a>(&self, value: impl Into<EncodeInput<'a>>) -> Ready<Result<Vec<u8>, CodecError>> {
        ready(self.encode(value))
    }
}

impl fmt::Debug for MessageNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageNamespace")
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// One segment of the namespace tree.
#[derive(Debug, Clone, Default)]
pub struct NamespaceNode {
    children: BTreeMap<String, NamespaceNode>,
    message: Option<MessageNamespace>,
}

impl NamespaceNode {
    /// Add every name in `names` to the tree, reusing existing nodes.
    pub fn populate(
        &mut self,
        database: &Arc<DescriptorDatabase>,
        names: &[Arc<FullyQualifiedName>],
    ) -> Result<(), SchemaError> {
        for name in names {
            let mut node = &mut *self;
            for segment in name.segments() {
                node = node.children.entry(segment.to_string()).or_default();
            }
            if node.message.is_none() {
                let message_type = database.get_message_type(name.full_name())?;
                node.message = Some(MessageNamespace::new(Arc::clone(database), message_type));
            }
        }
        Ok(())
    }

    pub fn child(&self, segment: &str) -> Option<&NamespaceNode> {
        self.children.get(segment)
    }

    /// Child nodes in segment order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &NamespaceNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The type bound to this node, if any.
    pub fn message(&self) -> Option<&MessageNamespace> {
        self.message.as_ref()
    }

    /// Walk a dotted path from this node.
    pub fn resolve(&self, path: &str) -> Option<&NamespaceNode> {
        let path = path.strip_prefix('.').unwrap_or(path);
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| node.child(segment))
    }

    /// The type bound at a dotted path.
    pub fn lookup(&self, path: &str) -> Option<&MessageNamespace> {
        self.resolve(path).and_then(NamespaceNode::message)
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children.values().map(|c| 1 + c.descendant_count()).sum()
    }
}

/// Build a namespace tree for `names` against a resolved database.
pub fn generate_namespace(
    database: &Arc<DescriptorDatabase>,
    names: &[Arc<FullyQualifiedName>],
) -> Result<NamespaceNode, SchemaError> {
    let mut root = NamespaceNode::default();
    root.populate(database, names)?;
    Ok(root)
}
