//! # protodecl-schema: Runtime Protobuf Schema Resolution
//!
//! Turns serialized `FileDescriptorSet` buffers into a registry of message
//! and enum types that can create, encode and decode messages at runtime,
//! and exposes those types through a path-addressable namespace.
//!
//! ## Pipeline
//!
//! 1. [`DescriptorDatabase::add_file_descriptor_set`] strips the optional
//!    container header, decodes the descriptor set and stages pending type
//!    records, synthesizing map types from map-entry messages.
//! 2. [`DescriptorDatabase::resolve`] finalizes every record into a
//!    [`MessageType`]. References between types are [`TypeRef`]s, resolved
//!    by name at first use, so cyclic graphs are safe.
//! 3. [`generate_namespace`] builds a [`NamespaceNode`] tree whose leaves
//!    are [`MessageNamespace`]s with `create`, `decode` and `encode`.
//! 4. Results are [`DynamicMessage`]s implementing the [`Message`] trait.
//!
//! [`SchemaModule`] runs all four steps for a unit fetched through a
//! [`SchemaLoader`].
//!
//! ## Crate Policy
//!
//! - Depends only on `protodecl-core` internally.
//! - Wire-level scalar encoding is delegated to `prost::encoding`; this
//!   crate never hand-rolls varints.
//! - Ingestion needs `&mut`; a resolved database is read-only and `Sync`.

pub mod codec;
pub mod database;
pub mod descriptor;
pub mod loader;
pub mod message;
pub mod namespace;
pub mod options;
pub mod value;

pub use database::{DescriptorDatabase, IngestSummary, RegisteredDescriptor, FIELD_NUMBER_RANGE};
pub use descriptor::{lower_camel_case, EnumInfo, FieldInfo, FieldKind, MapValueKind, MessageType, TypeLookup, TypeRef};
pub use loader::{DirectorySchemaLoader, SchemaLoader, SchemaModule, SCHEMA_FILE_EXTENSION};
pub use message::{DynamicMessage, JsonPrintOptions, Message, MessageArena};
pub use namespace::{generate_namespace, EncodeInput, MessageNamespace, NamespaceNode};
pub use options::{CodecOptions, DEFAULT_RECURSION_LIMIT};
pub use value::{MapKey, Record, Value};
