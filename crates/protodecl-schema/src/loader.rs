//! # Schema Module Loading
//!
//! A schema unit is a named, possibly container-framed descriptor set.
//! [`SchemaLoader`] supplies its raw bytes; [`SchemaModule`] runs the full
//! pipeline over them (ingest, resolve, generate the namespace of every
//! visible message type).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use protodecl_core::{FullyQualifiedName, ProtodeclError};

use crate::database::{DescriptorDatabase, IngestSummary};
use crate::namespace::{generate_namespace, MessageNamespace, NamespaceNode};
use crate::options::CodecOptions;

/// File extension of schema units on disk.
pub const SCHEMA_FILE_EXTENSION: &str = "protodecl";

/// Supplies the raw schema buffer of a named unit.
pub trait SchemaLoader {
    fn load(&self, unit: &str) -> Result<Bytes, ProtodeclError>;
}

impl<F> SchemaLoader for F
where
    F: Fn(&str) -> Result<Bytes, ProtodeclError>,
{
    fn load(&self, unit: &str) -> Result<Bytes, ProtodeclError> {
        self(unit)
    }
}

/// Loads `<root>/<unit>.protodecl`.
#[derive(Debug, Clone)]
pub struct DirectorySchemaLoader {
    root: PathBuf,
}

impl DirectorySchemaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a unit is read from.
    pub fn path_for(&self, unit: &str) -> PathBuf {
        self.root.join(format!("{unit}.{SCHEMA_FILE_EXTENSION}"))
    }
}

impl SchemaLoader for DirectorySchemaLoader {
    fn load(&self, unit: &str) -> Result<Bytes, ProtodeclError> {
        // Unit names must stay inside the root.
        if unit.is_empty() || unit.contains(['/', '\\']) || unit.starts_with('.') {
            return Err(ProtodeclError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid schema unit name '{unit}'"),
            )));
        }
        let path = self.path_for(unit);
        tracing::debug!(unit, path = %path.display(), "loading schema unit");
        Ok(Bytes::from(std::fs::read(&path)?))
    }
}

/// A loaded, resolved schema unit and its namespace.
#[derive(Debug, Clone)]
pub struct SchemaModule {
    database: Arc<DescriptorDatabase>,
    namespace: NamespaceNode,
    summary: IngestSummary,
}

impl SchemaModule {
    /// Load `unit` through `loader` with default codec options.
    pub fn load(loader: &dyn SchemaLoader, unit: &str) -> Result<Self, ProtodeclError> {
        Self::load_with_options(loader, unit, CodecOptions::default())
    }

    pub fn load_with_options(
        loader: &dyn SchemaLoader,
        unit: &str,
        options: CodecOptions,
    ) -> Result<Self, ProtodeclError> {
        let buffer = loader.load(unit)?;
        Self::from_bytes(&buffer, options)
    }

    /// Run the pipeline over an in-memory buffer.
    pub fn from_bytes(buffer: &[u8], options: CodecOptions) -> Result<Self, ProtodeclError> {
        let mut database = DescriptorDatabase::with_options(options);
        let summary = database.add_file_descriptor_set(buffer)?;
        database.resolve();

        let database = Arc::new(database);
        let names = database.get_all_message_descriptor_type_names();
        let namespace = generate_namespace(&database, &names)?;
        Ok(Self {
            database,
            namespace,
            summary,
        })
    }

    pub fn database(&self) -> &Arc<DescriptorDatabase> {
        &self.database
    }

    pub fn namespace(&self) -> &NamespaceNode {
        &self.namespace
    }

    pub fn summary(&self) -> IngestSummary {
        self.summary
    }

    /// The message operations at a dotted path.
    pub fn message(&self, path: &str) -> Option<&MessageNamespace> {
        self.namespace.lookup(path)
    }

    /// Extend the namespace with additional names, reusing existing nodes.
    pub fn extend_namespace(&mut self, names: &[Arc<FullyQualifiedName>]) -> Result<(), ProtodeclError> {
        self.namespace.populate(&self.database, names)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_names_cannot_escape_the_root() {
        let loader = DirectorySchemaLoader::new("/nonexistent");
        for unit in ["", "../etc", "a/b", ".hidden"] {
            assert!(matches!(loader.load(unit), Err(ProtodeclError::Io(_))), "{unit}");
        }
    }

    #[test]
    fn unit_path_uses_extension() {
        let loader = DirectorySchemaLoader::new("/schemas");
        assert_eq!(loader.path_for("chat"), PathBuf::from("/schemas/chat.protodecl"));
    }

    #[test]
    fn closure_loaders_are_supported() {
        let loader = |unit: &str| -> Result<Bytes, ProtodeclError> {
            assert_eq!(unit, "empty");
            Ok(Bytes::new())
        };
        let module = SchemaModule::load(&loader, "empty").unwrap();
        assert!(module.database().is_resolved());
        assert_eq!(module.namespace().descendant_count(), 0);
    }
}
