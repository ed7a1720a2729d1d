//! # Bundle Loading
//!
//! Shared arguments for subcommands that operate on a schema bundle: a
//! serialized `FileDescriptorSet`, raw or container-framed.
//!
//! Codec options come from an optional YAML file (`--config`); individual
//! flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use protodecl_schema::{CodecOptions, MessageNamespace, SchemaModule};

/// Arguments locating a schema bundle and its codec options.
#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    /// Path to the schema bundle.
    pub bundle: PathBuf,

    /// YAML file holding codec options.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum nested message depth while decoding.
    #[arg(long)]
    pub recursion_limit: Option<u32>,

    /// Skip unknown keys when reading JSON instead of failing.
    #[arg(long)]
    pub ignore_unknown_fields: bool,
}

impl BundleArgs {
    /// Effective codec options: file, then flags.
    pub fn options(&self) -> Result<CodecOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => CodecOptions::default(),
        };
        if let Some(limit) = self.recursion_limit {
            options.recursion_limit = limit;
        }
        if self.ignore_unknown_fields {
            options.ignore_unknown_json_fields = true;
        }
        Ok(options)
    }

    /// Read, ingest and resolve the bundle.
    pub fn load(&self) -> Result<SchemaModule> {
        let options = self.options()?;
        let buffer = std::fs::read(&self.bundle)
            .with_context(|| format!("failed to read bundle {}", self.bundle.display()))?;
        let module = SchemaModule::from_bytes(&buffer, options)
            .with_context(|| format!("failed to load bundle {}", self.bundle.display()))?;

        let summary = module.summary();
        tracing::debug!(
            bundle = %self.bundle.display(),
            files_ingested = summary.files_ingested,
            files_skipped = summary.files_skipped,
            "loaded schema bundle"
        );
        if summary.files_skipped > 0 {
            tracing::warn!(files_skipped = summary.files_skipped, "some files in the bundle were skipped");
        }
        Ok(module)
    }
}

/// Parse codec options from a YAML file.
pub fn load_options(path: &Path) -> Result<CodecOptions> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Look up the operations of a message type, with a helpful error.
pub fn message<'m>(module: &'m SchemaModule, type_name: &str) -> Result<&'m MessageNamespace> {
    module.message(type_name).with_context(|| {
        let kind = if module.database().get_enum_info(type_name).is_ok() {
            "an enum, not a message"
        } else {
            "not defined in the bundle"
        };
        format!("type '{type_name}' is {kind}")
    })
}
