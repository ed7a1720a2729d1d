//! # Describe Subcommand
//!
//! Prints the field list of a message type or the values of an enum.

use std::io::Write;

use anyhow::{bail, Result};
use clap::Args;
use protodecl_schema::{FieldKind, MapValueKind, MessageType};
use serde::Serialize;

use crate::bundle::BundleArgs;

/// Arguments for the describe subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// Fully-qualified message or enum name.
    pub type_name: String,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// One row of a message description.
#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub number: u32,
    pub name: String,
    pub json_name: String,
    pub kind: String,
}

/// Rows for every field of `ty`, in declared order.
pub fn field_rows(ty: &MessageType) -> Vec<FieldRow> {
    ty.fields()
        .iter()
        .map(|f| FieldRow {
            number: f.number,
            name: f.name.clone(),
            json_name: f.json_name.clone(),
            kind: describe_kind(&f.kind),
        })
        .collect()
}

/// Proto-like spelling of a field kind, e.g. `map<int64, pkg.Child>`.
pub fn describe_kind(kind: &FieldKind) -> String {
    let repeated = |r: bool| if r { "repeated " } else { "" };
    match kind {
        FieldKind::Scalar { ty, repeated: r } => format!("{}{ty}", repeated(*r)),
        FieldKind::Enum { ty, repeated: r } | FieldKind::Message { ty, repeated: r } => {
            format!("{}{}", repeated(*r), ty.type_name())
        }
        FieldKind::Map { key, value } => {
            let value = match value {
                MapValueKind::Scalar(st) => st.to_string(),
                MapValueKind::Enum(r) | MapValueKind::Message(r) => r.type_name().to_string(),
            };
            format!("map<{key}, {value}>")
        }
    }
}

pub fn run(args: &DescribeArgs, out: &mut impl Write) -> Result<()> {
    let module = args.bundle.load()?;
    let db = module.database();

    if let Ok(ty) = db.get_message_type(&args.type_name) {
        let rows = field_rows(&ty);
        if args.json {
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
            return Ok(());
        }
        writeln!(out, "message {}", ty.type_name())?;
        for row in rows {
            writeln!(out, "  {:>4}  {:<24} {}", row.number, row.name, row.kind)?;
        }
        return Ok(());
    }

    if let Ok(info) = db.get_enum_info(&args.type_name) {
        if args.json {
            let values: serde_json::Map<String, serde_json::Value> = info
                .values()
                .iter()
                .map(|(name, number)| (name.clone(), (*number).into()))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &values)?;
            writeln!(out)?;
            return Ok(());
        }
        writeln!(out, "enum {}", info.type_name())?;
        for (name, number) in info.values() {
            writeln!(out, "  {number:>4}  {name}")?;
        }
        return Ok(());
    }

    bail!("type '{}' is not defined in the bundle", args.type_name)
}
