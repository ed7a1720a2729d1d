//! # Types Subcommand
//!
//! Lists the visible types of a bundle in discovery order.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::bundle::BundleArgs;

/// Arguments for the types subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// List message types only.
    #[arg(long)]
    pub messages_only: bool,

    /// Emit a JSON array instead of one line per type.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &TypesArgs, out: &mut impl Write) -> Result<()> {
    let module = args.bundle.load()?;
    let descriptors: Vec<_> = module
        .database()
        .get_all_descriptors()
        .iter()
        .filter(|d| !(args.messages_only && d.is_enum))
        .collect();

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &descriptors)?;
        writeln!(out)?;
        return Ok(());
    }
    for descriptor in descriptors {
        let kind = if descriptor.is_enum { "enum" } else { "message" };
        writeln!(out, "{kind:<8}{}", descriptor.name)?;
    }
    Ok(())
}
