//! # Decode and Encode Subcommands
//!
//! `decode` turns a base64 payload into debug JSON; `encode` turns JSON
//! initial values into a base64 payload. Both go through the message
//! namespace of the named type.

use std::io::Write;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Args;
use protodecl_schema::{JsonPrintOptions, Message};

use crate::bundle::{self, BundleArgs};

/// Arguments for the decode subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// Fully-qualified message name.
    pub type_name: String,

    /// Base64-encoded payload.
    pub payload: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the encode subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// Fully-qualified message name.
    pub type_name: String,

    /// Initial values as a JSON object.
    pub values: String,
}

pub fn run_decode(args: &DecodeArgs, out: &mut impl Write) -> Result<()> {
    let module = args.bundle.load()?;
    let ns = bundle::message(&module, &args.type_name)?;

    let bytes = STANDARD
        .decode(args.payload.trim())
        .context("payload is not valid base64")?;
    let message = ns.decode(&bytes)?;

    let options = if args.pretty {
        JsonPrintOptions::PRETTY
    } else {
        JsonPrintOptions::NONE
    };
    writeln!(out, "{}", message.to_debug_json(options)?)?;
    Ok(())
}

pub fn run_encode(args: &EncodeArgs, out: &mut impl Write) -> Result<()> {
    let module = args.bundle.load()?;
    let ns = bundle::message(&module, &args.type_name)?;

    let values: serde_json::Value = serde_json::from_str(&args.values).context("values are not valid JSON")?;
    let bytes = ns.encode(&values)?;
    tracing::debug!(type_name = %args.type_name, len = bytes.len(), "encoded message");
    writeln!(out, "{}", STANDARD.encode(bytes))?;
    Ok(())
}
