//! # Frame Subcommand
//!
//! Wraps a raw descriptor set in the container header so it can be shipped
//! together with an index block.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use protodecl_core::{frame_payload, Container};

/// Arguments for the frame subcommand.
#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Raw `FileDescriptorSet` to wrap.
    pub payload: PathBuf,

    /// Destination of the framed bundle.
    pub out: PathBuf,

    /// File whose bytes become the index block (empty when omitted).
    #[arg(long)]
    pub index: Option<PathBuf>,
}

pub fn run(args: &FrameArgs, out: &mut impl Write) -> Result<()> {
    let payload =
        std::fs::read(&args.payload).with_context(|| format!("failed to read {}", args.payload.display()))?;
    if Container::parse(&payload).is_ok_and(|c| c.is_framed()) {
        tracing::warn!(path = %args.payload.display(), "payload is already framed; wrapping it again");
    }
    let index = match &args.index {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => Vec::new(),
    };

    let framed = frame_payload(&index, &payload)?;
    std::fs::write(&args.out, &framed).with_context(|| format!("failed to write {}", args.out.display()))?;
    writeln!(
        out,
        "wrote {} ({} byte index, {} byte payload)",
        args.out.display(),
        index.len(),
        payload.len()
    )?;
    Ok(())
}
