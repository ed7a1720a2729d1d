//! # protodecl CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// protodecl: runtime protobuf schema toolkit.
///
/// Lists, describes, decodes and encodes messages of a schema bundle, and
/// frames raw descriptor sets.
#[derive(Parser, Debug)]
#[command(name = "protodecl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List visible types.
    Types(protodecl_cli::types::TypesArgs),
    /// Describe a message or enum.
    Describe(protodecl_cli::describe::DescribeArgs),
    /// Decode a base64 payload to debug JSON.
    Decode(protodecl_cli::codec::DecodeArgs),
    /// Encode JSON values to a base64 payload.
    Encode(protodecl_cli::codec::EncodeArgs),
    /// Wrap a raw descriptor set in the container header.
    Frame(protodecl_cli::frame::FrameArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Types(args) => protodecl_cli::types::run(args, &mut stdout),
        Commands::Describe(args) => protodecl_cli::describe::run(args, &mut stdout),
        Commands::Decode(args) => protodecl_cli::codec::run_decode(args, &mut stdout),
        Commands::Encode(args) => protodecl_cli::codec::run_encode(args, &mut stdout),
        Commands::Frame(args) => protodecl_cli::frame::run(args, &mut stdout),
    }
}
