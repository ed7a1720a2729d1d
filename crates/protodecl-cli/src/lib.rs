//! # protodecl-cli: Schema Bundle Command-Line Interface
//!
//! Inspects and exercises runtime protobuf schema bundles without generated
//! code.
//!
//! ## Subcommands
//!
//! - `types`: List visible message and enum types
//! - `describe`: Print the fields of a message or the values of an enum
//! - `decode`: Decode a base64 payload to debug JSON
//! - `encode`: Encode JSON initial values to a base64 payload
//! - `frame`: Wrap a raw descriptor set in the container header
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `protodecl-schema`; they only parse
//!   arguments and format output.
//! - Handlers write to a caller-supplied `Write` so they can be tested.

pub mod bundle;
pub mod codec;
pub mod describe;
pub mod frame;
pub mod types;
