//! # protodecl-core: Foundational Types for protodecl
//!
//! This crate is the leaf of the protodecl workspace. It defines the small
//! value types every other crate agrees on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`FullyQualifiedName` carries its parent chain.** Namespace trees are
//!    built by walking the chain, never by re-splitting dotted strings.
//!
//! 2. **Container framing is transparent.** [`strip_container`] accepts
//!    framed and raw schema buffers alike; only a framed buffer with a bad
//!    header is an error.
//!
//! 3. **One error taxonomy.** [`SchemaError`] covers descriptor-graph
//!    problems, [`CodecError`] covers single-message problems, and
//!    [`ProtodeclError`] unifies both for callers that do not care.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `protodecl-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod container;
pub mod error;
pub mod fqn;
pub mod scalar;

// Re-export primary types for ergonomic imports.
pub use container::{frame_payload, strip_container, Container, CONTAINER_HEADER_LEN, CONTAINER_MAGIC};
pub use error::{CodecError, ProtodeclError, SchemaError};
pub use fqn::{contains_control_chars, is_valid_package_name, FullyQualifiedName};
pub use scalar::{ScalarType, FIELD_TYPE_ENUM, FIELD_TYPE_GROUP, FIELD_TYPE_MESSAGE};
