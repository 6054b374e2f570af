//! Protocol descriptors and decoding stages.
//!
//! Each protocol family follows a layered structure:
//! - `layout`: timing template, code table and bit offsets (source of truth)
//! - `parser`: domain-level field decoding (no direct bit indexing)
//!
//! Shared stages live beside them:
//! - `mapping`: token-to-bit rewriting driven by a code table
//! - `common`: checked bit-field reads and their errors
//! - `registry`: the ordered set of descriptors tried by the matcher
//!
//! Everything here is pure and contains no I/O.

pub mod common;
pub mod gtwt01;
pub mod mapping;
pub mod registry;

pub use registry::{BUILTIN_PROTOCOLS, FieldLayout, ProtocolDescriptor, ProtocolRegistry};
