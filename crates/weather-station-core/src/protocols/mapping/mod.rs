//! Token-to-bit mapping.
//!
//! Each protocol carries a small code table translating pulse-pair tokens into
//! `0`/`1` characters. The mapper is strict: every token must be covered.

pub mod error;
pub mod parser;

pub use error::MappingError;
pub use parser::{CodeEntry, map_tokens};
