//! Raw capture normalization.
//!
//! The relay prints each burst as eight pulse-length slots followed by a token
//! sequence whose digits index those slots. Normalization drops unused slots,
//! sorts the lengths ascending and rewrites the tokens against the sorted
//! table, so protocol templates can be compared position by position.
//!
//! Field positions live in `layout`, whitespace splitting in `reader` and the
//! canonicalization itself in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::SignalError;
pub use parser::{Signal, normalize};
