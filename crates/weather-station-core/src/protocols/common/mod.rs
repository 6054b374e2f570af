//! Bit-field primitives shared by every protocol layout.

pub mod error;
pub mod reader;

pub use error::FieldError;
pub use reader::BitReader;
