//! Globaltronics GT-WT-01 temperature/humidity sensors.
//!
//! Both known hardware variants share pulse timing and the pulse-pair code
//! table (`01` → 0, `02` → 1, `03` → sync) and differ only in where the fields
//! sit in the payload. Timing, code table and field offsets live in `layout`;
//! field extraction lives in `parser`.

pub mod layout;
pub mod parser;

pub use parser::decode_fields;
