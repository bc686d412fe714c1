//! Fixed-layout message slicing.
//!
//! Layered like a protocol decoder:
//! - `layout`: field table, offsets and expected constants (source of truth)
//! - `reader`: bounds-checked cursor and ASCII field decoding
//! - `parser`: walks the layout, separating fatal truncation from warnings
//! - `error`: fatal errors
//!
//! Only a buffer too short for a fixed field is fatal. The marker byte, the
//! hemisphere letters and the separator are checked but never abort slicing.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::MessageError;
pub use parser::{DecodedField, decode_hex, slice_message};
