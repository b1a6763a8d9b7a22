//! Tag-byte wire format.
//!
//! Each element is a header byte (`TTTDDDDD`: 3-bit type, 5 data bits)
//! followed by an optional payload. Multi-byte numbers are little-endian.
//! Containers carry no element count; they are bracketed by open and close
//! tags instead.

pub mod decode;
pub mod encode;
pub mod tag;
pub mod validate;

pub use decode::{DecodeOptions, decode_value};
pub use encode::encode_value;
pub use validate::validate;
