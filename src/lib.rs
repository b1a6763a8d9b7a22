//! minibson — a compact tag-byte binary encoding for JSON-shaped values.
//!
//! Every element starts with one header byte carrying a 3-bit type and five
//! bits of inline data. Strings and blobs use a 13-bit length, integers carry
//! a sign bit and a minimal little-endian magnitude, and containers are
//! bracketed by open/close tags. Repeated strings can be replaced by indices
//! into a [`CodeTable`] shared out-of-band by both sides.
//!
//! # Architecture
//!
//! - **`wire`** — Tag grammar, encoder, decoder and strict-mode validation
//! - **`codes`** — The shared string dictionary
//! - **`types`** — `BsonValue` and its `serde_json` conversions
//! - **`config`** — `Codec` settings: strict mode and depth limit
//!
//! ```
//! use minibson::{BsonValue, CodeTable, code, decode, encode};
//!
//! let codes = CodeTable::new(["some", "string", "constants"]);
//! let value = BsonValue::Object(vec![
//!     (code("constants"), code("string")),
//!     ("int".into(), BsonValue::from(123)),
//! ]);
//! let bytes = encode(&value, &codes);
//! let decoded = decode(&bytes, &codes)?;
//! assert_eq!(decoded.get("constants"), Some(&BsonValue::from("string")));
//! # Ok::<(), minibson::BsonError>(())
//! ```

pub mod codes;
pub mod config;
pub mod error;
pub mod types;
pub mod wire;

use bytes::Bytes;

pub use codes::CodeTable;
pub use config::{Codec, DEFAULT_MAX_DEPTH};
pub use error::BsonError;
pub use types::{BsonObject, BsonValue};

/// Encodes `value`, degrading silently where the format cannot carry it.
pub fn encode(value: &BsonValue, codes: &CodeTable) -> Bytes {
    Codec::default().write(value, codes)
}

/// Decodes one value from `input`. Empty input yields an empty object.
pub fn decode(input: &[u8], codes: &CodeTable) -> Result<BsonValue, BsonError> {
    Codec::default().decode(input, codes)
}

/// Marks `s` for code table substitution on encode.
pub fn code(s: impl Into<String>) -> BsonValue {
    BsonValue::Code(s.into())
}
