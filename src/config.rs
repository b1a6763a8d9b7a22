//! Codec configuration.

use bytes::{Bytes, BytesMut};

use crate::codes::CodeTable;
use crate::error::BsonError;
use crate::types::BsonValue;
use crate::wire::{self, DecodeOptions};

/// Default limit on container nesting for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Encoder and decoder settings.
///
/// The code table is not part of the configuration; it is borrowed per call
/// so that its lifetime stays with the caller.
///
/// ```
/// use minibson::{BsonValue, Codec, CodeTable};
///
/// let codec = Codec::new().strict(true).max_depth(16);
/// let codes = CodeTable::new(["status"]);
/// let bytes = codec.encode(&BsonValue::Code("status".into()), &codes)?;
/// assert_eq!(codec.decode(&bytes, &codes)?, BsonValue::from("status"));
/// # Ok::<(), minibson::BsonError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    strict: bool,
    max_depth: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Codec {
    /// Creates a lenient codec with the default depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns silent truncation and coercion into errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the maximum container nesting depth.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Returns whether truncation and coercion are reported as errors.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Encodes `value`. Only fails in strict mode.
    pub fn encode(&self, value: &BsonValue, codes: &CodeTable) -> Result<Bytes, BsonError> {
        if self.strict {
            wire::validate(value, self.max_depth)?;
        }
        Ok(self.write(value, codes))
    }

    /// Encodes without validation, degrading what the format cannot carry.
    pub(crate) fn write(&self, value: &BsonValue, codes: &CodeTable) -> Bytes {
        let mut buf = BytesMut::new();
        wire::encode_value(&mut buf, value, codes, self.max_depth);
        tracing::trace!(len = buf.len(), strict = self.strict, "encoded value");
        buf.freeze()
    }

    /// Decodes exactly one value from `input`.
    ///
    /// Empty input decodes to an empty object.
    pub fn decode(&self, input: &[u8], codes: &CodeTable) -> Result<BsonValue, BsonError> {
        if input.is_empty() {
            return Ok(BsonValue::object());
        }
        let mut cursor = input;
        let opts = DecodeOptions {
            max_depth: self.max_depth,
            strict: self.strict,
        };
        let value = wire::decode_value(&mut cursor, codes, opts).inspect_err(|e| {
            tracing::debug!(len = input.len(), error = %e, "decode failed");
        })?;
        if !cursor.is_empty() {
            return Err(BsonError::TrailingBytes(cursor.len()));
        }
        tracing::trace!(len = input.len(), "decoded value");
        Ok(value)
    }
}
