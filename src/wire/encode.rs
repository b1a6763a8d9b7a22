//! Encoding: `BsonValue` → bytes.
//!
//! Encoding never fails. Values the format cannot carry are degraded instead:
//! oversize strings and binaries are truncated to 8191 bytes, and integers
//! needing more than 15 magnitude bytes become null. Trees nested deeper than
//! the depth limit have the offending containers replaced by null. Use
//! [`super::validate::validate`] first to reject these cases instead.

use bytes::{BufMut, BytesMut};

use super::tag::{self, ContainerKind};
use crate::codes::CodeTable;
use crate::types::BsonValue;

/// Floats at or above this magnitude (2^120) need more than 15 integer bytes.
const INTEGRAL_FLOAT_LIMIT: f64 = (1u128 << 120) as f64;

/// Encodes `value` into the buffer, substituting code table indices for
/// `Code` strings found in `codes`.
pub fn encode_value(buf: &mut BytesMut, value: &BsonValue, codes: &CodeTable, max_depth: usize) {
    Encoder { buf, codes, max_depth }.value(value, 0);
}

struct Encoder<'a> {
    buf: &'a mut BytesMut,
    codes: &'a CodeTable,
    max_depth: usize,
}

impl Encoder<'_> {
    fn value(&mut self, value: &BsonValue, depth: usize) {
        match value {
            BsonValue::Null => encode_null(self.buf),
            BsonValue::Boolean(b) => encode_bool(self.buf, *b),
            BsonValue::Integer(i) => encode_int(self.buf, i128::from(*i)),
            BsonValue::BigInt(i) => encode_int(self.buf, *i),
            BsonValue::Float(f) => encode_number(self.buf, *f),
            BsonValue::String(s) => encode_string(self.buf, s),
            BsonValue::Code(s) => encode_code(self.buf, s, self.codes),
            BsonValue::Binary(b) => encode_binary(self.buf, b),
            BsonValue::Array(items) => {
                if !self.enter(depth) {
                    return;
                }
                self.buf.put_u8(ContainerKind::Array.open_tag());
                for item in items {
                    self.value(item, depth + 1);
                }
                self.buf.put_u8(ContainerKind::Array.close_tag());
            }
            BsonValue::Object(entries) => {
                if !self.enter(depth) {
                    return;
                }
                self.buf.put_u8(ContainerKind::Object.open_tag());
                for (key, value) in entries {
                    self.value(key, depth + 1);
                    self.value(value, depth + 1);
                }
                self.buf.put_u8(ContainerKind::Object.close_tag());
            }
        }
    }

    /// Checks the depth limit before opening a container at `depth`, writing
    /// null in its place when the limit is hit.
    fn enter(&mut self, depth: usize) -> bool {
        if depth < self.max_depth {
            return true;
        }
        tracing::warn!(
            max_depth = self.max_depth,
            "container exceeds depth limit, encoded as null"
        );
        encode_null(self.buf);
        false
    }
}

pub fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(tag::NULL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(tag::BOOLEAN | if value { tag::BOOL_TRUE } else { 0 });
}

/// Encodes an integer as sign bit plus minimal little-endian magnitude.
pub fn encode_int(buf: &mut BytesMut, value: i128) {
    let magnitude = value.unsigned_abs();
    let size = magnitude_size(magnitude);
    if size > tag::INT_MAX_SIZE {
        tracing::warn!(%value, "integer magnitude exceeds 15 bytes, encoded as null");
        encode_null(buf);
        return;
    }
    let sign = if value < 0 { tag::INT_NEGATIVE } else { 0 };
    buf.put_u8(tag::INTEGER | sign | size as u8);
    buf.put_slice(&magnitude.to_le_bytes()[..size]);
}

/// Number of bytes needed for `magnitude` with no leading zero byte.
pub fn magnitude_size(magnitude: u128) -> usize {
    (128 - magnitude.leading_zeros() as usize).div_ceil(8)
}

/// Encodes a number the way a dynamically typed source would: finite
/// integral values go out as integers, everything else as a float.
pub fn encode_number(buf: &mut BytesMut, value: f64) {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGRAL_FLOAT_LIMIT {
        // Exact: the value is integral and below 2^120.
        encode_int(buf, value as i128);
    } else {
        encode_float(buf, value as f32);
    }
}

pub fn encode_float(buf: &mut BytesMut, value: f32) {
    buf.put_u8(tag::FLOAT);
    buf.put_f32_le(value);
}

/// Encodes a string, truncating to 8191 bytes at a char boundary.
pub fn encode_string(buf: &mut BytesMut, value: &str) {
    let bytes = truncate_str(value).as_bytes();
    buf.put_slice(&tag::pack13(tag::STRING, bytes.len()));
    buf.put_slice(bytes);
}

/// Encodes a code table reference, or the plain string when `value` has no
/// index in `codes`.
pub fn encode_code(buf: &mut BytesMut, value: &str, codes: &CodeTable) {
    match codes.position(value) {
        Some(index) => buf.put_slice(&tag::pack13(tag::CODE, usize::from(index))),
        None => {
            tracing::debug!(code = value, "code not in table, encoded as string");
            encode_string(buf, value);
        }
    }
}

/// Encodes raw bytes, truncating to 8191 bytes.
pub fn encode_binary(buf: &mut BytesMut, value: &[u8]) {
    let len = if value.len() > tag::MAX_LEN {
        tracing::debug!(len = value.len(), "binary truncated to 8191 bytes");
        tag::MAX_LEN
    } else {
        value.len()
    };
    buf.put_slice(&tag::pack13(tag::BINARY, len));
    buf.put_slice(&value[..len]);
}

fn truncate_str(value: &str) -> &str {
    if value.len() <= tag::MAX_LEN {
        return value;
    }
    let mut end = tag::MAX_LEN;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    tracing::debug!(len = value.len(), truncated = end, "string truncated");
    &value[..end]
}
