//! Pre-encode checks for strict mode.
//!
//! [`validate`] reports the first value the encoder would otherwise degrade
//! silently, so a strict caller can refuse the whole tree before any bytes
//! are written.

use super::encode::magnitude_size;
use super::tag;
use crate::error::BsonError;
use crate::types::BsonValue;

/// Checks that `value` encodes without truncation or coercion.
///
/// Code strings are not checked against a table: a miss falls back to a plain
/// string, which is lossless as long as the string itself fits.
pub fn validate(value: &BsonValue, max_depth: usize) -> Result<(), BsonError> {
    check(value, 0, max_depth)
}

fn check(value: &BsonValue, depth: usize, max_depth: usize) -> Result<(), BsonError> {
    match value {
        BsonValue::Null | BsonValue::Boolean(_) | BsonValue::Integer(_) | BsonValue::Float(_) => {
            Ok(())
        }
        BsonValue::BigInt(i) => {
            if magnitude_size(i.unsigned_abs()) > tag::INT_MAX_SIZE {
                Err(BsonError::IntegerTooLarge)
            } else {
                Ok(())
            }
        }
        BsonValue::String(s) | BsonValue::Code(s) => {
            if s.len() > tag::MAX_LEN {
                Err(BsonError::StringTooLong(s.len()))
            } else {
                Ok(())
            }
        }
        BsonValue::Binary(b) => {
            if b.len() > tag::MAX_LEN {
                Err(BsonError::BinaryTooLong(b.len()))
            } else {
                Ok(())
            }
        }
        BsonValue::Array(items) => {
            enter(depth, max_depth)?;
            items.iter().try_for_each(|item| check(item, depth + 1, max_depth))
        }
        BsonValue::Object(entries) => {
            enter(depth, max_depth)?;
            entries.iter().try_for_each(|(k, v)| {
                check(k, depth + 1, max_depth)?;
                check(v, depth + 1, max_depth)
            })
        }
    }
}

fn enter(depth: usize, max_depth: usize) -> Result<(), BsonError> {
    if depth >= max_depth {
        Err(BsonError::DepthLimitExceeded(max_depth))
    } else {
        Ok(())
    }
}
