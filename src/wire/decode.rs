//! Decoding: bytes → `BsonValue`.

use bytes::Buf;

use super::tag::{self, ContainerKind};
use crate::codes::CodeTable;
use crate::error::BsonError;
use crate::types::{BsonObject, BsonValue};

/// Decoder settings that are not part of the wire state.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum container nesting accepted before failing.
    pub max_depth: usize,
    /// Fail on code indices outside the table instead of yielding null.
    pub strict: bool,
}

/// Decodes a single value from the buffer.
pub fn decode_value(
    buf: &mut impl Buf,
    codes: &CodeTable,
    opts: DecodeOptions,
) -> Result<BsonValue, BsonError> {
    let mut decoder = Decoder { buf, codes, opts };
    match decoder.item(0)? {
        Item::Value(v) => Ok(v),
        Item::Close(_) => Err(BsonError::UnexpectedClose),
    }
}

/// One header's worth of input: either a complete value or a container close.
enum Item {
    Value(BsonValue),
    Close(ContainerKind),
}

struct Decoder<'a, B> {
    buf: &'a mut B,
    codes: &'a CodeTable,
    opts: DecodeOptions,
}

impl<B: Buf> Decoder<'_, B> {
    fn item(&mut self, depth: usize) -> Result<Item, BsonError> {
        ensure_remaining(self.buf, 1)?;
        let header = self.buf.get_u8();
        let data = header & tag::DATA_MASK;

        let value = match header & tag::TYPE_MASK {
            tag::NULL => BsonValue::Null,

            tag::BOOLEAN => BsonValue::Boolean(data & tag::BOOL_TRUE != 0),

            tag::INTEGER => self.integer(data)?,

            tag::FLOAT => {
                // The data bits are a legacy decimal-rounding hint and are ignored.
                ensure_remaining(self.buf, tag::FLOAT_SIZE)?;
                BsonValue::Float(f64::from(self.buf.get_f32_le()))
            }

            tag::STRING => {
                let len = self.length(data)?;
                BsonValue::String(String::from_utf8(self.bytes(len)?)?)
            }

            tag::CODE => {
                let index = self.length(data)?;
                self.code(index)?
            }

            tag::BINARY => {
                let len = self.length(data)?;
                BsonValue::Binary(self.bytes(len)?)
            }

            // The only remaining type is CONTAINER.
            _ => {
                let kind = ContainerKind::from_data(data);
                if data & tag::CONT_OPEN == 0 {
                    return Ok(Item::Close(kind));
                }
                if depth >= self.opts.max_depth {
                    return Err(BsonError::DepthLimitExceeded(self.opts.max_depth));
                }
                match kind {
                    ContainerKind::Array => self.array(depth + 1)?,
                    ContainerKind::Object => self.object(depth + 1)?,
                }
            }
        };
        Ok(Item::Value(value))
    }

    fn integer(&mut self, data: u8) -> Result<BsonValue, BsonError> {
        let size = usize::from(data & tag::INT_SIZE_MASK);
        ensure_remaining(self.buf, size)?;
        let mut le = [0u8; 16];
        self.buf.copy_to_slice(&mut le[..size]);
        // At most 15 bytes, so the magnitude always fits in i128.
        let magnitude = u128::from_le_bytes(le) as i128;
        let value = if data & tag::INT_NEGATIVE != 0 {
            -magnitude
        } else {
            magnitude
        };
        Ok(BsonValue::from(value))
    }

    fn code(&mut self, index: usize) -> Result<BsonValue, BsonError> {
        let index = index as u16;
        match self.codes.get(index) {
            Some(s) => Ok(BsonValue::String(s.to_owned())),
            None if self.opts.strict => Err(BsonError::UnknownCode(index)),
            None => {
                tracing::debug!(index, table_len = self.codes.len(), "code index out of range");
                Ok(BsonValue::Null)
            }
        }
    }

    fn array(&mut self, depth: usize) -> Result<BsonValue, BsonError> {
        let mut items = Vec::new();
        loop {
            match self.item(depth)? {
                Item::Value(v) => items.push(v),
                Item::Close(ContainerKind::Array) => return Ok(BsonValue::Array(items)),
                Item::Close(found) => {
                    return Err(BsonError::MismatchedClose {
                        expected: ContainerKind::Array,
                        found,
                    });
                }
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<BsonValue, BsonError> {
        let mut entries = BsonObject::new();
        let mut key = None;
        loop {
            match self.item(depth)? {
                Item::Value(v) => match key.take() {
                    None => key = Some(v),
                    Some(k) => entries.push((k, v)),
                },
                Item::Close(ContainerKind::Object) if key.is_some() => {
                    return Err(BsonError::DanglingKey);
                }
                Item::Close(ContainerKind::Object) => return Ok(BsonValue::Object(entries)),
                Item::Close(found) => {
                    return Err(BsonError::MismatchedClose {
                        expected: ContainerKind::Object,
                        found,
                    });
                }
            }
        }
    }

    /// Reads the low byte of a 13-bit length or index.
    fn length(&mut self, data: u8) -> Result<usize, BsonError> {
        ensure_remaining(self.buf, 1)?;
        Ok(usize::from(tag::unpack13(data, self.buf.get_u8())))
    }

    fn bytes(&mut self, len: usize) -> Result<Vec<u8>, BsonError> {
        ensure_remaining(self.buf, len)?;
        let mut data = vec![0u8; len];
        self.buf.copy_to_slice(&mut data);
        Ok(data)
    }
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), BsonError> {
    if buf.remaining() < needed {
        Err(BsonError::UnexpectedEof {
            needed,
            remaining: buf.remaining(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode;
    use bytes::BytesMut;

    const OPTS: DecodeOptions = DecodeOptions {
        max_depth: 128,
        strict: false,
    };

    fn decode(bytes: &[u8]) -> Result<BsonValue, BsonError> {
        let mut cursor = bytes;
        decode_value(&mut cursor, &CodeTable::default(), OPTS)
    }

    /// Encode then decode a value and verify round-trip.
    fn round_trip(value: &BsonValue) -> BsonValue {
        let mut buf = BytesMut::new();
        encode::encode_value(&mut buf, value, &CodeTable::default(), 128);
        decode(&buf).expect("decode failed")
    }

    #[test]
    fn round_trip_scalars() {
        for v in [
            BsonValue::Null,
            BsonValue::Boolean(true),
            BsonValue::Boolean(false),
            BsonValue::Float(1.5),
            BsonValue::from("hello"),
            BsonValue::Binary(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        ] {
            assert_eq!(round_trip(&v), v);
        }
    }

    #[test]
    fn round_trip_integers() {
        for i in [0, 1, -1, 255, -255, 256, i64::from(i32::MIN), i64::MAX, i64::MIN] {
            assert_eq!(round_trip(&BsonValue::Integer(i)), BsonValue::Integer(i), "failed for {i}");
        }
    }

    #[test]
    fn big_integers_keep_precision() {
        let max = (1i128 << 120) - 1;
        for i in [max, -max, i128::from(i64::MAX) + 1, i128::from(i64::MIN) - 1] {
            assert_eq!(round_trip(&BsonValue::BigInt(i)), BsonValue::BigInt(i), "failed for {i}");
        }
    }

    #[test]
    fn large_integral_float_decodes_exactly() {
        assert_eq!(round_trip(&BsonValue::Float(1e30)), BsonValue::BigInt(1e30 as i128));
        assert_eq!(
            round_trip(&BsonValue::Float(-(2f64.powi(100)))),
            BsonValue::BigInt(-(1i128 << 100))
        );
    }

    #[test]
    fn big_int_in_native_range_narrows() {
        assert_eq!(round_trip(&BsonValue::BigInt(42)), BsonValue::Integer(42));
    }

    #[test]
    fn negative_zero_integer() {
        assert_eq!(decode(&[tag::INTEGER | tag::INT_NEGATIVE]).unwrap(), BsonValue::Integer(0));
    }

    #[test]
    fn float_is_single_precision() {
        let decoded = round_trip(&BsonValue::Float(1.23));
        assert_eq!(decoded, BsonValue::Float(f64::from(1.23f32)));
    }

    #[test]
    fn float_data_bits_ignored() {
        let mut bytes = vec![tag::FLOAT | 0x04];
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        assert_eq!(decode(&bytes).unwrap(), BsonValue::Float(0.5));
    }

    #[test]
    fn round_trip_nested() {
        let val = BsonValue::Object(vec![
            (BsonValue::from("int"), BsonValue::Integer(123)),
            (
                BsonValue::from("arr"),
                BsonValue::Array(vec![
                    BsonValue::from("str"),
                    BsonValue::Boolean(true),
                    BsonValue::Binary(vec![1, 2, 3]),
                    BsonValue::object(),
                ]),
            ),
            (BsonValue::from("nul"), BsonValue::Null),
        ]);
        assert_eq!(round_trip(&val), val);
    }

    #[test]
    fn object_with_non_string_key() {
        let val = BsonValue::Object(vec![(BsonValue::Integer(1), BsonValue::from("one"))]);
        assert_eq!(round_trip(&val), val);
    }

    #[test]
    fn code_resolves_against_table() {
        let codes = CodeTable::new(["some", "string"]);
        let mut cursor = &[tag::CODE, 1][..];
        assert_eq!(
            decode_value(&mut cursor, &codes, OPTS).unwrap(),
            BsonValue::from("string")
        );
    }

    #[test]
    fn code_out_of_range() {
        let bytes = [tag::CODE, 9];
        assert_eq!(decode(&bytes).unwrap(), BsonValue::Null);

        let strict = DecodeOptions { strict: true, ..OPTS };
        let mut cursor = &bytes[..];
        let err = decode_value(&mut cursor, &CodeTable::default(), strict).unwrap_err();
        assert!(matches!(err, BsonError::UnknownCode(9)));
    }

    #[test]
    fn truncated_payloads() {
        assert!(matches!(decode(&[]), Err(BsonError::UnexpectedEof { needed: 1, remaining: 0 })));
        assert!(matches!(decode(&[tag::STRING]), Err(BsonError::UnexpectedEof { .. })));
        assert!(matches!(
            decode(&[tag::STRING, 4, b'a']),
            Err(BsonError::UnexpectedEof { needed: 4, remaining: 1 })
        ));
        assert!(matches!(decode(&[tag::FLOAT, 0, 0]), Err(BsonError::UnexpectedEof { .. })));
        assert!(matches!(decode(&[tag::INTEGER | 2, 1]), Err(BsonError::UnexpectedEof { .. })));
    }

    #[test]
    fn unmatched_open() {
        let err = decode(&[tag::ARRAY_OPEN, 0x21, 0x20]).unwrap_err();
        assert!(matches!(err, BsonError::UnexpectedEof { .. }));
    }

    #[test]
    fn mismatched_close() {
        let err = decode(&[tag::ARRAY_OPEN, tag::OBJECT_CLOSE]).unwrap_err();
        assert!(matches!(
            err,
            BsonError::MismatchedClose {
                expected: ContainerKind::Array,
                found: ContainerKind::Object,
            }
        ));
    }

    #[test]
    fn dangling_key() {
        let err = decode(&[tag::OBJECT_OPEN, tag::STRING, 1, b'k', tag::OBJECT_CLOSE]).unwrap_err();
        assert!(matches!(err, BsonError::DanglingKey));
    }

    #[test]
    fn close_at_top_level() {
        assert!(matches!(decode(&[tag::ARRAY_CLOSE]), Err(BsonError::UnexpectedClose)));
    }

    #[test]
    fn invalid_utf8() {
        assert!(matches!(decode(&[tag::STRING, 1, 0xFF]), Err(BsonError::InvalidUtf8(_))));
    }

    #[test]
    fn depth_limit() {
        let bytes = [tag::ARRAY_OPEN, tag::ARRAY_OPEN, tag::ARRAY_CLOSE, tag::ARRAY_CLOSE];
        let shallow = DecodeOptions { max_depth: 1, ..OPTS };
        let mut cursor = &bytes[..];
        let err = decode_value(&mut cursor, &CodeTable::default(), shallow).unwrap_err();
        assert!(matches!(err, BsonError::DepthLimitExceeded(1)));

        assert_eq!(
            decode(&bytes).unwrap(),
            BsonValue::Array(vec![BsonValue::Array(vec![])])
        );
    }

    #[test]
    fn cursor_stops_after_value() {
        let bytes = [0x21, 0xE0];
        let mut cursor = &bytes[..];
        let v = decode_value(&mut cursor, &CodeTable::default(), OPTS).unwrap();
        assert_eq!(v, BsonValue::Boolean(true));
        assert_eq!(cursor.remaining(), 1);
    }
}
