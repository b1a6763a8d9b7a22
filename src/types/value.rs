//! Value tree types.

use std::fmt;

/// Insertion-ordered object body. Keys are full values, conventionally strings.
pub type BsonObject = Vec<(BsonValue, BsonValue)>;

/// A value representable in the wire format.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BsonValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    /// Integer outside the `i64` range. The wire carries at most 15 magnitude
    /// bytes, so only magnitudes below 2^120 survive encoding.
    BigInt(i128),
    /// Encoded as IEEE single precision.
    Float(f64),
    String(String),
    /// A string to be replaced by its code table index when encoded.
    /// Decodes back as a plain `String`.
    Code(String),
    Binary(Vec<u8>),
    Array(Vec<BsonValue>),
    Object(BsonObject),
}

impl BsonValue {
    /// Creates an empty object.
    pub fn object() -> Self {
        Self::Object(BsonObject::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `Code` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Code(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an integer in range.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::BigInt(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Returns either integer representation widened to i128.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Integer(i) => Some(i128::from(*i)),
            Self::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::BigInt(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[BsonValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BsonObject> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the first object entry whose key is the string `key`.
    pub fn get(&self, key: &str) -> Option<&BsonValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }
}

// -- Convenience conversions --

impl From<bool> for BsonValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for BsonValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for BsonValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u64> for BsonValue {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::BigInt(i128::from(u)),
        }
    }
}

impl From<i128> for BsonValue {
    fn from(i: i128) -> Self {
        match i64::try_from(i) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::BigInt(i),
        }
    }
}

impl From<f32> for BsonValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for BsonValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for BsonValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for BsonValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<u8>> for BsonValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<BsonValue>> for BsonValue {
    fn from(v: Vec<BsonValue>) -> Self {
        Self::Array(v)
    }
}

impl From<BsonObject> for BsonValue {
    fn from(entries: BsonObject) -> Self {
        Self::Object(entries)
    }
}

impl fmt::Display for BsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Code(s) => write!(f, "code(\"{s}\")"),
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
