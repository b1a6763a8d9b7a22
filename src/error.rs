//! Error types for encoding and decoding.

use std::string::FromUtf8Error;

use crate::wire::tag::ContainerKind;

/// Errors that can occur while decoding, or while encoding in strict mode.
#[derive(Debug, thiserror::Error)]
pub enum BsonError {
    #[error("unexpected end of data: need {needed} bytes but only {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("mismatched close: expected {expected} close, found {found} close")]
    MismatchedClose {
        expected: ContainerKind,
        found: ContainerKind,
    },

    #[error("container close without a matching open")]
    UnexpectedClose,

    #[error("object closed with a dangling key and no value")]
    DanglingKey,

    #[error("{0} trailing bytes after top-level value")]
    TrailingBytes(usize),

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("code index {0} is outside the code table")]
    UnknownCode(u16),

    #[error("string of {0} bytes exceeds the 8191-byte limit")]
    StringTooLong(usize),

    #[error("binary of {0} bytes exceeds the 8191-byte limit")]
    BinaryTooLong(usize),

    #[error("integer magnitude needs more than 15 bytes")]
    IntegerTooLarge,
}

impl BsonError {
    /// Returns `true` for errors caused by malformed bracketing or truncated
    /// input, as opposed to value-level problems.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. }
                | Self::MismatchedClose { .. }
                | Self::UnexpectedClose
                | Self::DanglingKey
                | Self::TrailingBytes(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_classification() {
        assert!(BsonError::DanglingKey.is_structural());
        assert!(BsonError::UnexpectedClose.is_structural());
        assert!(BsonError::UnexpectedEof { needed: 2, remaining: 0 }.is_structural());
        assert!(!BsonError::UnknownCode(3).is_structural());
        assert!(!BsonError::StringTooLong(9000).is_structural());
    }

    #[test]
    fn mismatched_close_message() {
        let e = BsonError::MismatchedClose {
            expected: ContainerKind::Object,
            found: ContainerKind::Array,
        };
        assert_eq!(
            e.to_string(),
            "mismatched close: expected object close, found array close"
        );
    }
}
