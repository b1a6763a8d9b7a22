//! Header byte constants.
//!
//! Every element starts with a header byte laid out as `TTTDDDDD`: the top
//! three bits select the type, the low five bits carry type-specific data.

use std::fmt;

pub const TYPE_MASK: u8 = 0b1110_0000;
pub const DATA_MASK: u8 = 0b0001_1111;

// Types
pub const STRING: u8 = 0x00;
pub const BOOLEAN: u8 = 0x20;
pub const INTEGER: u8 = 0x40;
pub const FLOAT: u8 = 0x60;
pub const CODE: u8 = 0x80;
pub const BINARY: u8 = 0xA0;
pub const CONTAINER: u8 = 0xC0;
pub const NULL: u8 = 0xE0;

// Container data bits. Clear CONT_OBJECT means array, clear CONT_OPEN means close.
pub const CONT_OBJECT: u8 = 1 << 4;
pub const CONT_OPEN: u8 = 1 << 3;

pub const OBJECT_OPEN: u8 = CONTAINER | CONT_OBJECT | CONT_OPEN;
pub const OBJECT_CLOSE: u8 = CONTAINER | CONT_OBJECT;
pub const ARRAY_OPEN: u8 = CONTAINER | CONT_OPEN;
pub const ARRAY_CLOSE: u8 = CONTAINER;

// Integer data bits: sign at bit 4, magnitude byte count in bits 0..=3.
pub const INT_NEGATIVE: u8 = 1 << 4;
pub const INT_SIZE_MASK: u8 = 0x0F;
pub const INT_MAX_SIZE: usize = 15;

// Boolean data bit.
pub const BOOL_TRUE: u8 = 1;

/// Largest value of a 13-bit length or code index.
pub const MAX_LEN: usize = 0x1FFF;

/// Number of payload bytes that always follow a float header.
pub const FLOAT_SIZE: usize = 4;

/// Array or object bracketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    Object,
}

impl ContainerKind {
    pub fn open_tag(self) -> u8 {
        match self {
            Self::Array => ARRAY_OPEN,
            Self::Object => OBJECT_OPEN,
        }
    }

    pub fn close_tag(self) -> u8 {
        match self {
            Self::Array => ARRAY_CLOSE,
            Self::Object => OBJECT_CLOSE,
        }
    }

    /// Reads the kind from a container header's data bits.
    pub fn from_data(data: u8) -> Self {
        if data & CONT_OBJECT != 0 {
            Self::Object
        } else {
            Self::Array
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Packs a 13-bit value under `ty`: upper five bits in the header, low eight
/// in the following byte. `n` must not exceed [`MAX_LEN`].
pub fn pack13(ty: u8, n: usize) -> [u8; 2] {
    debug_assert!(n <= MAX_LEN, "13-bit field overflow: {n}");
    [ty | ((n >> 8) as u8 & DATA_MASK), n as u8]
}

/// Rebuilds a 13-bit value from header data bits and the following byte.
pub fn unpack13(data: u8, low: u8) -> u16 {
    (u16::from(data & DATA_MASK) << 8) | u16::from(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_tags() {
        assert_eq!(OBJECT_OPEN, 0xD8);
        assert_eq!(OBJECT_CLOSE, 0xD0);
        assert_eq!(ARRAY_OPEN, 0xC8);
        assert_eq!(ARRAY_CLOSE, 0xC0);
    }

    #[test]
    fn kind_from_data() {
        assert_eq!(ContainerKind::from_data(OBJECT_OPEN & DATA_MASK), ContainerKind::Object);
        assert_eq!(ContainerKind::from_data(ARRAY_CLOSE & DATA_MASK), ContainerKind::Array);
    }

    #[test]
    fn pack_max_len() {
        assert_eq!(pack13(STRING, MAX_LEN), [0x1F, 0xFF]);
        assert_eq!(unpack13(0x1F, 0xFF) as usize, MAX_LEN);
    }

    #[test]
    fn pack_keeps_type_bits() {
        let [hi, lo] = pack13(BINARY, 0x0123);
        assert_eq!(hi & TYPE_MASK, BINARY);
        assert_eq!(unpack13(hi & DATA_MASK, lo), 0x0123);
    }
}
