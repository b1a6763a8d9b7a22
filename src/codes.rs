//! Shared string dictionary.
//!
//! A [`CodeTable`] is agreed out-of-band between the encoding and decoding
//! sides. Strings marked with [`crate::code`] are written as their 13-bit
//! position in the table. Both sides must hold the same entries in the same
//! order; a mismatched table decodes to the wrong strings without any error.

use std::collections::HashMap;

use crate::wire::tag::MAX_LEN;

/// An immutable, ordered list of strings with a reverse index.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: Vec<String>,
    index: HashMap<String, u16>,
}

impl CodeTable {
    /// Builds a table from an ordered sequence of strings.
    ///
    /// Duplicates keep their first position. Entries beyond index 8191 are
    /// stored but cannot be referenced on the wire.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(codes.len().min(MAX_LEN + 1));
        for (i, code) in codes.iter().enumerate().take(MAX_LEN + 1) {
            index.entry(code.clone()).or_insert(i as u16);
        }
        Self { codes, index }
    }

    /// Returns the wire index of `s`, if present.
    pub fn position(&self, s: &str) -> Option<u16> {
        self.index.get(s).copied()
    }

    pub fn get(&self, index: u16) -> Option<&str> {
        self.codes.get(usize::from(index)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CodeTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_both_ways() {
        let table = CodeTable::new(["some", "string", "constants"]);
        assert_eq!(table.position("string"), Some(1));
        assert_eq!(table.position("missing"), None);
        assert_eq!(table.get(2), Some("constants"));
        assert_eq!(table.get(3), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let table: CodeTable = ["a", "b", "a"].into_iter().collect();
        assert_eq!(table.position("a"), Some(0));
        assert_eq!(table.get(2), Some("a"));
    }

    #[test]
    fn entries_past_13_bits_are_unindexed() {
        let table = CodeTable::new((0..=MAX_LEN + 1).map(|i| i.to_string()));
        assert_eq!(table.position(&MAX_LEN.to_string()), Some(MAX_LEN as u16));
        assert_eq!(table.position(&(MAX_LEN + 1).to_string()), None);
        assert_eq!(table.len(), MAX_LEN + 2);
    }

    #[test]
    fn empty_by_default() {
        let table = CodeTable::default();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }
}
