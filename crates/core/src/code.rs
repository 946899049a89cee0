//! Code table generation.
//!
//! Walks a [`HuffmanTree`] depth-first, appending `0` for each left edge
//! and `1` for each right edge, and binds the accumulated bits to each
//! leaf's symbol. The table is display and encoding data only: decoding
//! always rebuilds the tree from the frequency table.

use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// The bit sequence assigned to one symbol, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// A code from explicit bits.
    pub fn from_bits(bits: &[bool]) -> Self {
        Self {
            bits: bits.to_vec(),
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits in emission order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// True when `self` is a prefix of `other` (including equal codes).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn child(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Generate the code table for `tree`.
    ///
    /// A tree whose root is a leaf assigns that symbol the code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();

        if let Node::Leaf { symbol, .. } = tree.node(tree.root()) {
            codes.insert(*symbol, Code::from_bits(&[false]));
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((id, code)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    codes.insert(*symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((*right, code.child(true)));
                    stack.push((*left, code.child(false)));
                }
            }
        }

        Self { codes }
    }

    /// Code for `symbol`, if it occurs in the source table.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Number of bits needed to encode input with these frequencies.
    ///
    /// Symbols without a code contribute nothing. Returns `None` on overflow.
    pub fn encoded_bit_len(&self, table: &FrequencyTable) -> Option<u64> {
        table.iter().try_fold(0u64, |acc, (symbol, count)| {
            let len = self.get(symbol).map_or(0, Code::len) as u64;
            acc.checked_add(count.checked_mul(len)?)
        })
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        // Lexicographic order puts any prefix directly before an extension of it.
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{}: {}", symbol_label(symbol), code)?;
        }
        Ok(())
    }
}

/// Display label for a symbol: `'c'` for printable ASCII, `[n]` otherwise.
pub fn symbol_label(symbol: u8) -> String {
    if symbol.is_ascii_graphic() || symbol == b' ' {
        format!("'{}'", symbol as char)
    } else {
        format!("[{symbol}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data)).unwrap();
        CodeTable::from_tree(&tree)
    }

    #[test]
    fn test_aaab_codes() {
        let codes = table_for(b"aaab");
        assert_eq!(codes.get(b'b').unwrap().to_string(), "0");
        assert_eq!(codes.get(b'a').unwrap().to_string(), "1");
        assert!(codes.get(b'c').is_none());

        let freqs = FrequencyTable::from_bytes(b"aaab");
        assert_eq!(codes.encoded_bit_len(&freqs), Some(4));
    }

    #[test]
    fn test_single_symbol_gets_zero() {
        let codes = table_for(&[0x42; 1000]);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(0x42), Some(&Code::from_bits(&[false])));
    }

    #[test]
    fn test_every_symbol_gets_one_code() {
        let data = b"abracadabra, the quick brown fox";
        let freqs = FrequencyTable::from_bytes(data);
        let codes = table_for(data);

        assert_eq!(codes.len(), freqs.len());
        for (symbol, _) in freqs.iter() {
            assert!(!codes.get(symbol).unwrap().is_empty());
        }
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_uniform_alphabet_is_eight_bits() {
        let data: Vec<u8> = (0..=255).collect();
        let codes = table_for(&data);
        assert_eq!(codes.len(), 256);
        assert!(codes.iter().all(|(_, code)| code.len() == 8));
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'e'; 100];
        data.extend_from_slice(b"xyz");
        let codes = table_for(&data);

        let e = codes.get(b'e').unwrap().len();
        for s in [b'x', b'y', b'z'] {
            assert!(codes.get(s).unwrap().len() >= e);
        }
    }

    #[test]
    fn test_prefix_detection() {
        let zero = Code::from_bits(&[false]);
        let zero_one = Code::from_bits(&[false, true]);
        assert!(zero.is_prefix_of(&zero_one));
        assert!(!zero_one.is_prefix_of(&zero));

        let mut table = CodeTable::default();
        table.codes.insert(1, zero);
        table.codes.insert(2, zero_one);
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_display() {
        let codes = table_for(b"aaab\n\n\n\n\n");
        let text = codes.to_string();
        assert!(text.contains("[10]: "));
        assert!(text.contains("'a': "));
        assert!(text.contains("'b': "));
        assert_eq!(symbol_label(0xff), "[255]");
        assert_eq!(symbol_label(b' '), "' '");
    }
}
