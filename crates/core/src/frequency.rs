//! Byte frequency counting.
//!
//! A [`FrequencyTable`] is the only state the persisted artifact carries
//! besides the packed bits, so both encoder and decoder build their trees
//! from it. Iteration is always in ascending symbol order regardless of how
//! the table was populated.

use crate::error::{HuffmanError, Result};

/// Occurrence counts for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// An empty table (no symbols).
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Count several sources as if they were concatenated in order.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut table = Self::new();
        for source in sources {
            table.update(source.as_ref());
        }
        table
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Order of the pairs does not matter.
    ///
    /// # Errors
    /// - `HuffmanError::DuplicateSymbol` if a symbol appears twice
    /// - `HuffmanError::ZeroFrequency` if a count is zero
    /// - `HuffmanError::FrequencyOverflow` if the total exceeds `u64`
    pub fn from_counts<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        let mut total = 0u64;

        for (symbol, count) in pairs {
            if count == 0 {
                return Err(HuffmanError::ZeroFrequency { symbol }.into());
            }
            if table.counts[symbol as usize] != 0 {
                return Err(HuffmanError::DuplicateSymbol { symbol }.into());
            }
            total = total
                .checked_add(count)
                .ok_or(HuffmanError::FrequencyOverflow)?;
            table.counts[symbol as usize] = count;
        }

        Ok(table)
    }

    /// Add the bytes of `data` to the counts.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Count for `symbol` (zero when absent).
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols present.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when no symbol has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counts, equal to the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present symbols and their counts, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Shannon entropy in bits per symbol, the lower bound for any prefix code.
    pub fn entropy(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }

        self.iter()
            .map(|(_, count)| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
