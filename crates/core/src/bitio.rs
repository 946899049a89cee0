//! Bit-level packing and unpacking.
//!
//! `BitWriter` turns a sequence of single bits into a dense byte buffer and
//! `BitReader` replays it. Both operate MSB-first: logical bit `i` lives in
//! byte `i / 8` at bit position `7 - (i % 8)`.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: is bounded by an explicit logical bit length, so padding is
//!   never mistaken for data
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap();   // Write 2 bits: 1, 1
//! // Total: 10111 -> padded to 10111000
//!
//! let bit_len = writer.bit_len();
//! let bytes = writer.finish();
//! let mut reader = BitReader::new(&bytes, bit_len).unwrap();
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.is_empty());
//! ```

use crate::code::Code;
use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - bits of `bit_buffer` below the written ones are zero
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a BitWriter that can hold `bits` bits without reallocating.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }

        Ok(())
    }

    /// Append every bit of a Huffman code, first bit first.
    pub fn write_code(&mut self, code: &Code) {
        for bit in code.iter() {
            self.write_bit(bit);
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// A trailing partial byte is emitted with its low-order bits zeroed.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, stopping at a logical bit length.
///
/// # Invariants
/// - `bit_len <= data.len() * 8`
/// - `bit_position <= bit_len`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Number of meaningful bits in `data`
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_len` bits of `data`.
    ///
    /// # Errors
    /// `BitIoError::InsufficientBits` if `data` is shorter than `bit_len` bits.
    pub fn new(data: &'a [u8], bit_len: usize) -> Result<Self> {
        let available = data.len().saturating_mul(8);
        if bit_len > available {
            return Err(BitIoError::InsufficientBits {
                requested: bit_len,
                available,
            }
            .into());
        }

        Ok(Self {
            data,
            bit_len,
            bit_position: 0,
        })
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once the logical length is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let byte = self.data[self.bit_position / 8];
        let bit = (byte >> (7 - self.bit_position % 8)) & 1 == 1;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read up to 64 bits, MSB-first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        for _ in 0..count {
            result = (result << 1) | self.read_bit()? as u64;
        }
        Ok(result)
    }

    /// Return the number of logical bits not yet read.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check whether every logical bit has been read.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits_remaining();
        (n, Some(n))
    }
}

/// Pack a bit sequence into bytes, MSB-first, zero-padding the tail.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(bits.len());
    for &bit in bits {
        writer.write_bit(bit);
    }
    writer.finish()
}

/// Unpack exactly `bit_len` bits from `bytes`.
pub fn unpack_bits(bytes: &[u8], bit_len: usize) -> Result<Vec<bool>> {
    Ok(BitReader::new(bytes, bit_len)?.collect())
}
