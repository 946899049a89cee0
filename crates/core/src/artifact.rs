//! Persisted artifact serialization and parsing.
//!
//! An artifact carries everything needed to reconstruct the input:
//! - Header: identifies the format, gives the lengths, includes a CRC
//! - Frequency table: one `(symbol, count)` entry per distinct symbol
//! - Payload: the packed code bits
//!
//! # Format (version 1)
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x50 ("HUFP")
//! +------------------+
//! | version (1)      |  u8, currently 1
//! +------------------+
//! | symbol_count (2) |  u16 number of table entries (0..=256)
//! +------------------+
//! | original_len (8) |  u64 decoded length in bytes
//! +------------------+
//! | bit_len (8)      |  u64 logical number of payload bits
//! +------------------+
//! | payload_len (8)  |  u64 payload length in bytes
//! +------------------+
//! | crc32 (4)        |  u32 checksum
//! +------------------+
//! | table            |  symbol_count * (symbol u8, count u64),
//! | (variable)       |  strictly ascending by symbol
//! +------------------+
//! | payload          |  packed bits, MSB-first, zero padded
//! | (variable)       |
//! +------------------+
//! ```
//!
//! All integers are little-endian.
//!
//! # CRC Coverage
//!
//! The CRC32 covers every header field after the magic except the CRC
//! itself, then the table and the payload.
//!
//! # Validation
//!
//! Parsing never trusts a field it can check: the table must sum to
//! `original_len`, the payload must be exactly `ceil(bit_len / 8)` bytes
//! with zero padding, and `bit_len` must equal the length implied by the
//! code lengths of the tree the table produces.

use std::io::{Read, Write};

use tracing::debug;

use crate::code::CodeTable;
use crate::error::{ArtifactError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Magic number for artifacts: "HUFP"
pub const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x50];

/// Current format version
pub const VERSION: u8 = 1;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 35;

/// Size of one table entry in bytes
const ENTRY_SIZE: usize = 9;

/// A validated compression artifact.
///
/// Construction checks the header and table against each other: payload
/// size against bit length, bit length against the code lengths the table
/// implies, and zero padding. It does not walk the bits, so `decode` can
/// still find a payload that disagrees with `original_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    table: FrequencyTable,
    bit_len: u64,
    payload: Vec<u8>,
}

impl Artifact {
    /// Assemble an artifact, validating that the fields agree.
    ///
    /// # Errors
    /// - `ArtifactError::PayloadLengthMismatch` if `payload` is not `ceil(bit_len / 8)` bytes
    /// - `ArtifactError::BitLengthMismatch` if `bit_len` disagrees with the table
    /// - `ArtifactError::NonZeroPadding` if the unused tail bits are set
    pub fn new(table: FrequencyTable, bit_len: u64, payload: Vec<u8>) -> Result<Self> {
        let payload_len = payload.len() as u64;
        let expected = bit_len.div_ceil(8);
        if payload_len != expected {
            return Err(ArtifactError::PayloadLengthMismatch {
                payload_len,
                bit_len,
                expected,
            }
            .into());
        }

        let implied = implied_bit_len(&table)?;
        if implied != bit_len {
            return Err(ArtifactError::BitLengthMismatch {
                declared: bit_len,
                expected: implied,
            }
            .into());
        }

        let used = (bit_len % 8) as u32;
        if used != 0 {
            let mask = 0xFFu8 >> used;
            if payload.last().is_some_and(|last| last & mask != 0) {
                return Err(ArtifactError::NonZeroPadding.into());
            }
        }

        Ok(Self {
            table,
            bit_len,
            payload,
        })
    }

    /// The artifact for empty input: no table, no bits.
    pub fn empty() -> Self {
        Self {
            table: FrequencyTable::new(),
            bit_len: 0,
            payload: Vec::new(),
        }
    }

    /// Frequency table the decoder rebuilds the tree from.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Logical number of payload bits.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Packed code bits.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Length of the decoded output in bytes.
    pub fn original_len(&self) -> u64 {
        self.table.total()
    }

    /// True for the artifact of empty input.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Size of [`Artifact::to_bytes`] output.
    pub fn serialized_len(&self) -> usize {
        HEADER_SIZE + self.table.len() * ENTRY_SIZE + self.payload.len()
    }

    /// Serialize to the version 1 layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut table_bytes = Vec::with_capacity(self.table.len() * ENTRY_SIZE);
        for (symbol, count) in self.table.iter() {
            table_bytes.push(symbol);
            table_bytes.extend_from_slice(&count.to_le_bytes());
        }

        let fields = HeaderFields {
            version: VERSION,
            symbol_count: self.table.len() as u16,
            original_len: self.original_len(),
            bit_len: self.bit_len,
            payload_len: self.payload.len() as u64,
        };
        let crc32 = compute_crc(&fields, &table_bytes, &self.payload);

        let mut out = Vec::with_capacity(self.serialized_len());
        out.extend_from_slice(&MAGIC);
        fields.write(&mut out);
        out.extend_from_slice(&crc32.to_le_bytes());
        out.extend_from_slice(&table_bytes);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse and validate a serialized artifact.
    ///
    /// # Errors
    /// Any structural problem is reported as an [`ArtifactError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ArtifactError::TooShort {
                required: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into());
        }

        let magic = read_array::<4>(bytes, 0);
        if magic != MAGIC {
            return Err(ArtifactError::InvalidMagic {
                expected: MAGIC,
                actual: magic,
            }
            .into());
        }

        let fields = HeaderFields::parse(bytes);
        if fields.version != VERSION {
            return Err(ArtifactError::UnsupportedVersion(fields.version).into());
        }

        let symbol_count = fields.symbol_count as usize;
        if symbol_count > 256 {
            return Err(ArtifactError::TooManySymbols(symbol_count).into());
        }

        let payload_len = usize::try_from(fields.payload_len)
            .map_err(|_| ArtifactError::LengthOverflow(fields.payload_len))?;
        let table_end = HEADER_SIZE + symbol_count * ENTRY_SIZE;
        let expected_size = table_end
            .checked_add(payload_len)
            .ok_or(ArtifactError::LengthOverflow(fields.payload_len))?;

        if bytes.len() < expected_size {
            return Err(ArtifactError::TooShort {
                required: expected_size,
                actual: bytes.len(),
            }
            .into());
        }
        if bytes.len() > expected_size {
            return Err(ArtifactError::TrailingData {
                expected: expected_size,
                actual: bytes.len(),
            }
            .into());
        }

        let table_bytes = &bytes[HEADER_SIZE..table_end];
        let payload = &bytes[table_end..];

        let crc32 = u32::from_le_bytes(read_array::<4>(bytes, 31));
        let computed = compute_crc(&fields, table_bytes, payload);
        if computed != crc32 {
            return Err(ArtifactError::Crc {
                expected: crc32,
                actual: computed,
            }
            .into());
        }

        let table = parse_table(table_bytes, fields.original_len)?;
        let artifact = Self::new(table, fields.bit_len, payload.to_vec())?;

        debug!(
            symbols = symbol_count,
            original_len = fields.original_len,
            bit_len = fields.bit_len,
            "parsed artifact"
        );
        Ok(artifact)
    }

    /// Write the serialized artifact to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Read `reader` to the end and parse it.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}

/// Header fields covered by the CRC.
#[derive(Debug, Clone, Copy)]
struct HeaderFields {
    version: u8,
    symbol_count: u16,
    original_len: u64,
    bit_len: u64,
    payload_len: u64,
}

impl HeaderFields {
    /// Read bytes 4..31; caller guarantees at least `HEADER_SIZE` bytes.
    fn parse(bytes: &[u8]) -> Self {
        Self {
            version: bytes[4],
            symbol_count: u16::from_le_bytes(read_array::<2>(bytes, 5)),
            original_len: u64::from_le_bytes(read_array::<8>(bytes, 7)),
            bit_len: u64::from_le_bytes(read_array::<8>(bytes, 15)),
            payload_len: u64::from_le_bytes(read_array::<8>(bytes, 23)),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.version);
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        out.extend_from_slice(&self.original_len.to_le_bytes());
        out.extend_from_slice(&self.bit_len.to_le_bytes());
        out.extend_from_slice(&self.payload_len.to_le_bytes());
    }
}

fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

fn parse_table(table_bytes: &[u8], original_len: u64) -> Result<FrequencyTable> {
    let mut entries = Vec::with_capacity(table_bytes.len() / ENTRY_SIZE);
    let mut previous: Option<u8> = None;
    let mut total = 0u64;

    for entry in table_bytes.chunks_exact(ENTRY_SIZE) {
        let symbol = entry[0];
        let count = u64::from_le_bytes(read_array::<8>(entry, 1));

        if previous.is_some_and(|p| symbol <= p) {
            return Err(ArtifactError::UnorderedTable { symbol }.into());
        }
        if count == 0 {
            return Err(ArtifactError::ZeroCount { symbol }.into());
        }

        total = total
            .checked_add(count)
            .ok_or(ArtifactError::TableOverflow)?;
        previous = Some(symbol);
        entries.push((symbol, count));
    }

    if total != original_len {
        return Err(ArtifactError::LengthMismatch {
            table_total: total,
            original_len,
        }
        .into());
    }

    FrequencyTable::from_counts(entries)
}

/// Bits needed to encode the input described by `table`.
fn implied_bit_len(table: &FrequencyTable) -> Result<u64> {
    if table.is_empty() {
        return Ok(0);
    }

    let tree = HuffmanTree::from_frequencies(table)?;
    CodeTable::from_tree(&tree)
        .encoded_bit_len(table)
        .ok_or_else(|| ArtifactError::LengthOverflow(u64::MAX).into())
}

/// Compute CRC32 over the protected fields.
fn compute_crc(fields: &HeaderFields, table_bytes: &[u8], payload: &[u8]) -> u32 {
    let mut header = Vec::with_capacity(HEADER_SIZE - 8);
    fields.write(&mut header);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&header);
    hasher.update(table_bytes);
    hasher.update(payload);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// "aaab": b -> 0, a -> 1, bits 1110
    fn aaab() -> Artifact {
        let table = FrequencyTable::from_bytes(b"aaab");
        Artifact::new(table, 4, vec![0b1110_0000]).unwrap()
    }

    /// Recompute the CRC after tampering with a serialized artifact.
    fn reseal(bytes: &mut [u8]) {
        let fields = HeaderFields::parse(bytes);
        let symbol_count = fields.symbol_count as usize;
        let table_end = HEADER_SIZE + symbol_count * ENTRY_SIZE;
        let crc = compute_crc(&fields, &bytes[HEADER_SIZE..table_end], &bytes[table_end..]);
        bytes[31..35].copy_from_slice(&crc.to_le_bytes());
    }

    fn artifact_error(result: Result<Artifact>) -> ArtifactError {
        match result {
            Err(Error::Artifact(err)) => err,
            other => panic!("expected artifact error, got {other:?}"),
        }
    }

    #[test]
    fn test_layout() {
        let bytes = aaab().to_bytes();

        assert_eq!(bytes.len(), HEADER_SIZE + 2 * ENTRY_SIZE + 1);
        assert_eq!(&bytes[0..4], b"HUFP");
        assert_eq!(bytes[4], VERSION);
        assert_eq!(u16::from_le_bytes([bytes[5], bytes[6]]), 2);
        assert_eq!(u64::from_le_bytes(read_array::<8>(&bytes, 7)), 4);
        assert_eq!(u64::from_le_bytes(read_array::<8>(&bytes, 15)), 4);
        assert_eq!(u64::from_le_bytes(read_array::<8>(&bytes, 23)), 1);

        // First entry: 'a' with count 3
        assert_eq!(bytes[35], b'a');
        assert_eq!(u64::from_le_bytes(read_array::<8>(&bytes, 36)), 3);
        assert_eq!(bytes[44], b'b');
        assert_eq!(*bytes.last().unwrap(), 0b1110_0000);
    }

    #[test]
    fn test_parse_round_trip() {
        let artifact = aaab();
        let parsed = Artifact::from_bytes(&artifact.to_bytes()).unwrap();
        assert_eq!(parsed, artifact);
        assert_eq!(parsed.original_len(), 4);
        assert_eq!(parsed.serialized_len(), artifact.to_bytes().len());
    }

    #[test]
    fn test_empty_artifact() {
        let empty = Artifact::empty();
        let bytes = empty.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let parsed = Artifact::from_bytes(&bytes).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.bit_len(), 0);
        assert!(parsed.payload().is_empty());
    }

    #[test]
    fn test_too_short() {
        let err = artifact_error(Artifact::from_bytes(&[0u8; 10]));
        assert!(matches!(err, ArtifactError::TooShort { required: HEADER_SIZE, actual: 10 }));

        let mut bytes = aaab().to_bytes();
        bytes.pop();
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::TooShort { .. }));
    }

    #[test]
    fn test_trailing_data() {
        let mut bytes = aaab().to_bytes();
        bytes.push(0);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::TrailingData { .. }));
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = aaab().to_bytes();
        bytes[0] = 0xFF;
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::InvalidMagic { .. }));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = aaab().to_bytes();
        bytes[4] = 2;
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = aaab().to_bytes();
        let len = bytes.len();
        bytes[len - 1] ^= 0x80;
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::Crc { .. }));
    }

    #[test]
    fn test_unordered_table() {
        let mut bytes = aaab().to_bytes();
        // Swap symbols so the table reads 'b', 'a'.
        bytes[35] = b'b';
        bytes[44] = b'a';
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::UnorderedTable { symbol: b'a' }));
    }

    #[test]
    fn test_zero_count() {
        let mut bytes = aaab().to_bytes();
        bytes[45..53].copy_from_slice(&0u64.to_le_bytes());
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::ZeroCount { symbol: b'b' }));
    }

    #[test]
    fn test_table_total_mismatch() {
        let mut bytes = aaab().to_bytes();
        bytes[7..15].copy_from_slice(&5u64.to_le_bytes());
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(
            err,
            ArtifactError::LengthMismatch {
                table_total: 4,
                original_len: 5
            }
        ));
    }

    #[test]
    fn test_table_total_overflow() {
        let mut bytes = aaab().to_bytes();
        bytes[7..15].copy_from_slice(&u64::MAX.to_le_bytes());
        bytes[36..44].copy_from_slice(&u64::MAX.to_le_bytes());
        bytes[45..53].copy_from_slice(&1u64.to_le_bytes());
        reseal(&mut bytes);

        let result = Artifact::from_bytes(&bytes);
        assert!(result.as_ref().is_err_and(Error::is_corrupt_artifact));
        assert!(matches!(artifact_error(result), ArtifactError::TableOverflow));
    }

    #[test]
    fn test_bit_length_mismatch() {
        let mut bytes = aaab().to_bytes();
        bytes[15..23].copy_from_slice(&3u64.to_le_bytes());
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(
            err,
            ArtifactError::BitLengthMismatch {
                declared: 3,
                expected: 4
            }
        ));
    }

    #[test]
    fn test_payload_length_mismatch() {
        let table = FrequencyTable::from_bytes(b"aaab");
        let err = artifact_error(Artifact::new(table, 4, vec![0xE0, 0x00]));
        assert!(matches!(err, ArtifactError::PayloadLengthMismatch { expected: 1, .. }));
    }

    #[test]
    fn test_non_zero_padding() {
        let mut bytes = aaab().to_bytes();
        let len = bytes.len();
        bytes[len - 1] = 0b1110_0001;
        reseal(&mut bytes);
        let err = artifact_error(Artifact::from_bytes(&bytes));
        assert!(matches!(err, ArtifactError::NonZeroPadding));
    }

    #[test]
    fn test_empty_table_with_bits_is_corrupt() {
        let err = artifact_error(Artifact::new(FrequencyTable::new(), 8, vec![0]));
        assert!(matches!(err, ArtifactError::BitLengthMismatch { declared: 8, expected: 0 }));
    }

    #[test]
    fn test_read_write_io() {
        let artifact = aaab();
        let mut buf = Vec::new();
        artifact.write_to(&mut buf).unwrap();

        let parsed = Artifact::read_from(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(parsed, artifact);
    }
}
