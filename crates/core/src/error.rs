//! Error types for the huffpack codec.
//!
//! All operations return structured errors rather than panicking.
//! The codec performs no user-facing reporting; callers translate these
//! into messages.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading bits from a packed buffer
/// - Huffman: tree construction failures
/// - Artifact: malformed or inconsistent persisted data (a corrupt artifact)
/// - Truncated code: the bit stream stopped partway through a code
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past the logical bit length)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman tree construction error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Persisted artifact is malformed, truncated or inconsistent
    #[error("corrupt artifact: {0}")]
    Artifact(#[from] ArtifactError),

    /// The bit stream ended while the decoder was between the root and a leaf
    #[error("truncated code: bit stream ended mid-code at bit {position} after {decoded} symbols")]
    TruncatedCode { position: usize, decoded: usize },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure came from malformed or inconsistent persisted data.
    pub fn is_corrupt_artifact(&self) -> bool {
        matches!(self, Error::Artifact(_))
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the logical end of the bit stream
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// The byte buffer cannot hold the requested logical bit length
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman tree construction errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// A symbol was listed twice while assembling a frequency table
    #[error("duplicate symbol {symbol:#04x} in frequency table")]
    DuplicateSymbol { symbol: u8 },

    /// A listed symbol has a zero count
    #[error("symbol {symbol:#04x} has zero frequency")]
    ZeroFrequency { symbol: u8 },

    /// Summed frequencies do not fit in 64 bits
    #[error("frequency total overflows u64")]
    FrequencyOverflow,

    /// Input byte with no code in the code table
    #[error("symbol {symbol:#04x} has no code")]
    UnknownSymbol { symbol: u8 },
}

/// Persisted artifact errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Format version this build does not understand
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    /// Artifact is too short to contain a valid header
    #[error("artifact too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Bytes left over after the declared payload
    #[error("trailing data: expected {expected} bytes, got {actual}")]
    TrailingData { expected: usize, actual: usize },

    /// More table entries than there are byte values
    #[error("symbol count {0} exceeds 256")]
    TooManySymbols(usize),

    /// Table entries are not strictly ascending by symbol
    #[error("table entry {symbol:#04x} is out of order or duplicated")]
    UnorderedTable { symbol: u8 },

    /// Table entry with a zero count
    #[error("table entry {symbol:#04x} has zero count")]
    ZeroCount { symbol: u8 },

    /// Table counts do not add up to the declared original length
    #[error("table total {table_total} does not match original length {original_len}")]
    LengthMismatch { table_total: u64, original_len: u64 },

    /// Table counts sum past `u64::MAX`
    #[error("table counts overflow u64")]
    TableOverflow,

    /// Payload byte length does not match the declared bit length
    #[error("payload is {payload_len} bytes but bit length {bit_len} needs {expected}")]
    PayloadLengthMismatch {
        payload_len: u64,
        bit_len: u64,
        expected: u64,
    },

    /// Declared bit length disagrees with the code lengths implied by the table
    #[error("bit length {declared} does not match the {expected} bits implied by the table")]
    BitLengthMismatch { declared: u64, expected: u64 },

    /// Padding bits in the final payload byte are not zero
    #[error("non-zero padding bits in final payload byte")]
    NonZeroPadding,

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// A bit that leads nowhere in the rebuilt tree (only `0` is valid for a one-symbol tree)
    #[error("invalid code at bit position {position}")]
    InvalidCode { position: usize },

    /// The payload decodes to a different number of bytes than the header declares
    #[error("payload decodes to {actual} bytes, header declares {expected}")]
    DecodedLengthMismatch { expected: usize, actual: usize },

    /// A length field does not fit in this platform's address space
    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_errors_are_corrupt() {
        let err: Error = ArtifactError::NonZeroPadding.into();
        assert!(err.is_corrupt_artifact());

        let err = Error::TruncatedCode {
            position: 3,
            decoded: 1,
        };
        assert!(!err.is_corrupt_artifact());
    }

    #[test]
    fn test_messages_carry_details() {
        let err: Error = ArtifactError::Crc {
            expected: 0xdeadbeef,
            actual: 0x1,
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("0xdeadbeef"));
        assert!(msg.starts_with("corrupt artifact"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.bin");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("missing.bin"));
        assert!(err.source().is_some());
    }
}
