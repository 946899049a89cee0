//! Compression statistics for reporting.
//!
//! Tracks what a compress or decompress run did:
//! - Raw and artifact sizes, and the ratio between them
//! - Alphabet size, code lengths and the entropy bound
//! - Timing
//!
//! Stats are read-only observations; nothing in the codec consumes them.

use std::time::{Duration, Instant};

use crate::artifact::Artifact;
use crate::code::CodeTable;

/// Statistics for one compress or decompress run.
#[derive(Debug, Clone)]
pub struct Stats {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed length in bytes
    pub raw_bytes: u64,

    /// Serialized artifact length in bytes
    pub artifact_bytes: u64,

    /// Logical payload length in bits
    pub bit_len: u64,

    // === Alphabet ===
    /// Distinct symbols in the input
    pub distinct_symbols: usize,

    /// Shannon entropy of the input in bits per symbol
    pub entropy: f64,

    /// Shortest and longest code lengths in bits
    pub code_len_range: Option<(usize, usize)>,
}

impl Stats {
    /// Create new stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            artifact_bytes: 0,
            bit_len: 0,
            distinct_symbols: 0,
            entropy: 0.0,
            code_len_range: None,
        }
    }

    /// Record sizes and alphabet figures from an artifact.
    pub fn record_artifact(&mut self, artifact: &Artifact) {
        self.raw_bytes = artifact.original_len();
        self.artifact_bytes = artifact.serialized_len() as u64;
        self.bit_len = artifact.bit_len();
        self.distinct_symbols = artifact.table().len();
        self.entropy = artifact.table().entropy();
    }

    /// Record code length range from a code table.
    pub fn record_codes(&mut self, codes: &CodeTable) {
        let min = codes.iter().map(|(_, code)| code.len()).min();
        let max = codes.iter().map(|(_, code)| code.len()).max();
        self.code_len_range = min.zip(max);
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (artifact / raw).
    ///
    /// Returns 0.0 if no data was compressed.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.artifact_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average code length actually spent per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.bit_len as f64 / self.raw_bytes as f64
        }
    }

    /// Compute throughput in raw bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("Raw:      {} bytes ({:.2} MiB)", self.raw_bytes, mib(self.raw_bytes));
        println!("Artifact: {} bytes ({:.2} MiB)", self.artifact_bytes, mib(self.artifact_bytes));
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Coding ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Payload bits: {}", self.bit_len);
        println!(
            "Bits per symbol: {:.3} (entropy bound {:.3})",
            self.bits_per_symbol(),
            self.entropy
        );
        if let Some((min, max)) = self.code_len_range {
            println!("Code lengths: {}..={} bits", min, max);
        }
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             artifact_bytes={}\n\
             bit_len={}\n\
             distinct_symbols={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n\
             entropy={:.4}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.artifact_bytes,
            self.bit_len,
            self.distinct_symbols,
            self.compression_ratio(),
            self.bits_per_symbol(),
            self.entropy,
        )
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
