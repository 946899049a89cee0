//! Sample input generation.
//!
//! Produces seeded data whose sections compress very differently, so the
//! code table and stats have something interesting to show:
//! - runs of a single byte (one very frequent symbol)
//! - text drawn from a small alphabet
//! - a skewed distribution where low byte values dominate
//! - uniformly random bytes (incompressible)

use std::io::Write;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SECTION_BYTES: usize = 4096;

/// Generate `size_bytes` of sample data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = SECTION_BYTES.min(size_bytes - data.len());

        match rng.gen_range(0..10u8) {
            0..=1 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }
            2..=4 => {
                let alphabet = b"etaoinshrdlu cmfwypvbgkqjxz.,\n";
                data.extend((0..section).map(|_| alphabet[rng.gen_range(0..alphabet.len())]));
            }
            5..=7 => {
                // Minimum of two draws halves the chance of each higher value.
                data.extend((0..section).map(|_| rng.gen::<u8>().min(rng.gen::<u8>()) / 8));
            }
            _ => {
                data.extend((0..section).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}

/// Write generated data to `path`.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}
