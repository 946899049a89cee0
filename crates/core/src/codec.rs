//! Encode/decode orchestration.
//!
//! Encoding counts the whole input, builds the tree and code table, and
//! packs every byte's code in order. Decoding rebuilds the tree from the
//! artifact's frequency table alone and walks the packed bits through it.
//!
//! Each call owns its own table, tree and buffers; nothing is shared
//! between calls.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::bitio::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{ArtifactError, Error, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// The result of encoding: the artifact plus display-only views.
///
/// `tree` and `codes` are for inspection. Decoding never reads them.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Persistable artifact
    pub artifact: Artifact,

    /// Tree used for encoding (`None` for empty input)
    pub tree: Option<HuffmanTree>,

    /// Code assigned to each symbol (empty for empty input)
    pub codes: CodeTable,
}

/// Encode `data` into an artifact.
///
/// Empty input produces the empty artifact.
pub fn encode(data: &[u8]) -> Result<Encoded> {
    encode_sources([data])
}

/// Encode several sources as one input, concatenated in order.
pub fn encode_sources<I, S>(sources: I) -> Result<Encoded>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<[u8]>,
{
    let table = FrequencyTable::from_sources(sources.clone());
    if table.is_empty() {
        debug!("empty input, emitting empty artifact");
        return Ok(Encoded {
            artifact: Artifact::empty(),
            tree: None,
            codes: CodeTable::default(),
        });
    }

    let tree = HuffmanTree::from_frequencies(&table)?;
    let codes = CodeTable::from_tree(&tree);

    let capacity = codes
        .encoded_bit_len(&table)
        .and_then(|bits| usize::try_from(bits).ok())
        .unwrap_or(0);
    let mut writer = BitWriter::with_capacity(capacity);

    for source in sources {
        for &byte in source.as_ref() {
            let code = codes
                .get(byte)
                .ok_or(HuffmanError::UnknownSymbol { symbol: byte })?;
            writer.write_code(code);
        }
    }

    let bit_len = writer.bit_len() as u64;
    let payload = writer.finish();
    debug!(
        symbols = table.len(),
        input_bytes = table.total(),
        bit_len,
        payload_bytes = payload.len(),
        "encoded input"
    );

    let artifact = Artifact::new(table, bit_len, payload)?;
    Ok(Encoded {
        artifact,
        tree: Some(tree),
        codes,
    })
}

/// Decode an artifact back into the original bytes.
///
/// The tree is rebuilt from the artifact's frequency table.
///
/// # Errors
/// - `Error::TruncatedCode` if the bits end partway through a code
/// - `ArtifactError::InvalidCode` if a bit leads outside the tree
/// - `ArtifactError::DecodedLengthMismatch` if the output length differs from the table total
pub fn decode(artifact: &Artifact) -> Result<Vec<u8>> {
    if artifact.is_empty() {
        return Ok(Vec::new());
    }

    let tree = HuffmanTree::from_frequencies(artifact.table())?;
    let bit_len = to_usize(artifact.bit_len())?;
    let expected = to_usize(artifact.original_len())?;

    let output = decode_bits(&tree, artifact.payload(), bit_len)?;
    if output.len() != expected {
        return Err(ArtifactError::DecodedLengthMismatch {
            expected,
            actual: output.len(),
        }
        .into());
    }

    Ok(output)
}

/// Walk the first `bit_len` bits of `payload` through `tree`.
///
/// `0` descends left and `1` descends right; each leaf emits its symbol
/// and resets to the root. When the root is itself a leaf every `0` bit
/// emits that symbol.
pub fn decode_bits(tree: &HuffmanTree, payload: &[u8], bit_len: usize) -> Result<Vec<u8>> {
    let reader = BitReader::new(payload, bit_len)?;
    let root = tree.root();
    let mut node = root;
    let mut output = Vec::new();

    for (position, bit) in reader.enumerate() {
        node = match tree.node(node) {
            Node::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    *left
                }
            }
            Node::Leaf { .. } if !bit => node,
            Node::Leaf { .. } => return Err(ArtifactError::InvalidCode { position }.into()),
        };

        if let Node::Leaf { symbol, .. } = tree.node(node) {
            output.push(*symbol);
            node = root;
        }
    }

    if node != root {
        return Err(Error::TruncatedCode {
            position: bit_len,
            decoded: output.len(),
        });
    }

    Ok(output)
}

/// Read every source file in full and concatenate them in order.
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    for path in paths {
        let bytes = fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bytes = bytes.len(), "read source");
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

/// Compress the concatenation of `sources` into an artifact file at `dest`.
pub fn compress_files<P, Q>(sources: &[P], dest: Q) -> Result<Encoded>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let data = read_sources(sources)?;
    let encoded = encode(&data)?;

    let file = File::create(dest.as_ref())?;
    encoded.artifact.write_to(BufWriter::new(file))?;

    info!(
        sources = sources.len(),
        input_bytes = data.len(),
        artifact_bytes = encoded.artifact.serialized_len(),
        dest = %dest.as_ref().display(),
        "compressed"
    );
    Ok(encoded)
}

/// Decompress the artifact file at `src` into `dest`.
///
/// Returns the parsed artifact. Nothing is written when decoding fails.
pub fn decompress_file<P, Q>(src: P, dest: Q) -> Result<Artifact>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let file = File::open(src.as_ref())?;
    let artifact = Artifact::read_from(BufReader::new(file))?;
    let output = decode(&artifact)?;

    fs::write(dest.as_ref(), &output)?;

    info!(
        artifact_bytes = artifact.serialized_len(),
        output_bytes = output.len(),
        dest = %dest.as_ref().display(),
        "decompressed"
    );
    Ok(artifact)
}

fn to_usize(len: u64) -> Result<usize> {
    usize::try_from(len).map_err(|_| ArtifactError::LengthOverflow(len).into())
}
