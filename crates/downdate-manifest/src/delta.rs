use std::io::{Read, Write};

use anyhow::{Context, Result};

use crate::base::BaseManifest;

/// Marker prefixing a differentially-encoded manifest record.
pub const DELTA_MANIFEST_MARKER: [u8; 4] = *b"DCM\x01";

const DELTA_COMPRESSION_LEVEL: i32 = 3;

pub fn is_delta_manifest(raw: &[u8]) -> bool {
    raw.starts_with(&DELTA_MANIFEST_MARKER)
}

/// Reconstructs the full manifest document from a raw archive record.
///
/// A record carrying the delta marker is a patch: the marker is stripped
/// and the remainder is applied against `base`, using the base document as
/// decoder dictionary. Anything else is already a full document and is
/// returned unchanged, byte-for-byte. A patch that does not apply is fatal
/// for the record, never a silent fallback.
pub fn decode_manifest_buffer(raw: &[u8], base: &BaseManifest) -> Result<Vec<u8>> {
    if !is_delta_manifest(raw) {
        return Ok(raw.to_vec());
    }

    let patch = &raw[DELTA_MANIFEST_MARKER.len()..];
    let dictionary = zstd::dict::DecoderDictionary::copy(base.as_bytes());
    let mut decoder = zstd::stream::Decoder::with_prepared_dictionary(patch, &dictionary)
        .context("manifest-decode-failed: failed preparing the delta decoder")?;

    let mut document = Vec::new();
    decoder
        .read_to_end(&mut document)
        .context("manifest-decode-failed: delta patch does not apply against the base document")?;
    Ok(document)
}

/// Inverse of [`decode_manifest_buffer`]: encodes `document` as a
/// marker-prefixed delta against `base`. Used by archive tooling and test
/// fixtures.
pub fn encode_manifest_delta(document: &[u8], base: &BaseManifest) -> Result<Vec<u8>> {
    let dictionary = zstd::dict::EncoderDictionary::copy(base.as_bytes(), DELTA_COMPRESSION_LEVEL);
    let mut delta = DELTA_MANIFEST_MARKER.to_vec();

    let mut encoder = zstd::stream::Encoder::with_prepared_dictionary(&mut delta, &dictionary)
        .context("failed preparing the delta encoder")?;
    encoder
        .write_all(document)
        .context("failed encoding manifest delta")?;
    encoder.finish().context("failed finalizing manifest delta")?;

    Ok(delta)
}
