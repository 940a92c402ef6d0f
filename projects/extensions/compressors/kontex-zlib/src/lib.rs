//! ZLIB supercompression scheme for kontex.
//!
//! Implements [`Supercompressor`] over `flate2`. Slower and with a lower
//! ratio than the Zstandard scheme, but universally available. Level data
//! is compressed per level, so levels stay independently addressable
//! through the level index.

#![warn(missing_docs)]

use core::ops::RangeInclusive;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use kontex_container::{StrategyError, Supercompressor, SupercompressionScheme};
use std::io::{Read, Write};

/// Accepted compression level range.
pub const LEVEL_RANGE: RangeInclusive<i32> = 1..=9;

/// [`Supercompressor`] implementation for [`SupercompressionScheme::Zlib`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibSupercompressor;

impl Supercompressor for ZlibSupercompressor {
    fn scheme(&self) -> SupercompressionScheme {
        SupercompressionScheme::Zlib
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        LEVEL_RANGE
    }

    fn deflate(&self, data: &[u8], level: i32) -> Result<Vec<u8>, StrategyError> {
        compress(data, level)
    }

    fn inflate(&self, data: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, StrategyError> {
        decompress(data, uncompressed_len)
    }
}

/// Compresses `source` into a zlib stream at the given level.
pub fn compress(source: &[u8], level: i32) -> Result<Vec<u8>, StrategyError> {
    if !LEVEL_RANGE.contains(&level) {
        return Err(StrategyError::InvalidParameter(
            "zlib level must be between 1 and 9",
        ));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level as u32));
    encoder
        .write_all(source)
        .and_then(|_| encoder.finish())
        .map_err(|e| StrategyError::Internal(format!("zlib compression failed: {e}")))
}

/// Decompresses a zlib stream into exactly `uncompressed_len` bytes.
pub fn decompress(source: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, StrategyError> {
    let mut destination = Vec::with_capacity(uncompressed_len);
    let mut decoder = ZlibDecoder::new(source);
    decoder
        .read_to_end(&mut destination)
        .map_err(|e| StrategyError::Internal(format!("zlib decompression failed: {e}")))?;

    if destination.len() != uncompressed_len {
        return Err(StrategyError::Internal(format!(
            "zlib stream inflated to {} bytes, expected {uncompressed_len}",
            destination.len()
        )));
    }
    Ok(destination)
}
