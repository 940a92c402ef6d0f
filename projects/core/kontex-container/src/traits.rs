//! Strategy traits implemented by the encoder and compressor extension crates.
//!
//! The high-level API dispatches over a closed table of these strategies
//! (see `kontex-api`'s `CodecBundle`); strategies never touch a whole
//! container, only individual image planes or level byte streams. This keeps
//! the all-or-nothing commit logic in one place.

use crate::error::StrategyError;
use crate::format::Format;
use crate::params::{CompressionParams, TranscodeFlags};
use crate::scheme::SupercompressionScheme;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

/// Encodes one uncompressed RGBA8 image plane into a target format.
///
/// Implementations must be pure with respect to the container: input in,
/// encoded bytes out. Partial failure handling (and rollback) is the
/// caller's job.
pub trait PlaneEncoder: Send + Sync {
    /// Format this encoder produces.
    fn format(&self) -> Format;

    /// Encode a `width` x `height` plane of tightly packed RGBA8 pixels.
    ///
    /// `pixels.len()` is guaranteed to be `width * height * 4` by the caller.
    /// Returns the encoded plane, whose length must equal
    /// `self.format().plane_byte_length(width, height)`.
    fn encode_plane(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        params: &CompressionParams,
    ) -> Result<Vec<u8>, StrategyError>;
}

/// Generic byte-stream compressor applied to already format-encoded level data.
pub trait Supercompressor: Send + Sync {
    /// Scheme tag this compressor implements.
    fn scheme(&self) -> SupercompressionScheme;

    /// Accepted compression level range (inclusive).
    fn level_range(&self) -> RangeInclusive<i32>;

    /// Compress one level's byte stream at the given level.
    ///
    /// The level has already been validated against [`Self::level_range`].
    fn deflate(&self, data: &[u8], level: i32) -> Result<Vec<u8>, StrategyError>;

    /// Decompress one level's byte stream.
    ///
    /// `uncompressed_len` is the exact expected output size as recorded in
    /// the level index; producing a different size is an error.
    fn inflate(&self, data: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, StrategyError>;
}

/// Converts a universal-format plane into a concrete format at load time.
pub trait Transcoder: Send + Sync {
    /// Intermediate encoding this transcoder reads.
    fn source_format(&self) -> Format;

    /// True if a path to `target` exists.
    fn supports_target(&self, target: Format) -> bool;

    /// Transcode a `width` x `height` plane of source-format data to `target`.
    fn transcode_plane(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        target: Format,
        flags: TranscodeFlags,
    ) -> Result<Vec<u8>, StrategyError>;
}
