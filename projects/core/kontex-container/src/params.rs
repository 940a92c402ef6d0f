//! Per-operation parameter bundles.
//!
//! Parameters are immutable, passed per call, and never stored on the
//! container. [`CompressionParams`] is the tagged variant handed to a
//! [`crate::PlaneEncoder`]; each strategy accepts exactly one variant.

use core::ops::BitOr;

/// Parameters for one compression call, tagged by encoder family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionParams {
    /// Block-compression family (BC1/BC3/BC4/BC5).
    Block(BlockCompressParams),
    /// Universal/transcodable family.
    Universal(UniversalCompressParams),
}

/// Parameters for the block-compression encoder family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCompressParams {
    /// Quality/speed trade-off, 0-255. Higher values run more endpoint
    /// refinement iterations.
    pub quality: u8,
    /// Requested block width. The BCn family only supports 4.
    pub block_width: u32,
    /// Requested block height. The BCn family only supports 4.
    pub block_height: u32,
    /// Weight channel error perceptually (green counts most) instead of
    /// uniformly.
    pub perceptual: bool,
}

impl BlockCompressParams {
    /// Preset bundle selected by the single-quality compression overload.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}

impl Default for BlockCompressParams {
    fn default() -> Self {
        Self {
            quality: 128,
            block_width: 4,
            block_height: 4,
            perceptual: true,
        }
    }
}

/// Parameters for the universal/transcodable encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalCompressParams {
    /// Quality/speed trade-off, 0-255. Higher values run more endpoint
    /// refinement iterations at encode time.
    pub quality: u8,
}

impl UniversalCompressParams {
    /// Preset bundle selected by the single-quality compression overload.
    pub fn with_quality(quality: u8) -> Self {
        Self { quality }
    }
}

impl Default for UniversalCompressParams {
    fn default() -> Self {
        Self { quality: 128 }
    }
}

/// Behavior flags for transcode operations.
///
/// Flags combine with `|`; unknown bits are rejected by the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranscodeFlags(u32);

impl TranscodeFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Run an extra endpoint refinement pass while repacking blocks.
    pub const HIGH_QUALITY: Self = Self(1 << 0);
    /// Swap the red and blue channels on decode targets.
    pub const SWIZZLE_BGR: Self = Self(1 << 1);
    /// Force the alpha channel fully opaque in the output.
    pub const OPAQUE_ALPHA: Self = Self(1 << 2);

    const ALL: u32 = 0b111;

    /// Raw bit representation.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Reconstructs flags from raw bits. `None` if unknown bits are set.
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL != 0 {
            return None;
        }
        Some(Self(bits))
    }

    /// True when every bit of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TranscodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
