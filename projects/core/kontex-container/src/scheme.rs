//! Supercompression scheme tags.

use derive_enum_all_values::AllValues;

/// Byte-stream compression applied to already format-encoded level data.
///
/// Exactly one scheme is active at a time. Switching schemes requires
/// inflating back to the uncompressed state first. The numeric tags are the
/// values written to the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AllValues)]
pub enum SupercompressionScheme {
    /// Level data is stored as-is.
    #[default]
    None,
    /// Zstandard. Fast, levels 1-22; levels above 20 need considerably more memory.
    Zstd,
    /// ZLIB. Slower and lower ratio than Zstandard, levels 1-9.
    Zlib,
}

impl SupercompressionScheme {
    /// Tag value written to the file header.
    pub fn tag(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Zstd => 2,
            Self::Zlib => 3,
        }
    }

    /// Inverse of [`SupercompressionScheme::tag`]. `None` for unknown tags.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            2 => Some(Self::Zstd),
            3 => Some(Self::Zlib),
            _ => None,
        }
    }

    /// Human readable name, matching the CLI argument spelling.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zstd => "zstd",
            Self::Zlib => "zlib",
        }
    }
}
