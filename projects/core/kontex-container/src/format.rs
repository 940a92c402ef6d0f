//! Pixel and block format tags, plus the size math derived from them.

use derive_enum_all_values::AllValues;

/// Encoding format of the data stored in a container.
///
/// This is a closed set: dispatch over encoder strategies happens by
/// matching on this tag, not by open-ended subclassing. `Universal` is the
/// transcodable intermediate encoding; it is not directly GPU-consumable
/// and carries a vkFormat-equivalent value of zero in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u8)]
pub enum Format {
    /// Uncompressed 8-bit RGBA, the only valid source for the encoders.
    Rgba8 = 0,
    /// BC1 (DXT1): 4x4 blocks, 8 bytes, RGB with no alpha.
    Bc1 = 1,
    /// BC3 (DXT5): 4x4 blocks, 16 bytes, RGBA.
    Bc3 = 2,
    /// BC4: 4x4 blocks, 8 bytes, single channel (red).
    Bc4 = 3,
    /// BC5: 4x4 blocks, 16 bytes, two channels (red, green).
    Bc5 = 4,
    /// Universal transcodable intermediate encoding (KTEX-U).
    Universal = 5,
}

/// Transfer function of the encoded channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AllValues)]
#[repr(u8)]
pub enum TransferFunction {
    /// Linear encoding curve.
    Linear = 1,
    /// Non-linear sRGB encoding curve.
    Srgb = 2,
}

/// Semantic of one channel of a decoded texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSemantic {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
    /// Alpha channel.
    Alpha,
}

use ChannelSemantic::{Alpha, Blue, Green, Red};

impl Format {
    /// Stable numeric code used in the serialized format descriptor block.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of [`Format::code`]. `None` for unknown codes.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Rgba8),
            1 => Some(Self::Bc1),
            2 => Some(Self::Bc3),
            3 => Some(Self::Bc4),
            4 => Some(Self::Bc5),
            5 => Some(Self::Universal),
            _ => None,
        }
    }

    /// Human readable name, matching the CLI argument spelling.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rgba8 => "rgba8",
            Self::Bc1 => "bc1",
            Self::Bc3 => "bc3",
            Self::Bc4 => "bc4",
            Self::Bc5 => "bc5",
            Self::Universal => "universal",
        }
    }

    /// True for the concrete GPU-consumable block formats.
    pub fn is_block_compressed(self) -> bool {
        matches!(self, Self::Bc1 | Self::Bc3 | Self::Bc4 | Self::Bc5)
    }

    /// True for the transcodable intermediate encoding.
    pub fn is_universal(self) -> bool {
        self == Self::Universal
    }

    /// True for raw pixel data that encoders accept as source material.
    pub fn is_uncompressed(self) -> bool {
        self == Self::Rgba8
    }

    /// Texel block footprint of this format.
    ///
    /// `Rgba8` is addressed per pixel; every encoded format uses 4x4 blocks.
    pub fn block_dimensions(self) -> (u32, u32) {
        match self {
            Self::Rgba8 => (1, 1),
            _ => (4, 4),
        }
    }

    /// Bytes per texel block (per pixel for `Rgba8`).
    pub fn block_byte_length(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Bc1 | Self::Bc4 => 8,
            Self::Bc3 | Self::Bc5 => 16,
            Self::Universal => 18,
        }
    }

    /// Byte length of a single image plane of `width` x `height` texels.
    ///
    /// Block dimensions are rounded up, so partial edge blocks are counted
    /// in full.
    pub fn plane_byte_length(self, width: u32, height: u32) -> usize {
        let (bw, bh) = self.block_dimensions();
        let blocks_wide = width.div_ceil(bw) as usize;
        let blocks_high = height.div_ceil(bh) as usize;
        blocks_wide * blocks_high * self.block_byte_length()
    }

    /// vkFormat-equivalent value written to the file header.
    ///
    /// Universal data has no Vulkan equivalent and is stored as zero; the
    /// format descriptor block identifies the encoding instead. BC4/BC5
    /// have no sRGB variants, so the transfer function does not affect them.
    pub fn vk_format(self, transfer: TransferFunction) -> u32 {
        let srgb = transfer == TransferFunction::Srgb;
        match self {
            Self::Rgba8 => {
                if srgb {
                    VK_FORMAT_R8G8B8A8_SRGB
                } else {
                    VK_FORMAT_R8G8B8A8_UNORM
                }
            }
            Self::Bc1 => {
                if srgb {
                    VK_FORMAT_BC1_RGB_SRGB_BLOCK
                } else {
                    VK_FORMAT_BC1_RGB_UNORM_BLOCK
                }
            }
            Self::Bc3 => {
                if srgb {
                    VK_FORMAT_BC3_SRGB_BLOCK
                } else {
                    VK_FORMAT_BC3_UNORM_BLOCK
                }
            }
            Self::Bc4 => VK_FORMAT_BC4_UNORM_BLOCK,
            Self::Bc5 => VK_FORMAT_BC5_UNORM_BLOCK,
            Self::Universal => 0,
        }
    }

    /// Channel semantics of a decoded texel of this format.
    pub fn channels(self) -> &'static [ChannelSemantic] {
        match self {
            Self::Rgba8 | Self::Bc3 | Self::Universal => &[Red, Green, Blue, Alpha],
            Self::Bc1 => &[Red, Green, Blue],
            Self::Bc4 => &[Red],
            Self::Bc5 => &[Red, Green],
        }
    }
}

// `ContainerError::UnsupportedTargetFormat` names a `Format` field `source`,
// which thiserror's `#[derive(Error)]` treats as the error source and therefore
// requires `Format: Error`. Display mirrors Debug so no new formatting behavior
// is introduced.
impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl core::error::Error for Format {}

impl TransferFunction {
    /// Stable numeric code used in the serialized format descriptor block.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Inverse of [`TransferFunction::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Linear),
            2 => Some(Self::Srgb),
            _ => None,
        }
    }
}

// Vulkan format values, kept bit-exact for header compatibility.
const VK_FORMAT_R8G8B8A8_UNORM: u32 = 37;
const VK_FORMAT_R8G8B8A8_SRGB: u32 = 43;
const VK_FORMAT_BC1_RGB_UNORM_BLOCK: u32 = 131;
const VK_FORMAT_BC1_RGB_SRGB_BLOCK: u32 = 132;
const VK_FORMAT_BC3_UNORM_BLOCK: u32 = 137;
const VK_FORMAT_BC3_SRGB_BLOCK: u32 = 138;
const VK_FORMAT_BC4_UNORM_BLOCK: u32 = 139;
const VK_FORMAT_BC5_UNORM_BLOCK: u32 = 141;

/// Extent of one dimension at the given mip level, clamped to 1.
pub fn level_extent(base: u32, level: u32) -> u32 {
    if level >= 32 {
        return 1;
    }
    (base >> level).max(1)
}

/// Largest valid mip level count for the given base dimensions.
pub fn max_level_count(width: u32, height: u32) -> u32 {
    let longest = width.max(height).max(1);
    u32::BITS - longest.leading_zeros()
}
