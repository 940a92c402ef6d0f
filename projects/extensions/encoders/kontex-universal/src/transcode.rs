//! KTEX-U to concrete-format transcoding.

use crate::block::{UniversalBlock, BLOCK_LEN};
use alloc::vec;
use alloc::vec::Vec;
use kontex_bcn::color::{color_distance, color_palette, pack_rgb565, unpack_rgb565};
use kontex_container::{Format, StrategyError, Transcoder, TranscodeFlags};

/// Decodes a KTEX-U plane to tightly packed RGBA8.
pub fn decode_plane(
    data: &[u8],
    width: u32,
    height: u32,
    flags: TranscodeFlags,
) -> Result<Vec<u8>, StrategyError> {
    let blocks = parse_blocks(data, width, height)?;
    let blocks_wide = width.div_ceil(4);
    let mut output = vec![0u8; (width as usize) * (height as usize) * 4];

    for (index, block) in blocks.iter().enumerate() {
        let block_x = index as u32 % blocks_wide;
        let block_y = index as u32 / blocks_wide;
        let palette = color_palette(block.color0, block.color1, true);

        for y in 0..4u32 {
            for x in 0..4u32 {
                let px = block_x * 4 + x;
                let py = block_y * 4 + y;
                if px >= width || py >= height {
                    continue;
                }
                let i = (y * 4 + x) as usize;
                let rgb = palette[block.color_selector(i) as usize];
                let mut texel = [
                    rgb[0],
                    rgb[1],
                    rgb[2],
                    block.alpha_value(i),
                ];
                apply_decode_flags(&mut texel, flags);
                let offset = ((py * width + px) * 4) as usize;
                output[offset..offset + 4].copy_from_slice(&texel);
            }
        }
    }
    Ok(output)
}

/// Transcodes a KTEX-U plane into `target` blocks or pixels.
pub fn transcode_plane(
    data: &[u8],
    width: u32,
    height: u32,
    target: Format,
    flags: TranscodeFlags,
) -> Result<Vec<u8>, StrategyError> {
    match target {
        Format::Rgba8 => decode_plane(data, width, height, flags),
        Format::Bc1 => {
            let blocks = parse_blocks(data, width, height)?;
            let mut output = Vec::with_capacity(blocks.len() * 8);
            for block in &blocks {
                output.extend_from_slice(&transcode_block_bc1(block, flags));
            }
            Ok(output)
        }
        Format::Bc3 => {
            let blocks = parse_blocks(data, width, height)?;
            let mut output = Vec::with_capacity(blocks.len() * 16);
            for block in &blocks {
                output.extend_from_slice(&transcode_block_alpha(block, flags));
                output.extend_from_slice(&transcode_block_bc1(block, flags));
            }
            Ok(output)
        }
        _ => Err(StrategyError::Unsupported(
            "no transcode path to the requested format",
        )),
    }
}

/// Repacks one universal block into a BC1 color block.
///
/// Endpoints are quantized to RGB565. When quantization inverts the
/// endpoint order the pair is swapped and every 2-bit selector is flipped
/// in its low bit (0 <-> 1, 2 <-> 3), preserving BC1's opaque-mode
/// `color0 > color1` requirement. With [`TranscodeFlags::HIGH_QUALITY`]
/// selectors are re-derived against the quantized palette instead of
/// reused.
fn transcode_block_bc1(block: &UniversalBlock, flags: TranscodeFlags) -> [u8; 8] {
    let swizzle = flags.contains(TranscodeFlags::SWIZZLE_BGR);
    let e0 = swizzled(block.color0, swizzle);
    let e1 = swizzled(block.color1, swizzle);

    let mut c0 = pack_rgb565(e0);
    let mut c1 = pack_rgb565(e1);
    let mut selectors = block.color_selectors;

    if c0 < c1 {
        core::mem::swap(&mut c0, &mut c1);
        // Flipping the low bit of every 2-bit lane swaps the endpoint roles.
        selectors ^= 0x5555_5555;
    }
    if c0 == c1 {
        selectors = 0;
    } else if flags.contains(TranscodeFlags::HIGH_QUALITY) {
        selectors = reassign_selectors(block, c0, c1, swizzle);
    }

    let mut out = [0u8; 8];
    out[0..2].copy_from_slice(&c0.to_le_bytes());
    out[2..4].copy_from_slice(&c1.to_le_bytes());
    out[4..8].copy_from_slice(&selectors.to_le_bytes());
    out
}

/// Repacks one universal block's alpha side into a BC3 alpha block.
///
/// The stored `alpha0 >= alpha1` ordering matches BC3's eight-value mode,
/// so selectors transfer unchanged.
fn transcode_block_alpha(block: &UniversalBlock, flags: TranscodeFlags) -> [u8; 8] {
    let mut out = [0u8; 8];
    if flags.contains(TranscodeFlags::OPAQUE_ALPHA) {
        out[0] = 255;
        out[1] = 255;
        return out;
    }
    out[0] = block.alpha0;
    out[1] = block.alpha1;
    out[2..8].copy_from_slice(&block.alpha_selectors);
    out
}

fn reassign_selectors(block: &UniversalBlock, c0: u16, c1: u16, swizzle: bool) -> u32 {
    // Decode through the full-precision palette, then fit against what the
    // BC1 decoder will actually reconstruct.
    let source = color_palette(block.color0, block.color1, true);
    let target = color_palette(unpack_rgb565(c0), unpack_rgb565(c1), true);

    let mut selectors = 0u32;
    for i in 0..16 {
        let rgb = swizzled(source[block.color_selector(i) as usize], swizzle);
        let mut best = 0u32;
        let mut best_dist = u32::MAX;
        for (index, entry) in target.iter().enumerate() {
            let dist = color_distance(rgb, *entry, true);
            if dist < best_dist {
                best_dist = dist;
                best = index as u32;
            }
        }
        selectors |= best << (i * 2);
    }
    selectors
}

fn apply_decode_flags(texel: &mut [u8; 4], flags: TranscodeFlags) {
    if flags.contains(TranscodeFlags::SWIZZLE_BGR) {
        texel.swap(0, 2);
    }
    if flags.contains(TranscodeFlags::OPAQUE_ALPHA) {
        texel[3] = 255;
    }
}

fn swizzled(rgb: [u8; 3], swizzle: bool) -> [u8; 3] {
    if swizzle {
        [rgb[2], rgb[1], rgb[0]]
    } else {
        rgb
    }
}

fn parse_blocks(
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<UniversalBlock>, StrategyError> {
    if width == 0 || height == 0 {
        return Err(StrategyError::InvalidParameter("plane dimensions are zero"));
    }
    let expected = Format::Universal.plane_byte_length(width, height);
    if data.len() != expected {
        return Err(StrategyError::InvalidParameter(
            "encoded data does not match the plane dimensions",
        ));
    }
    Ok(data
        .chunks_exact(BLOCK_LEN)
        .map(|chunk| UniversalBlock::unpack(chunk.try_into().unwrap()))
        .collect())
}

/// [`Transcoder`] strategy for [`Format::Universal`] data.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalTranscoder;

impl Transcoder for UniversalTranscoder {
    fn source_format(&self) -> Format {
        Format::Universal
    }

    fn supports_target(&self, target: Format) -> bool {
        matches!(target, Format::Rgba8 | Format::Bc1 | Format::Bc3)
    }

    fn transcode_plane(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        target: Format,
        flags: TranscodeFlags,
    ) -> Result<Vec<u8>, StrategyError> {
        if !self.supports_target(target) {
            return Err(StrategyError::Unsupported(
                "no transcode path to the requested format",
            ));
        }
        transcode_plane(data, width, height, target, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use kontex_bcn::bc1;
    use kontex_bcn::decode_plane as decode_bcn_plane;

    fn two_tone_plane(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    pixels.extend_from_slice(&[0, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        pixels
    }

    #[test]
    fn decode_inverts_encode_for_exact_blocks() {
        let pixels = two_tone_plane(8, 8);
        let encoded = encode::encode_plane(&pixels, 8, 8, 0).unwrap();
        let decoded = decode_plane(&encoded, 8, 8, TranscodeFlags::NONE).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn transcode_to_bc1_matches_direct_decode() {
        let pixels = two_tone_plane(8, 8);
        let encoded = encode::encode_plane(&pixels, 8, 8, 0).unwrap();
        let bc1_data =
            transcode_plane(&encoded, 8, 8, Format::Bc1, TranscodeFlags::NONE).unwrap();

        assert_eq!(bc1_data.len(), Format::Bc1.plane_byte_length(8, 8));
        let decoded = decode_bcn_plane(Format::Bc1, &bc1_data, 8, 8).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn bc1_repack_swaps_inverted_endpoints() {
        // Hand-built block whose endpoint order inverts under 565 packing.
        let block = UniversalBlock {
            color0: [0, 0, 0],
            color1: [255, 255, 255],
            // Pixels 0..8 use endpoint 0 (black), 8..16 endpoint 1 (white).
            color_selectors: 0x5555_0000,
            alpha0: 255,
            alpha1: 255,
            alpha_selectors: [0; 6],
        };

        let bc1_block = transcode_block_bc1(&block, TranscodeFlags::NONE);
        let c0 = u16::from_le_bytes([bc1_block[0], bc1_block[1]]);
        let c1 = u16::from_le_bytes([bc1_block[2], bc1_block[3]]);
        assert!(c0 > c1, "opaque-mode ordering must hold after repack");

        let mut texels = [[0u8; 4]; 16];
        bc1::decode_block(&bc1_block, &mut texels);
        for texel in texels.iter().take(8) {
            assert_eq!(&texel[0..3], &[0, 0, 0]);
        }
        for texel in texels.iter().skip(8) {
            assert_eq!(&texel[0..3], &[255, 255, 255]);
        }
    }

    #[test]
    fn transcode_to_bc3_carries_alpha() {
        let mut pixels = two_tone_plane(4, 4);
        for texel in pixels.chunks_exact_mut(4) {
            texel[3] = if texel[0] == 0 { 0 } else { 255 };
        }
        let encoded = encode::encode_plane(&pixels, 4, 4, 0).unwrap();
        let bc3_data =
            transcode_plane(&encoded, 4, 4, Format::Bc3, TranscodeFlags::NONE).unwrap();
        let decoded = decode_bcn_plane(Format::Bc3, &bc3_data, 4, 4).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn opaque_alpha_flag_forces_alpha() {
        let mut pixels = two_tone_plane(4, 4);
        for texel in pixels.chunks_exact_mut(4) {
            texel[3] = 17;
        }
        let encoded = encode::encode_plane(&pixels, 4, 4, 0).unwrap();

        let decoded =
            decode_plane(&encoded, 4, 4, TranscodeFlags::OPAQUE_ALPHA).unwrap();
        for texel in decoded.chunks_exact(4) {
            assert_eq!(texel[3], 255);
        }

        let bc3_data =
            transcode_plane(&encoded, 4, 4, Format::Bc3, TranscodeFlags::OPAQUE_ALPHA).unwrap();
        let bc3_decoded = decode_bcn_plane(Format::Bc3, &bc3_data, 4, 4).unwrap();
        for texel in bc3_decoded.chunks_exact(4) {
            assert_eq!(texel[3], 255);
        }
    }

    #[test]
    fn swizzle_flag_swaps_red_and_blue() {
        let mut pixels = Vec::new();
        for _ in 0..16 {
            pixels.extend_from_slice(&[200, 100, 50, 255]);
        }
        let encoded = encode::encode_plane(&pixels, 4, 4, 0).unwrap();
        let decoded = decode_plane(&encoded, 4, 4, TranscodeFlags::SWIZZLE_BGR).unwrap();
        assert_eq!(&decoded[0..4], &[50, 100, 200, 255]);
    }

    #[test]
    fn unsupported_target_is_rejected() {
        let transcoder = UniversalTranscoder;
        assert!(!transcoder.supports_target(Format::Bc4));
        assert!(!transcoder.supports_target(Format::Bc5));
        assert!(!transcoder.supports_target(Format::Universal));

        let encoded = encode::encode_plane(&[0u8; 64], 4, 4, 0).unwrap();
        assert!(matches!(
            transcoder.transcode_plane(&encoded, 4, 4, Format::Bc4, TranscodeFlags::NONE),
            Err(StrategyError::Unsupported(_))
        ));
    }
}
