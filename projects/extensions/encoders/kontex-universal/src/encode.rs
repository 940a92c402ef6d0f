//! RGBA8 to KTEX-U encoding.

use crate::block::{UniversalBlock, BLOCK_LEN};
use alloc::vec::Vec;
use kontex_bcn::bc1::{refine_endpoints, refinement_rounds};
use kontex_bcn::color::{color_bounds, color_distance, color_palette};
use kontex_bcn::{alpha, extract_block};
use kontex_container::{CompressionParams, Format, PlaneEncoder, StrategyError};

/// Encodes a tightly packed RGBA8 plane into KTEX-U blocks.
///
/// `quality` buys endpoint refinement rounds, on the same scale as the BCn
/// encoders. Endpoints are kept at full 888 precision; quantization loss is
/// deferred to transcode time.
pub fn encode_plane(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, StrategyError> {
    if width == 0 || height == 0 {
        return Err(StrategyError::InvalidParameter("plane dimensions are zero"));
    }
    if pixels.len() != (width as usize) * (height as usize) * 4 {
        return Err(StrategyError::InvalidParameter(
            "pixel buffer does not match the plane dimensions",
        ));
    }

    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let mut output = Vec::with_capacity((blocks_wide * blocks_high) as usize * BLOCK_LEN);

    for block_y in 0..blocks_high {
        for block_x in 0..blocks_wide {
            let texels = extract_block(pixels, width, height, block_x, block_y);
            output.extend_from_slice(&encode_block(&texels, quality).pack());
        }
    }
    Ok(output)
}

/// Encodes one 4x4 RGBA block.
pub fn encode_block(texels: &[[u8; 4]; 16], quality: u8) -> UniversalBlock {
    let (min, max) = color_bounds(texels);
    let (color0, color1) =
        refine_endpoints(texels, max, min, refinement_rounds(quality), true);

    let mut color_selectors = 0u32;
    if color0 != color1 {
        let palette = color_palette(color0, color1, true);
        for (i, texel) in texels.iter().enumerate() {
            let rgb = [texel[0], texel[1], texel[2]];
            let mut best = 0u32;
            let mut best_dist = u32::MAX;
            for (index, entry) in palette.iter().enumerate() {
                let dist = color_distance(rgb, *entry, true);
                if dist < best_dist {
                    best_dist = dist;
                    best = index as u32;
                }
            }
            color_selectors |= best << (i * 2);
        }
    }

    // The alpha side reuses the smooth-block encoder wholesale; its output
    // already satisfies the alpha0 >= alpha1 ordering this format requires.
    let mut alpha_values = [0u8; 16];
    for (value, texel) in alpha_values.iter_mut().zip(texels.iter()) {
        *value = texel[3];
    }
    let alpha_block = alpha::encode_block(&alpha_values, quality);

    UniversalBlock {
        color0,
        color1,
        alpha0: alpha_block[0],
        alpha1: alpha_block[1],
        color_selectors,
        alpha_selectors: alpha_block[2..8].try_into().unwrap(),
    }
}

/// [`PlaneEncoder`] strategy producing [`Format::Universal`] data.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalPlaneEncoder;

impl PlaneEncoder for UniversalPlaneEncoder {
    fn format(&self) -> Format {
        Format::Universal
    }

    fn encode_plane(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        params: &CompressionParams,
    ) -> Result<Vec<u8>, StrategyError> {
        let params = match params {
            CompressionParams::Universal(params) => params,
            CompressionParams::Block(_) => {
                return Err(StrategyError::InvalidParameter(
                    "universal compression parameters required",
                ));
            }
        };
        encode_plane(pixels, width, height, params.quality)
    }
}
