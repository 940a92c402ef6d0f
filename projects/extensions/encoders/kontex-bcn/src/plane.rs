//! Whole-plane encode/decode over 4x4 block grids.

use crate::{alpha, bc1};
use alloc::vec;
use alloc::vec::Vec;
use kontex_container::{Format, StrategyError};

/// Extracts one 4x4 RGBA block from a tightly packed plane.
///
/// Pixels outside the plane are clamped to the nearest edge texel, so
/// partial edge blocks do not drag endpoints toward a padding color.
pub fn extract_block(
    pixels: &[u8],
    width: u32,
    height: u32,
    block_x: u32,
    block_y: u32,
) -> [[u8; 4]; 16] {
    let mut block = [[0u8; 4]; 16];
    for y in 0..4u32 {
        for x in 0..4u32 {
            let px = (block_x * 4 + x).min(width - 1);
            let py = (block_y * 4 + y).min(height - 1);
            let offset = ((py * width + px) * 4) as usize;
            block[(y * 4 + x) as usize] =
                [pixels[offset], pixels[offset + 1], pixels[offset + 2], pixels[offset + 3]];
        }
    }
    block
}

/// Encodes a tightly packed RGBA8 plane into the given BCn format.
///
/// # Errors
///
/// `InvalidParameter` when the pixel buffer does not match the dimensions,
/// `Unsupported` when `format` is not a BCn format.
pub fn encode_plane(
    format: Format,
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    perceptual: bool,
) -> Result<Vec<u8>, StrategyError> {
    check_dimensions(width, height)?;
    if pixels.len() != (width as usize) * (height as usize) * 4 {
        return Err(StrategyError::InvalidParameter(
            "pixel buffer does not match the plane dimensions",
        ));
    }
    if !format.is_block_compressed() {
        return Err(StrategyError::Unsupported(
            "plane encoding is only defined for the BCn formats",
        ));
    }

    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let mut output =
        Vec::with_capacity(format.plane_byte_length(width, height));

    for block_y in 0..blocks_high {
        for block_x in 0..blocks_wide {
            let block = extract_block(pixels, width, height, block_x, block_y);
            match format {
                Format::Bc1 => {
                    output.extend_from_slice(&bc1::encode_block(&block, quality, perceptual));
                }
                Format::Bc3 => {
                    output.extend_from_slice(&alpha::encode_block(
                        &channel_values(&block, 3),
                        quality,
                    ));
                    output.extend_from_slice(&bc1::encode_block(&block, quality, perceptual));
                }
                Format::Bc4 => {
                    output.extend_from_slice(&alpha::encode_block(
                        &channel_values(&block, 0),
                        quality,
                    ));
                }
                Format::Bc5 => {
                    output.extend_from_slice(&alpha::encode_block(
                        &channel_values(&block, 0),
                        quality,
                    ));
                    output.extend_from_slice(&alpha::encode_block(
                        &channel_values(&block, 1),
                        quality,
                    ));
                }
                _ => unreachable!("checked above"),
            }
        }
    }

    Ok(output)
}

/// Decodes a BCn plane back into tightly packed RGBA8.
///
/// BC4 decodes to grayscale; BC5 decodes red/green with a zero blue channel.
///
/// # Errors
///
/// `InvalidParameter` when the data length does not match the dimensions,
/// `Unsupported` when `format` is not a BCn format.
pub fn decode_plane(
    format: Format,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, StrategyError> {
    check_dimensions(width, height)?;
    if !format.is_block_compressed() {
        return Err(StrategyError::Unsupported(
            "plane decoding is only defined for the BCn formats",
        ));
    }
    if data.len() != format.plane_byte_length(width, height) {
        return Err(StrategyError::InvalidParameter(
            "encoded data does not match the plane dimensions",
        ));
    }

    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let block_len = format.block_byte_length();
    let mut output = vec![0u8; (width as usize) * (height as usize) * 4];

    for block_y in 0..blocks_high {
        for block_x in 0..blocks_wide {
            let index = (block_y * blocks_wide + block_x) as usize;
            let encoded = &data[index * block_len..(index + 1) * block_len];
            let mut texels = [[0u8; 4]; 16];

            match format {
                Format::Bc1 => {
                    bc1::decode_block(encoded[0..8].try_into().unwrap(), &mut texels);
                }
                Format::Bc3 => {
                    bc1::decode_block(encoded[8..16].try_into().unwrap(), &mut texels);
                    let mut alpha_values = [0u8; 16];
                    alpha::decode_block(encoded[0..8].try_into().unwrap(), &mut alpha_values);
                    for (texel, a) in texels.iter_mut().zip(alpha_values.iter()) {
                        texel[3] = *a;
                    }
                }
                Format::Bc4 => {
                    let mut values = [0u8; 16];
                    alpha::decode_block(encoded[0..8].try_into().unwrap(), &mut values);
                    for (texel, v) in texels.iter_mut().zip(values.iter()) {
                        *texel = [*v, *v, *v, 255];
                    }
                }
                Format::Bc5 => {
                    let mut red = [0u8; 16];
                    let mut green = [0u8; 16];
                    alpha::decode_block(encoded[0..8].try_into().unwrap(), &mut red);
                    alpha::decode_block(encoded[8..16].try_into().unwrap(), &mut green);
                    for ((texel, r), g) in texels.iter_mut().zip(red.iter()).zip(green.iter()) {
                        *texel = [*r, *g, 0, 255];
                    }
                }
                _ => unreachable!("checked above"),
            }

            store_block(&mut output, width, height, block_x, block_y, &texels);
        }
    }

    Ok(output)
}

fn check_dimensions(width: u32, height: u32) -> Result<(), StrategyError> {
    if width == 0 || height == 0 {
        return Err(StrategyError::InvalidParameter("plane dimensions are zero"));
    }
    Ok(())
}

fn channel_values(block: &[[u8; 4]; 16], channel: usize) -> [u8; 16] {
    let mut values = [0u8; 16];
    for (value, texel) in values.iter_mut().zip(block.iter()) {
        *value = texel[channel];
    }
    values
}

fn store_block(
    output: &mut [u8],
    width: u32,
    height: u32,
    block_x: u32,
    block_y: u32,
    texels: &[[u8; 4]; 16],
) {
    for y in 0..4u32 {
        for x in 0..4u32 {
            let px = block_x * 4 + x;
            let py = block_y * 4 + y;
            if px >= width || py >= height {
                continue;
            }
            let offset = ((py * width + px) * 4) as usize;
            output[offset..offset + 4].copy_from_slice(&texels[(y * 4 + x) as usize]);
        }
    }
}
