//! BC1 (DXT1) color block encoding and decoding.
//!
//! A block packs 16 pixels into 8 bytes: two RGB565 endpoints followed by a
//! u32 of 2-bit palette selectors. Opaque (four-color) mode requires
//! `color0 > color1`; the encoder always emits opaque mode, the decoder
//! understands both.

use crate::color::{color_bounds, color_distance, color_palette, pack_rgb565, unpack_rgb565};

/// Weight of endpoint 1 (in thirds) for each selector value.
const SELECTOR_WEIGHT: [u32; 4] = [0, 3, 1, 2];

/// Compresses a 4x4 RGBA block (row-major) to one BC1 block.
///
/// Endpoints start from the color bounding box; `quality` buys up to three
/// least-squares refinement rounds (one per 64 quality steps). Alpha is
/// ignored.
pub fn encode_block(pixels: &[[u8; 4]; 16], quality: u8, perceptual: bool) -> [u8; 8] {
    let (min, max) = color_bounds(pixels);
    let (e0, e1) = refine_endpoints(pixels, max, min, refinement_rounds(quality), perceptual);

    let mut c0 = pack_rgb565(e0);
    let mut c1 = pack_rgb565(e1);
    if c0 < c1 {
        core::mem::swap(&mut c0, &mut c1);
    }

    let selectors = if c0 == c1 {
        // Degenerate block: a single color, every pixel maps to endpoint 0.
        0u32
    } else {
        assign_selectors(pixels, c0, c1, perceptual)
    };

    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&c0.to_le_bytes());
    block[2..4].copy_from_slice(&c1.to_le_bytes());
    block[4..8].copy_from_slice(&selectors.to_le_bytes());
    block
}

/// Decompresses one BC1 block into 16 RGBA pixels.
///
/// `color0 <= color1` selects the three-color mode, whose fourth palette
/// entry is transparent black.
pub fn decode_block(block: &[u8; 8], out: &mut [[u8; 4]; 16]) {
    let c0 = u16::from_le_bytes([block[0], block[1]]);
    let c1 = u16::from_le_bytes([block[2], block[3]]);
    let selectors = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);

    let four_color = c0 > c1;
    let palette = color_palette(unpack_rgb565(c0), unpack_rgb565(c1), four_color);

    for (i, pixel) in out.iter_mut().enumerate() {
        let index = ((selectors >> (i * 2)) & 0x3) as usize;
        let rgb = palette[index];
        let alpha = if !four_color && index == 3 { 0 } else { 255 };
        *pixel = [rgb[0], rgb[1], rgb[2], alpha];
    }
}

/// Number of endpoint refinement rounds bought by a quality value.
pub fn refinement_rounds(quality: u8) -> u32 {
    quality as u32 / 64
}

/// Least-squares endpoint refinement.
///
/// Each round assigns every pixel its best palette entry for the current
/// endpoints, then solves the two-endpoint least-squares system implied by
/// the fixed interpolation weights. This is the classic cluster-fit step:
/// endpoints may move outside the color bounding box to pull interpolated
/// entries onto the data. Also used by the universal encoder, which shares
/// the BC1 palette semantics.
pub fn refine_endpoints(
    pixels: &[[u8; 4]; 16],
    mut e0: [u8; 3],
    mut e1: [u8; 3],
    rounds: u32,
    perceptual: bool,
) -> ([u8; 3], [u8; 3]) {
    for _ in 0..rounds {
        if e0 == e1 {
            break;
        }
        let palette = color_palette(e0, e1, true);

        // Normal equations accumulated over all pixels; weights are thirds.
        let mut a = 0f32; // sum of u^2
        let mut b = 0f32; // sum of u*v
        let mut c = 0f32; // sum of v^2
        let mut d = [0f32; 3]; // sum of u*p per channel
        let mut e = [0f32; 3]; // sum of v*p per channel

        for pixel in pixels {
            let rgb = [pixel[0], pixel[1], pixel[2]];
            let mut best = 0usize;
            let mut best_dist = u32::MAX;
            for (index, entry) in palette.iter().enumerate() {
                let dist = color_distance(rgb, *entry, perceptual);
                if dist < best_dist {
                    best_dist = dist;
                    best = index;
                }
            }
            let v = SELECTOR_WEIGHT[best] as f32 / 3.0;
            let u = 1.0 - v;
            a += u * u;
            b += u * v;
            c += v * v;
            for channel in 0..3 {
                d[channel] += u * rgb[channel] as f32;
                e[channel] += v * rgb[channel] as f32;
            }
        }

        let det = a * c - b * b;
        if det > -1e-4 && det < 1e-4 {
            break;
        }
        for channel in 0..3 {
            let v0 = (c * d[channel] - b * e[channel]) / det;
            let v1 = (a * e[channel] - b * d[channel]) / det;
            e0[channel] = v0.clamp(0.0, 255.0) as u8;
            e1[channel] = v1.clamp(0.0, 255.0) as u8;
        }
    }
    (e0, e1)
}

fn assign_selectors(pixels: &[[u8; 4]; 16], c0: u16, c1: u16, perceptual: bool) -> u32 {
    // Selector choice uses the quantized endpoints the decoder will see.
    let palette = color_palette(unpack_rgb565(c0), unpack_rgb565(c1), true);

    let mut selectors = 0u32;
    for (i, pixel) in pixels.iter().enumerate() {
        let rgb = [pixel[0], pixel[1], pixel[2]];
        let mut best_index = 0u32;
        let mut best_dist = u32::MAX;
        for (index, entry) in palette.iter().enumerate() {
            let dist = color_distance(rgb, *entry, perceptual);
            if dist < best_dist {
                best_dist = dist;
                best_index = index as u32;
            }
        }
        selectors |= best_index << (i * 2);
    }
    selectors
}
