//! Color packing and distance helpers shared by the block encoders.

/// Packs an RGB888 color into RGB565.
pub fn pack_rgb565(rgb: [u8; 3]) -> u16 {
    let r = (rgb[0] >> 3) as u16;
    let g = (rgb[1] >> 2) as u16;
    let b = (rgb[2] >> 3) as u16;
    (r << 11) | (g << 5) | b
}

/// Unpacks RGB565 into RGB888, replicating high bits into the low bits so
/// full white stays full white.
pub fn unpack_rgb565(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Squared RGB distance between a pixel and a palette color.
///
/// With `perceptual` set, channel differences are weighted 3/6/1 to
/// approximate the eye's sensitivity; otherwise channels count equally.
pub fn color_distance(pixel: [u8; 3], palette: [u8; 3], perceptual: bool) -> u32 {
    let dr = pixel[0] as i32 - palette[0] as i32;
    let dg = pixel[1] as i32 - palette[1] as i32;
    let db = pixel[2] as i32 - palette[2] as i32;
    if perceptual {
        (dr * dr * 9 + dg * dg * 36 + db * db) as u32
    } else {
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// The four-entry BC1 palette for an endpoint pair, in selector order.
///
/// `four_color` selects the opaque mode (two interpolants at 1/3 and 2/3);
/// otherwise the three-color mode is built (midpoint plus a transparent
/// fourth entry, which callers must special-case for alpha).
pub fn color_palette(e0: [u8; 3], e1: [u8; 3], four_color: bool) -> [[u8; 3]; 4] {
    if four_color {
        [e0, e1, mix(e0, e1, 2, 1), mix(e0, e1, 1, 2)]
    } else {
        [e0, e1, mix(e0, e1, 1, 1), [0, 0, 0]]
    }
}

/// Minimum and maximum RGB corners of a block's color bounding box.
pub fn color_bounds(pixels: &[[u8; 4]; 16]) -> ([u8; 3], [u8; 3]) {
    let mut min = [255u8; 3];
    let mut max = [0u8; 3];
    for pixel in pixels {
        for channel in 0..3 {
            min[channel] = min[channel].min(pixel[channel]);
            max[channel] = max[channel].max(pixel[channel]);
        }
    }
    (min, max)
}

fn mix(a: [u8; 3], b: [u8; 3], wa: u16, wb: u16) -> [u8; 3] {
    let den = wa + wb;
    let mut out = [0u8; 3];
    for channel in 0..3 {
        out[channel] =
            ((a[channel] as u16 * wa + b[channel] as u16 * wb + den / 2) / den) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([0, 0, 0], 0x0000)]
    #[case([255, 255, 255], 0xFFFF)]
    #[case([255, 0, 0], 0xF800)]
    #[case([0, 255, 0], 0x07E0)]
    #[case([0, 0, 255], 0x001F)]
    fn pack_primary_colors(#[case] rgb: [u8; 3], #[case] expected: u16) {
        assert_eq!(pack_rgb565(rgb), expected);
        assert_eq!(unpack_rgb565(expected), rgb);
    }

    #[test]
    fn unpack_replicates_bits_within_tolerance() {
        let rgb = [123, 234, 56];
        let restored = unpack_rgb565(pack_rgb565(rgb));
        assert!((rgb[0] as i16 - restored[0] as i16).abs() <= 4);
        assert!((rgb[1] as i16 - restored[1] as i16).abs() <= 2);
        assert!((rgb[2] as i16 - restored[2] as i16).abs() <= 4);
    }

    #[test]
    fn perceptual_distance_weights_green_highest() {
        let black = [0, 0, 0];
        let green_dist = color_distance(black, [0, 100, 0], true);
        let blue_dist = color_distance(black, [0, 0, 100], true);
        assert!(green_dist > blue_dist);

        // Uniform weighting treats them equally.
        let green_uniform = color_distance(black, [0, 100, 0], false);
        let blue_uniform = color_distance(black, [0, 0, 100], false);
        assert_eq!(green_uniform, blue_uniform);
    }

    #[test]
    fn four_color_palette_interpolates_thirds() {
        let palette = color_palette([255, 255, 255], [0, 0, 0], true);
        assert_eq!(palette[0], [255, 255, 255]);
        assert_eq!(palette[1], [0, 0, 0]);
        assert!((palette[2][0] as i16 - 170).abs() <= 1);
        assert!((palette[3][0] as i16 - 85).abs() <= 1);
    }

    #[test]
    fn bounds_span_the_block() {
        let mut pixels = [[10u8, 20, 30, 255]; 16];
        pixels[3] = [200, 5, 90, 255];
        let (min, max) = color_bounds(&pixels);
        assert_eq!(min, [10, 5, 30]);
        assert_eq!(max, [200, 20, 90]);
    }
}
