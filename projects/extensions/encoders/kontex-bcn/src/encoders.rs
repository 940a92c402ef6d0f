//! [`PlaneEncoder`] strategy implementation for the BCn family.

use crate::plane;
use alloc::vec::Vec;
use kontex_container::{CompressionParams, Format, PlaneEncoder, StrategyError};

/// Block-compression strategy for one BCn target format.
///
/// One instance per format is registered in the API layer's strategy table.
#[derive(Debug, Clone, Copy)]
pub struct BcnPlaneEncoder {
    format: Format,
}

impl BcnPlaneEncoder {
    /// Creates an encoder strategy for `format`.
    ///
    /// # Errors
    ///
    /// `Unsupported` when `format` is not one of the BCn formats.
    pub fn new(format: Format) -> Result<Self, StrategyError> {
        if !format.is_block_compressed() {
            return Err(StrategyError::Unsupported(
                "BcnPlaneEncoder only handles the BCn formats",
            ));
        }
        Ok(Self { format })
    }

    /// BC1 encoder strategy.
    pub fn bc1() -> Self {
        Self { format: Format::Bc1 }
    }

    /// BC3 encoder strategy.
    pub fn bc3() -> Self {
        Self { format: Format::Bc3 }
    }

    /// BC4 encoder strategy.
    pub fn bc4() -> Self {
        Self { format: Format::Bc4 }
    }

    /// BC5 encoder strategy.
    pub fn bc5() -> Self {
        Self { format: Format::Bc5 }
    }
}

impl PlaneEncoder for BcnPlaneEncoder {
    fn format(&self) -> Format {
        self.format
    }

    fn encode_plane(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        params: &CompressionParams,
    ) -> Result<Vec<u8>, StrategyError> {
        let params = match params {
            CompressionParams::Block(params) => params,
            CompressionParams::Universal(_) => {
                return Err(StrategyError::InvalidParameter(
                    "block-compression parameters required",
                ));
            }
        };
        // The BCn family has a fixed texel block footprint.
        if (params.block_width, params.block_height) != (4, 4) {
            return Err(StrategyError::InvalidParameter(
                "BCn block dimensions must be 4x4",
            ));
        }

        plane::encode_plane(
            self.format,
            pixels,
            width,
            height,
            params.quality,
            params.perceptual,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontex_container::BlockCompressParams;

    #[test]
    fn rejects_non_bcn_formats() {
        assert!(BcnPlaneEncoder::new(Format::Rgba8).is_err());
        assert!(BcnPlaneEncoder::new(Format::Universal).is_err());
        assert!(BcnPlaneEncoder::new(Format::Bc5).is_ok());
    }

    #[test]
    fn rejects_wrong_parameter_variant() {
        let encoder = BcnPlaneEncoder::new(Format::Bc1).unwrap();
        let pixels = [0u8; 64];
        let params = CompressionParams::Universal(Default::default());
        assert!(matches!(
            encoder.encode_plane(&pixels, 4, 4, &params),
            Err(StrategyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_non_4x4_block_dimensions() {
        let encoder = BcnPlaneEncoder::new(Format::Bc1).unwrap();
        let pixels = [0u8; 64];
        let params = CompressionParams::Block(BlockCompressParams {
            block_width: 8,
            block_height: 8,
            ..Default::default()
        });
        assert!(matches!(
            encoder.encode_plane(&pixels, 4, 4, &params),
            Err(StrategyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn encodes_with_default_parameters() {
        let encoder = BcnPlaneEncoder::new(Format::Bc1).unwrap();
        let pixels = [128u8; 64];
        let params = CompressionParams::Block(Default::default());
        let encoded = encoder.encode_plane(&pixels, 4, 4, &params).unwrap();
        assert_eq!(encoded.len(), Format::Bc1.plane_byte_length(4, 4));
    }
}
