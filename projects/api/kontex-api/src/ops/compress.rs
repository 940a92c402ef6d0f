//! Format compression: RGBA8 source into block or universal encodings.

use crate::bundle::CodecBundle;
use kontex_container::{
    BlockCompressParams, CompressionParams, Container, ContainerError, Format, PlaneEncoder,
    Result, UniversalCompressParams,
};
use tracing::debug;

/// Compresses an RGBA8 container into a concrete block format with full
/// parameter control.
///
/// One-shot and irreversible without the original source data.
///
/// # Errors
///
/// - [`ContainerError::InvalidOperation`] when image data was not loaded,
///   or when a supercompression scheme is active (inflate first).
/// - [`ContainerError::UnsupportedFormat`] when the container does not hold
///   RGBA8 source data.
/// - [`ContainerError::InvalidParameter`] for a non-block target or
///   parameters the encoder rejects.
/// - [`ContainerError::EncoderFailure`] on internal encoder errors.
pub fn compress_block_with(
    container: &mut Container,
    bundle: &CodecBundle,
    target: Format,
    params: &BlockCompressParams,
) -> Result<()> {
    if !target.is_block_compressed() {
        return Err(ContainerError::InvalidParameter(
            "target of a block compression must be a block format",
        ));
    }
    let encoder = bundle.block_encoder(target).ok_or(
        ContainerError::InvalidOperation("no block encoder registered for the target format"),
    )?;
    compress_with_encoder(container, encoder, CompressionParams::Block(*params))
}

/// Compresses an RGBA8 container into a concrete block format using the
/// preset parameter bundle for `quality`.
pub fn compress_block(
    container: &mut Container,
    bundle: &CodecBundle,
    target: Format,
    quality: u8,
) -> Result<()> {
    compress_block_with(
        container,
        bundle,
        target,
        &BlockCompressParams::with_quality(quality),
    )
}

/// Compresses an RGBA8 container into the universal/transcodable encoding
/// with full parameter control.
///
/// The result can later be transcoded into concrete block formats without
/// the source pixels; see [`crate::ops::transcode`].
pub fn compress_universal_with(
    container: &mut Container,
    bundle: &CodecBundle,
    params: &UniversalCompressParams,
) -> Result<()> {
    let encoder = bundle.universal_encoder().ok_or(
        ContainerError::InvalidOperation("no universal encoder registered"),
    )?;
    compress_with_encoder(container, encoder, CompressionParams::Universal(*params))
}

/// Compresses an RGBA8 container into the universal encoding using the
/// preset parameter bundle for `quality` (0-255).
pub fn compress_universal(
    container: &mut Container,
    bundle: &CodecBundle,
    quality: u8,
) -> Result<()> {
    compress_universal_with(
        container,
        bundle,
        &UniversalCompressParams::with_quality(quality),
    )
}

/// Shared per-plane encode loop with a single commit at the end.
fn compress_with_encoder(
    container: &mut Container,
    encoder: &dyn PlaneEncoder,
    params: CompressionParams,
) -> Result<()> {
    if !container.has_data() {
        return Err(ContainerError::InvalidOperation(
            "image data was not loaded",
        ));
    }
    if container.is_supercompressed() {
        return Err(ContainerError::InvalidOperation(
            "container is supercompressed; inflate before compressing",
        ));
    }
    if !container.format().is_uncompressed() {
        return Err(ContainerError::UnsupportedFormat(container.format()));
    }

    let target = encoder.format();
    debug!(?target, levels = container.level_count(), "compressing container");

    // Build every level before touching the container; a failure on any
    // plane leaves it exactly as it was.
    let mut new_levels = Vec::with_capacity(container.level_count() as usize);
    for level in 0..container.level_count() {
        let (width, height) = container.level_dimensions(level);
        let mut blob =
            Vec::with_capacity(target.plane_byte_length(width, height) * container.plane_count());
        for layer in 0..container.layer_count() {
            for face in 0..container.face_count() {
                let pixels = container.image_data(level, layer, face)?;
                let encoded = encoder
                    .encode_plane(pixels, width, height, &params)
                    .map_err(ContainerError::from)?;
                blob.extend_from_slice(&encoded);
            }
        }
        new_levels.push(blob);
    }

    container.replace_levels(target, new_levels)
}
