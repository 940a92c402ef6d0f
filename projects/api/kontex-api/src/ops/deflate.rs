//! Supercompression: per-level byte-stream compression of encoded data.

use crate::bundle::CodecBundle;
use kontex_container::{
    Container, ContainerError, LevelData, Result, SupercompressionScheme,
};
use tracing::debug;

/// Supercompresses every level of the container with `scheme` at the given
/// level.
///
/// Always applied after format encoding: it compresses the encoded bytes,
/// not raw pixels. Updates each level index entry with the compressed and
/// original lengths and sets the scheme tag, all in one commit.
///
/// # Errors
///
/// - [`ContainerError::DataNotLoaded`] without level data.
/// - [`ContainerError::AlreadySupercompressed`] when any scheme is active;
///   deflating must start from the decompressed state.
/// - [`ContainerError::InvalidParameter`] when `scheme` is `None` or the
///   level is outside the scheme's accepted range (zstd 1-22, zlib 1-9).
/// - [`ContainerError::EncoderFailure`] when the underlying compressor
///   fails.
pub fn deflate(
    container: &mut Container,
    bundle: &CodecBundle,
    scheme: SupercompressionScheme,
    level: i32,
) -> Result<()> {
    if scheme == SupercompressionScheme::None {
        return Err(ContainerError::InvalidParameter(
            "a concrete supercompression scheme is required",
        ));
    }
    let compressor = bundle.supercompressor(scheme).ok_or(
        ContainerError::InvalidOperation("no supercompressor registered for the scheme"),
    )?;
    if container.is_supercompressed() {
        return Err(ContainerError::AlreadySupercompressed(
            container.supercompression_scheme(),
        ));
    }
    if !compressor.level_range().contains(&level) {
        return Err(ContainerError::InvalidParameter(
            "compression level is outside the scheme's accepted range",
        ));
    }
    let levels = container.levels().ok_or(ContainerError::DataNotLoaded)?;

    debug!(?scheme, level, "supercompressing container");

    let mut compressed = Vec::with_capacity(levels.len());
    for level_data in levels {
        let stream = compressor
            .deflate(level_data.data(), level)
            .map_err(ContainerError::from)?;
        compressed.push(stream);
    }

    container.apply_supercompression(scheme, compressed)
}

/// Reverses [`deflate`], restoring every level to its recorded uncompressed
/// form and clearing the scheme tag.
///
/// This is the documented path for switching schemes: inflate, then deflate
/// with the other scheme.
///
/// # Errors
///
/// - [`ContainerError::DataNotLoaded`] without level data.
/// - [`ContainerError::InvalidOperation`] when no scheme is active or no
///   matching supercompressor is registered.
/// - [`ContainerError::EncoderFailure`] when the underlying decompressor
///   fails or produces a length that disagrees with the level index.
pub fn inflate(container: &mut Container, bundle: &CodecBundle) -> Result<()> {
    if !container.has_data() {
        return Err(ContainerError::DataNotLoaded);
    }
    let scheme = container.supercompression_scheme();
    if scheme == SupercompressionScheme::None {
        return Err(ContainerError::InvalidOperation(
            "container is not supercompressed",
        ));
    }
    let compressor = bundle.supercompressor(scheme).ok_or(
        ContainerError::InvalidOperation("no supercompressor registered for the scheme"),
    )?;
    let levels = container.levels().ok_or(ContainerError::DataNotLoaded)?;

    debug!(?scheme, "inflating container");

    let mut inflated = Vec::with_capacity(levels.len());
    for level_data in levels {
        inflated.push(inflate_level(compressor, level_data)?);
    }

    container.clear_supercompression(inflated)
}

/// Inflates one level, validating the recorded length.
pub(crate) fn inflate_level(
    compressor: &dyn kontex_container::Supercompressor,
    level_data: &LevelData,
) -> Result<Vec<u8>> {
    let expected = level_data.uncompressed_byte_length() as usize;
    let stream = compressor
        .inflate(level_data.data(), expected)
        .map_err(ContainerError::from)?;
    if stream.len() != expected {
        return Err(ContainerError::EncoderFailure(format!(
            "decompressor produced {} bytes, level index records {expected}",
            stream.len()
        )));
    }
    Ok(stream)
}
