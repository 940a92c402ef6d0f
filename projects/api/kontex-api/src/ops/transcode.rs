//! Transcoding: universal intermediate data into a concrete format.

use crate::bundle::CodecBundle;
use crate::ops::deflate::inflate_level;
use kontex_container::{
    Container, ContainerError, Format, Result, SupercompressionScheme, TranscodeFlags,
};
use tracing::debug;

/// Transcodes a universal-format container into `target`.
///
/// Supercompressed levels are decompressed transparently into the working
/// copy first. On success the container holds `target` data, the scheme tag
/// is `None` and [`Container::needs_transcoding`] returns false.
///
/// The universal source is consumed by this operation. Callers that want to
/// transcode the same data to several targets must clone the container (or
/// re-read the file) beforehand.
///
/// # Errors
///
/// - [`ContainerError::InvalidOperation`] when the container does not hold
///   universal data ([`Container::needs_transcoding`] is false) or no
///   matching transcoder/supercompressor is registered.
/// - [`ContainerError::DataNotLoaded`] when the container was read without
///   image data.
/// - [`ContainerError::UnsupportedTargetFormat`] when the stored encoding
///   has no path to `target`.
/// - [`ContainerError::EncoderFailure`] on internal transcoder errors.
pub fn transcode(
    container: &mut Container,
    bundle: &CodecBundle,
    target: Format,
    flags: TranscodeFlags,
) -> Result<()> {
    if !container.needs_transcoding() {
        return Err(ContainerError::InvalidOperation(
            "container does not hold transcodable data",
        ));
    }
    if !container.has_data() {
        return Err(ContainerError::DataNotLoaded);
    }
    let source = container.format();
    let transcoder = bundle.transcoder(source).ok_or(
        ContainerError::InvalidOperation("no transcoder registered for the stored encoding"),
    )?;
    if !transcoder.supports_target(target) {
        return Err(ContainerError::UnsupportedTargetFormat { source, target });
    }

    let scheme = container.supercompression_scheme();
    debug!(?source, ?target, ?scheme, "transcoding container");

    // Work entirely on copies: decompress (if needed), transcode every
    // plane, and only then commit.
    let compressor = if scheme != SupercompressionScheme::None {
        Some(bundle.supercompressor(scheme).ok_or(
            ContainerError::InvalidOperation("no supercompressor registered for the scheme"),
        )?)
    } else {
        None
    };

    let plane_count = container.plane_count();
    let mut new_levels = Vec::with_capacity(container.level_count() as usize);
    for level in 0..container.level_count() {
        let (width, height) = container.level_dimensions(level);
        let level_data = container.level(level)?;

        let raw;
        let encoded: &[u8] = match compressor {
            Some(compressor) => {
                raw = inflate_level(compressor, level_data)?;
                &raw
            }
            None => level_data.data(),
        };

        let plane_len = source.plane_byte_length(width, height);
        if encoded.len() != plane_len * plane_count {
            return Err(ContainerError::CorruptFile(
                "level data does not match the declared format",
            ));
        }

        let mut blob =
            Vec::with_capacity(target.plane_byte_length(width, height) * plane_count);
        for plane in 0..plane_count {
            let data = &encoded[plane * plane_len..(plane + 1) * plane_len];
            let transcoded = transcoder
                .transcode_plane(data, width, height, target, flags)
                .map_err(ContainerError::from)?;
            blob.extend_from_slice(&transcoded);
        }
        new_levels.push(blob);
    }

    container.replace_levels(target, new_levels)
}
