//! End-to-end operation tests against the standard strategy bundle.

use kontex_api::{
    ops, AllocateStorage, CodecBundle, CompressionParams, Container, ContainerError, CreateInfo,
    Format, PlaneEncoder, StrategyError, SupercompressionScheme, TranscodeFlags,
};
use std::sync::atomic::{AtomicU32, Ordering};

/// Builds an RGBA8 container with a deterministic gradient in every plane.
fn gradient_container(info: &CreateInfo) -> Container {
    let mut container = Container::create(info, AllocateStorage::Allocate).unwrap();
    for level in 0..info.level_count {
        let (width, height) = container.level_dimensions(level);
        for layer in 0..info.layer_count {
            for face in 0..info.face_count {
                let mut plane = Vec::with_capacity((width * height * 4) as usize);
                for y in 0..height {
                    for x in 0..width {
                        plane.extend_from_slice(&[
                            (x * 8 + layer) as u8,
                            (y * 8 + face) as u8,
                            (level * 40) as u8,
                            255,
                        ]);
                    }
                }
                container
                    .set_image_from_memory(level, layer, face, &plane)
                    .unwrap();
            }
        }
    }
    container
}

#[test]
fn scenario_4x4_write_read_identity() {
    // Create, write, read back with image data: identical dimensions,
    // format and byte-identical pixel data.
    let info = CreateInfo::texture_2d(4, 4, Format::Rgba8);
    let container = gradient_container(&info);

    let stream = kontex_api::write_container(&container).unwrap();
    let restored = kontex_api::read_container(&stream, true).unwrap();

    assert_eq!(restored.width(), 4);
    assert_eq!(restored.height(), 4);
    assert_eq!(restored.format(), Format::Rgba8);
    assert_eq!(
        restored.image_data(0, 0, 0).unwrap(),
        container.image_data(0, 0, 0).unwrap()
    );
    assert_eq!(restored, container);
}

#[test]
fn compress_block_round_trips_through_file() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo {
        level_count: 3,
        ..CreateInfo::texture_2d(16, 16, Format::Rgba8)
    };
    let mut container = gradient_container(&info);

    ops::compress_block(&mut container, &bundle, Format::Bc1, 128).unwrap();
    assert_eq!(container.format(), Format::Bc1);
    assert_eq!(container.vk_format(), 131);
    assert!(!container.needs_transcoding());

    let stream = kontex_api::write_container(&container).unwrap();
    let restored = kontex_api::read_container(&stream, true).unwrap();
    assert_eq!(restored, container);
}

#[test]
fn simple_overload_matches_preset_parameters() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo::texture_2d(8, 8, Format::Rgba8);

    let mut via_simple = gradient_container(&info);
    ops::compress_block(&mut via_simple, &bundle, Format::Bc3, 200).unwrap();

    let mut via_params = gradient_container(&info);
    ops::compress_block_with(
        &mut via_params,
        &bundle,
        Format::Bc3,
        &kontex_api::BlockCompressParams::with_quality(200),
    )
    .unwrap();

    assert_eq!(via_simple, via_params);
}

#[test]
fn compress_requires_loaded_data() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo::texture_2d(8, 8, Format::Rgba8);
    let mut container = Container::create(&info, AllocateStorage::NoStorage).unwrap();

    assert!(matches!(
        ops::compress_block(&mut container, &bundle, Format::Bc1, 100),
        Err(ContainerError::InvalidOperation(_))
    ));
}

#[test]
fn compress_rejects_non_rgba_source() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));
    ops::compress_block(&mut container, &bundle, Format::Bc1, 100).unwrap();

    // Already block-compressed data cannot be source material again.
    let before = container.clone();
    assert_eq!(
        ops::compress_block(&mut container, &bundle, Format::Bc3, 100),
        Err(ContainerError::UnsupportedFormat(Format::Bc1))
    );
    assert_eq!(
        ops::compress_universal(&mut container, &bundle, 100),
        Err(ContainerError::UnsupportedFormat(Format::Bc1))
    );
    assert_eq!(container, before);
}

#[test]
fn compress_rejects_supercompressed_source() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));
    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 3).unwrap();

    let before = container.clone();
    assert!(matches!(
        ops::compress_block(&mut container, &bundle, Format::Bc1, 100),
        Err(ContainerError::InvalidOperation(_))
    ));
    assert_eq!(container, before);
}

/// Encoder stub that fails once a configured number of planes succeeded.
struct FailingEncoder {
    remaining: AtomicU32,
}

impl FailingEncoder {
    fn after(successes: u32) -> Self {
        Self {
            remaining: AtomicU32::new(successes),
        }
    }
}

impl PlaneEncoder for FailingEncoder {
    fn format(&self) -> Format {
        Format::Bc1
    }

    fn encode_plane(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        _params: &CompressionParams,
    ) -> Result<Vec<u8>, StrategyError> {
        if self.remaining.fetch_sub(1, Ordering::SeqCst) == 0 {
            return Err(StrategyError::Internal("injected encoder failure".into()));
        }
        let _ = pixels;
        Ok(vec![0u8; Format::Bc1.plane_byte_length(width, height)])
    }
}

#[test]
fn encoder_failure_mid_loop_leaves_container_unchanged() {
    // Three levels; the injected failure lands in the middle of the loop.
    let info = CreateInfo {
        level_count: 3,
        ..CreateInfo::texture_2d(16, 16, Format::Rgba8)
    };
    let mut container = gradient_container(&info);
    let before = container.clone();

    let bundle =
        CodecBundle::new().with_block_encoder(Box::new(FailingEncoder::after(1)));

    let result = ops::compress_block(&mut container, &bundle, Format::Bc1, 50);
    assert!(matches!(result, Err(ContainerError::EncoderFailure(_))));

    // Every level's data and the format tag are untouched.
    assert_eq!(container, before);
    assert_eq!(container.format(), Format::Rgba8);
}

#[test]
fn deflate_twice_fails_and_preserves_container() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(16, 16, Format::Rgba8));

    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 5).unwrap();
    assert!(container.is_supercompressed());

    let before = container.clone();
    assert_eq!(
        ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 5),
        Err(ContainerError::AlreadySupercompressed(
            SupercompressionScheme::Zstd
        ))
    );
    // Switching schemes without inflating first is equally rejected.
    assert_eq!(
        ops::deflate(&mut container, &bundle, SupercompressionScheme::Zlib, 5),
        Err(ContainerError::AlreadySupercompressed(
            SupercompressionScheme::Zstd
        ))
    );
    assert_eq!(container, before);
}

#[test]
fn deflate_rejects_out_of_range_levels() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));
    let before = container.clone();

    // Scheme A (zstd) accepts 1-22.
    assert_eq!(
        ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 30),
        Err(ContainerError::InvalidParameter(
            "compression level is outside the scheme's accepted range"
        ))
    );
    // Scheme B (zlib) accepts 1-9.
    assert_eq!(
        ops::deflate(&mut container, &bundle, SupercompressionScheme::Zlib, 10),
        Err(ContainerError::InvalidParameter(
            "compression level is outside the scheme's accepted range"
        ))
    );
    assert_eq!(
        ops::deflate(&mut container, &bundle, SupercompressionScheme::None, 1),
        Err(ContainerError::InvalidParameter(
            "a concrete supercompression scheme is required"
        ))
    );
    assert_eq!(container, before);
}

#[test]
fn deflate_updates_level_index_consistently() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo {
        level_count: 3,
        ..CreateInfo::texture_2d(32, 32, Format::Rgba8)
    };
    let mut container = gradient_container(&info);

    // Uncompressed: the index mirrors the stored length.
    for level in 0..3 {
        let data = container.level(level).unwrap();
        assert!(!data.is_supercompressed());
        assert_eq!(data.uncompressed_byte_length(), data.byte_length() as u64);
    }

    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zlib, 9).unwrap();

    for level in 0..3 {
        let data = container.level(level).unwrap();
        assert!(data.is_supercompressed());
        assert_eq!(
            data.uncompressed_byte_length(),
            container.level_byte_length(level) as u64
        );
        // The gradient compresses, so the stored stream is strictly smaller.
        assert!((data.byte_length() as u64) < data.uncompressed_byte_length());
    }
}

#[test]
fn inflate_restores_exact_bytes_and_allows_scheme_switch() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(16, 16, Format::Rgba8));
    let original = container.clone();

    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 19).unwrap();
    ops::inflate(&mut container, &bundle).unwrap();
    assert_eq!(container, original);

    // Decompressed again, the other scheme is now acceptable.
    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zlib, 6).unwrap();
    assert_eq!(
        container.supercompression_scheme(),
        SupercompressionScheme::Zlib
    );

    ops::inflate(&mut container, &bundle).unwrap();
    assert_eq!(container, original);
}

#[test]
fn inflate_requires_active_scheme() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(4, 4, Format::Rgba8));
    assert!(matches!(
        ops::inflate(&mut container, &bundle),
        Err(ContainerError::InvalidOperation(_))
    ));
}

#[test]
fn transcode_clears_needs_transcoding() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(16, 16, Format::Rgba8));

    ops::compress_universal(&mut container, &bundle, 150).unwrap();
    assert!(container.needs_transcoding());
    assert_eq!(container.vk_format(), 0);

    ops::transcode(&mut container, &bundle, Format::Bc1, TranscodeFlags::NONE).unwrap();
    assert!(!container.needs_transcoding());
    assert_eq!(container.format(), Format::Bc1);
    assert_eq!(
        container.level(0).unwrap().byte_length(),
        Format::Bc1.plane_byte_length(16, 16)
    );
}

#[test]
fn transcode_requires_universal_data() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));

    // RGBA8 is not transcodable input.
    assert!(matches!(
        ops::transcode(&mut container, &bundle, Format::Bc1, TranscodeFlags::NONE),
        Err(ContainerError::InvalidOperation(_))
    ));

    // Neither is concrete block data.
    ops::compress_block(&mut container, &bundle, Format::Bc1, 100).unwrap();
    assert!(matches!(
        ops::transcode(&mut container, &bundle, Format::Bc3, TranscodeFlags::NONE),
        Err(ContainerError::InvalidOperation(_))
    ));
}

#[test]
fn transcode_without_loaded_data_fails_data_not_loaded() {
    let bundle = CodecBundle::standard();

    // A universal-format container written to a stream, then read back
    // structure-only.
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));
    ops::compress_universal(&mut container, &bundle, 100).unwrap();
    let stream = kontex_api::write_container(&container).unwrap();

    let mut skeleton = kontex_api::read_container(&stream, false).unwrap();
    assert!(skeleton.needs_transcoding());
    assert_eq!(
        ops::transcode(&mut skeleton, &bundle, Format::Bc1, TranscodeFlags::NONE),
        Err(ContainerError::DataNotLoaded)
    );
}

#[test]
fn transcode_rejects_unsupported_target() {
    let bundle = CodecBundle::standard();
    let mut container = gradient_container(&CreateInfo::texture_2d(8, 8, Format::Rgba8));
    ops::compress_universal(&mut container, &bundle, 100).unwrap();

    let before = container.clone();
    assert_eq!(
        ops::transcode(&mut container, &bundle, Format::Bc4, TranscodeFlags::NONE),
        Err(ContainerError::UnsupportedTargetFormat {
            source: Format::Universal,
            target: Format::Bc4,
        })
    );
    assert_eq!(container, before);
}

#[test]
fn transcode_inflates_supercompressed_levels_transparently() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo {
        level_count: 2,
        ..CreateInfo::texture_2d(8, 8, Format::Rgba8)
    };
    let mut container = gradient_container(&info);

    ops::compress_universal(&mut container, &bundle, 100).unwrap();
    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zstd, 10).unwrap();

    // Full pipeline through the codec, as a loader would see it.
    let stream = kontex_api::write_container(&container).unwrap();
    let mut loaded = kontex_api::read_container(&stream, true).unwrap();
    assert!(loaded.is_supercompressed());
    assert!(loaded.needs_transcoding());

    ops::transcode(&mut loaded, &bundle, Format::Rgba8, TranscodeFlags::NONE).unwrap();
    assert_eq!(loaded.format(), Format::Rgba8);
    assert!(!loaded.is_supercompressed());
    assert!(!loaded.needs_transcoding());
    assert_eq!(
        loaded.level(0).unwrap().byte_length(),
        loaded.level_byte_length(0)
    );
}

#[test]
fn universal_pipeline_reconstructs_exact_two_tone_pixels() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo::texture_2d(8, 8, Format::Rgba8);
    let mut container = Container::create(&info, AllocateStorage::Allocate).unwrap();

    let mut plane = Vec::with_capacity(8 * 8 * 4);
    for y in 0..8u32 {
        for x in 0..8u32 {
            if (x + y) % 2 == 0 {
                plane.extend_from_slice(&[0, 0, 0, 255]);
            } else {
                plane.extend_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    container.set_image_from_memory(0, 0, 0, &plane).unwrap();

    ops::compress_universal(&mut container, &bundle, 0).unwrap();
    ops::transcode(&mut container, &bundle, Format::Rgba8, TranscodeFlags::NONE).unwrap();

    // Black/white survives the universal palette exactly.
    assert_eq!(container.image_data(0, 0, 0).unwrap(), plane.as_slice());
}

#[test]
fn cubemap_array_survives_the_full_pipeline() {
    let bundle = CodecBundle::standard();
    let info = CreateInfo {
        level_count: 2,
        layer_count: 2,
        face_count: 6,
        ..CreateInfo::texture_2d(8, 8, Format::Rgba8)
    };
    let mut container = gradient_container(&info);

    ops::compress_block(&mut container, &bundle, Format::Bc3, 90).unwrap();
    ops::deflate(&mut container, &bundle, SupercompressionScheme::Zlib, 4).unwrap();

    let stream = kontex_api::write_container(&container).unwrap();
    let mut restored = kontex_api::read_container(&stream, true).unwrap();
    assert_eq!(restored, container);

    ops::inflate(&mut restored, &bundle).unwrap();
    assert_eq!(
        restored.level(1).unwrap().byte_length(),
        Format::Bc3.plane_byte_length(4, 4) * 12
    );
}
