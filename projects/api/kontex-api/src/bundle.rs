//! The strategy registry dispatched by the operations.

use kontex_bcn::BcnPlaneEncoder;
use kontex_container::{Format, PlaneEncoder, Supercompressor, SupercompressionScheme, Transcoder};
use kontex_universal::{UniversalPlaneEncoder, UniversalTranscoder};
use kontex_zlib::ZlibSupercompressor;
use kontex_zstd::ZstdSupercompressor;

/// Table of encoder, transcoder and supercompressor strategies.
///
/// Built once at process start (typically via [`CodecBundle::standard`])
/// and queried by value during operations; nothing mutates it at call
/// sites. A custom bundle can substitute or omit strategies, which the
/// operations report as unavailable rather than falling back silently.
#[derive(Default)]
pub struct CodecBundle {
    block_encoders: Vec<Box<dyn PlaneEncoder>>,
    universal_encoder: Option<Box<dyn PlaneEncoder>>,
    transcoders: Vec<Box<dyn Transcoder>>,
    supercompressors: Vec<Box<dyn Supercompressor>>,
}

impl CodecBundle {
    /// An empty bundle; add strategies with the builder methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full first-party strategy table: BC1/BC3/BC4/BC5 block
    /// encoders, the universal encoder and transcoder, and the zstd and
    /// zlib supercompression schemes.
    pub fn standard() -> Self {
        Self::new()
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc1()))
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc3()))
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc4()))
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc5()))
            .with_universal_encoder(Box::new(UniversalPlaneEncoder))
            .with_transcoder(Box::new(UniversalTranscoder))
            .with_supercompressor(Box::new(ZstdSupercompressor))
            .with_supercompressor(Box::new(ZlibSupercompressor))
    }

    /// Registers a block-compression encoder, replacing any previous
    /// encoder for the same format.
    pub fn with_block_encoder(mut self, encoder: Box<dyn PlaneEncoder>) -> Self {
        self.block_encoders
            .retain(|existing| existing.format() != encoder.format());
        self.block_encoders.push(encoder);
        self
    }

    /// Registers the universal-family encoder.
    pub fn with_universal_encoder(mut self, encoder: Box<dyn PlaneEncoder>) -> Self {
        self.universal_encoder = Some(encoder);
        self
    }

    /// Registers a transcoder, replacing any previous transcoder for the
    /// same source format.
    pub fn with_transcoder(mut self, transcoder: Box<dyn Transcoder>) -> Self {
        self.transcoders
            .retain(|existing| existing.source_format() != transcoder.source_format());
        self.transcoders.push(transcoder);
        self
    }

    /// Registers a supercompressor, replacing any previous one for the
    /// same scheme.
    pub fn with_supercompressor(mut self, compressor: Box<dyn Supercompressor>) -> Self {
        self.supercompressors
            .retain(|existing| existing.scheme() != compressor.scheme());
        self.supercompressors.push(compressor);
        self
    }

    /// Block encoder registered for `format`, if any.
    pub fn block_encoder(&self, format: Format) -> Option<&dyn PlaneEncoder> {
        self.block_encoders
            .iter()
            .find(|encoder| encoder.format() == format)
            .map(AsRef::as_ref)
    }

    /// The universal-family encoder, if registered.
    pub fn universal_encoder(&self) -> Option<&dyn PlaneEncoder> {
        self.universal_encoder.as_deref()
    }

    /// Transcoder registered for `source`, if any.
    pub fn transcoder(&self, source: Format) -> Option<&dyn Transcoder> {
        self.transcoders
            .iter()
            .find(|transcoder| transcoder.source_format() == source)
            .map(AsRef::as_ref)
    }

    /// Supercompressor registered for `scheme`, if any.
    pub fn supercompressor(&self, scheme: SupercompressionScheme) -> Option<&dyn Supercompressor> {
        self.supercompressors
            .iter()
            .find(|compressor| compressor.scheme() == scheme)
            .map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bundle_covers_every_strategy() {
        let bundle = CodecBundle::standard();
        for format in [Format::Bc1, Format::Bc3, Format::Bc4, Format::Bc5] {
            assert!(bundle.block_encoder(format).is_some(), "{format:?}");
        }
        assert!(bundle.block_encoder(Format::Rgba8).is_none());
        assert!(bundle.universal_encoder().is_some());
        assert!(bundle.transcoder(Format::Universal).is_some());
        assert!(bundle
            .supercompressor(SupercompressionScheme::Zstd)
            .is_some());
        assert!(bundle
            .supercompressor(SupercompressionScheme::Zlib)
            .is_some());
        assert!(bundle
            .supercompressor(SupercompressionScheme::None)
            .is_none());
    }

    #[test]
    fn empty_bundle_has_no_strategies() {
        let bundle = CodecBundle::new();
        assert!(bundle.block_encoder(Format::Bc1).is_none());
        assert!(bundle.universal_encoder().is_none());
        assert!(bundle.transcoder(Format::Universal).is_none());
    }

    #[test]
    fn registration_replaces_same_key() {
        let bundle = CodecBundle::new()
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc1()))
            .with_block_encoder(Box::new(BcnPlaneEncoder::bc1()));
        assert!(bundle.block_encoder(Format::Bc1).is_some());
    }
}
