//! High-level operations for the kontex texture container codec.
//!
//! This crate glues the core container model, the KTEX codec and the
//! pluggable encoder/compressor strategies together:
//!
//! - [`CodecBundle`]: the strategy registry, built once at startup and
//!   queried by format/scheme tag during operations.
//! - [`ops`]: compress (block and universal families), deflate/inflate,
//!   and transcode, each all-or-nothing with respect to the container.
//! - [`file_io`] (feature `file-io`): memory-mapped container file
//!   read/write.
//!
//! # Example
//!
//! ```
//! use kontex_api::{ops, AllocateStorage, CodecBundle, Container, CreateInfo, Format};
//!
//! fn example() -> kontex_api::Result<Vec<u8>> {
//!     let bundle = CodecBundle::standard();
//!     let info = CreateInfo::texture_2d(64, 64, Format::Rgba8);
//!     let mut container = Container::create(&info, AllocateStorage::Allocate)?;
//!
//!     ops::compress_block(&mut container, &bundle, Format::Bc1, 128)?;
//!     ops::deflate(&mut container, &bundle, kontex_api::SupercompressionScheme::Zstd, 3)?;
//!     kontex_api::write_container(&container)
//! }
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod ops;

#[cfg(feature = "file-io")]
pub mod file_io;

// Re-export the core vocabulary so callers need a single dependency.
pub use kontex_codec::{likely_container, read_container, write_container};
pub use kontex_container::{
    AllocateStorage, BlockCompressParams, ChannelSemantic, CompressionParams, Container,
    ContainerError, CreateInfo, Format, FormatDescriptor, LevelData, PlaneEncoder, Result,
    StrategyError, Supercompressor, SupercompressionScheme, Transcoder, TranscodeFlags,
    TransferFunction, UniversalCompressParams,
};

pub use bundle::CodecBundle;

#[cfg(feature = "file-io")]
pub use file_io::{read_container_from_file, write_container_to_file, FileOperationError};
