//! Core container model for the kontex texture container codec.
//!
//! This crate owns the in-memory representation of a texture container:
//! dimensions, mip levels, array layers, cube faces, the self-describing
//! format descriptor, and the supercompression scheme tag. It also defines
//! the error taxonomy shared by every kontex crate and the strategy traits
//! ([`PlaneEncoder`], [`Supercompressor`], [`Transcoder`]) that the encoder
//! and compressor extension crates implement.
//!
//! Mutation of a container goes through narrow commit methods
//! ([`Container::replace_levels`], [`Container::apply_supercompression`],
//! [`Container::clear_supercompression`]) that validate a fully built
//! working copy and swap it in atomically. Higher-level orchestration
//! (compress/deflate/transcode) lives in `kontex-api`.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod container;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod params;
pub mod scheme;
pub mod traits;

pub use container::{AllocateStorage, Container, CreateInfo, LevelData};
pub use descriptor::FormatDescriptor;
pub use error::{ContainerError, Result, StrategyError};
pub use format::{ChannelSemantic, Format, TransferFunction};
pub use params::{
    BlockCompressParams, CompressionParams, TranscodeFlags, UniversalCompressParams,
};
pub use scheme::SupercompressionScheme;
pub use traits::{PlaneEncoder, Supercompressor, Transcoder};
