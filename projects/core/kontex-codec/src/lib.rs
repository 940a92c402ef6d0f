//! KTEX binary serialization for kontex containers.
//!
//! The on-disk layout, little-endian throughout:
//!
//! | section | content |
//! |---|---|
//! | header (60 bytes) | magic, version, vkFormat, type size, dimensions, layer/face/level counts, supercompression scheme, DFD length, KVD length |
//! | level index | one (byteOffset, byteLength, uncompressedByteLength) u64 triple per level, absolute offsets |
//! | format descriptor | (tag, value) u32 pairs; color model, transfer function, flags |
//! | key/value data | u32-length-prefixed entries, NUL-separated key and value, 4-byte aligned |
//! | level data | 8-byte aligned blobs, physically ordered smallest level first |
//!
//! Readers follow the level index offsets, so physical ordering is a writer
//! convention, not a contract.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
mod reader;
mod writer;

pub use reader::{likely_container, read_container};
pub use writer::write_container;
