//! Block-compression encoder family for kontex.
//!
//! Implements the BCn fixed-block formats in pure Rust:
//!
//! - BC1: 4x4 RGB blocks, 8 bytes (RGB565 endpoint pair + 2-bit selectors)
//! - BC3: BC1 color block plus a smooth alpha block, 16 bytes
//! - BC4: one smooth channel block (red), 8 bytes
//! - BC5: two smooth channel blocks (red, green), 16 bytes
//!
//! Encoding uses bounding-box endpoint selection with optional k-means style
//! refinement controlled by the quality parameter. Decoders are provided for
//! every format so callers can rasterize block data without a GPU.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod alpha;
pub mod bc1;
pub mod color;
pub mod encoders;
pub mod plane;

pub use encoders::BcnPlaneEncoder;
pub use plane::{decode_plane, encode_plane, extract_block};
