//! Universal/transcodable encoding (KTEX-U) for kontex.
//!
//! KTEX-U is an intermediate encoding: not directly GPU-consumable, but
//! cheap to transcode into concrete block formats at load time without the
//! original source imagery. Each 4x4 block stores full-precision color and
//! alpha endpoint pairs plus BC-style palette selectors; transcoding to
//! BC1/BC3 is endpoint quantization and selector repacking, transcoding to
//! RGBA8 is palette decode.
//!
//! The container-level vkFormat for this encoding is zero; the format
//! descriptor block identifies it.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod block;
pub mod encode;
pub mod transcode;

pub use block::UniversalBlock;
pub use encode::UniversalPlaneEncoder;
pub use transcode::UniversalTranscoder;
