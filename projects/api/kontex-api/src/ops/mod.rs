//! Container operations: compression, supercompression, transcoding.
//!
//! Every operation here is all-or-nothing: new level data is fully built in
//! a working copy, then committed to the container in a single swap that
//! also updates the format descriptor and scheme tag. On any error the
//! container is unchanged from its pre-call state.

mod compress;
mod deflate;
mod transcode;

pub use compress::{
    compress_block, compress_block_with, compress_universal, compress_universal_with,
};
pub use deflate::{deflate, inflate};
pub use transcode::transcode;
