pub mod compress;
pub mod deflate;
pub mod export;
pub mod import;
pub mod info;
pub mod transcode;
