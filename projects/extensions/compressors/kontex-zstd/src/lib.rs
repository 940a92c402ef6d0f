//! Zstandard supercompression scheme for kontex.
//!
//! Implements [`Supercompressor`] over the raw `zstd-sys` bindings: one
//! compression/decompression context per call, standard zstd frames, no
//! dictionary. Level data is compressed per level, so levels stay
//! independently addressable through the level index.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::ffi::c_void;
use core::ops::RangeInclusive;
use kontex_container::{StrategyError, Supercompressor, SupercompressionScheme};
use zstd_sys::ZSTD_cParameter::*;
use zstd_sys::*;

/// Accepted compression level range.
///
/// Levels above 20 need considerably more working memory; they are accepted
/// but left to the caller's judgement.
pub const LEVEL_RANGE: RangeInclusive<i32> = 1..=22;

/// [`Supercompressor`] implementation for [`SupercompressionScheme::Zstd`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdSupercompressor;

impl Supercompressor for ZstdSupercompressor {
    fn scheme(&self) -> SupercompressionScheme {
        SupercompressionScheme::Zstd
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        LEVEL_RANGE
    }

    fn deflate(&self, data: &[u8], level: i32) -> Result<Vec<u8>, StrategyError> {
        compress(data, level)
    }

    fn inflate(&self, data: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, StrategyError> {
        decompress(data, uncompressed_len)
    }
}

/// Compresses `source` into a standard zstd frame at the given level.
pub fn compress(source: &[u8], level: i32) -> Result<Vec<u8>, StrategyError> {
    if !LEVEL_RANGE.contains(&level) {
        return Err(StrategyError::InvalidParameter(
            "zstd level must be between 1 and 22",
        ));
    }

    let bound = unsafe { ZSTD_compressBound(source.len()) };
    let mut destination = vec![0u8; bound];

    // Create a compression context
    let cctx = unsafe { ZSTD_createCCtx() };
    if cctx.is_null() {
        return Err(StrategyError::Internal("ZSTD_createCCtx failed".into()));
    }

    unsafe {
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_compressionLevel, level);
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_contentSizeFlag, 1);
        ZSTD_CCtx_setParameter(cctx, ZSTD_c_checksumFlag, 0);
    }

    // Perform compression
    let result = unsafe {
        ZSTD_compress2(
            cctx,
            destination.as_mut_ptr() as *mut c_void,
            destination.len(),
            source.as_ptr() as *const c_void,
            source.len(),
        )
    };

    // Free the context
    unsafe {
        ZSTD_freeCCtx(cctx);
    }

    if unsafe { ZSTD_isError(result) } != 0 {
        let code = unsafe { ZSTD_getErrorCode(result) };
        return Err(StrategyError::Internal(format!(
            "zstd compression failed: {code:?}"
        )));
    }

    destination.truncate(result);
    Ok(destination)
}

/// Decompresses a zstd frame into exactly `uncompressed_len` bytes.
pub fn decompress(source: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, StrategyError> {
    let mut destination = vec![0u8; uncompressed_len];

    let dctx = unsafe { ZSTD_createDCtx() };
    if dctx.is_null() {
        return Err(StrategyError::Internal("ZSTD_createDCtx failed".into()));
    }

    let result = unsafe {
        ZSTD_decompressDCtx(
            dctx,
            destination.as_mut_ptr() as *mut c_void,
            destination.len(),
            source.as_ptr() as *const c_void,
            source.len(),
        )
    };

    unsafe {
        ZSTD_freeDCtx(dctx);
    }

    if unsafe { ZSTD_isError(result) } != 0 {
        let code = unsafe { ZSTD_getErrorCode(result) };
        return Err(StrategyError::Internal(format!(
            "zstd decompression failed: {code:?}"
        )));
    }
    if result != uncompressed_len {
        return Err(StrategyError::Internal(format!(
            "zstd frame inflated to {result} bytes, expected {uncompressed_len}"
        )));
    }

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_level_data() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 7) as u8).collect();
        let compressed = compress(&data, 3).unwrap();
        assert!(compressed.len() < data.len());

        let restored = decompress(&compressed, data.len()).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(matches!(
            compress(b"abc", 0),
            Err(StrategyError::InvalidParameter(_))
        ));
        assert!(matches!(
            compress(b"abc", 23),
            Err(StrategyError::InvalidParameter(_))
        ));
        assert!(compress(b"abc", 1).is_ok());
        assert!(compress(b"abc", 22).is_ok());
    }

    #[test]
    fn corrupt_frames_are_reported() {
        let garbage = [0x13u8, 0x37, 0x00, 0x01, 0x02];
        assert!(matches!(
            decompress(&garbage, 16),
            Err(StrategyError::Internal(_))
        ));
    }

    #[test]
    fn higher_levels_do_not_grow_output() {
        let data: Vec<u8> = (0..16384u32).map(|i| (i / 53) as u8).collect();
        let fast = compress(&data, 1).unwrap();
        let best = compress(&data, 19).unwrap();
        assert!(best.len() <= fast.len());
    }

    #[test]
    fn strategy_reports_scheme_and_range() {
        let strategy = ZstdSupercompressor;
        assert_eq!(strategy.scheme(), SupercompressionScheme::Zstd);
        assert_eq!(strategy.level_range(), 1..=22);
    }
}
