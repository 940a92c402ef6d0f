//! Error taxonomy shared across the kontex crates.

use crate::format::Format;
use crate::scheme::SupercompressionScheme;
use alloc::string::String;
use thiserror::Error;

/// Result type used throughout the kontex crates.
pub type Result<T> = core::result::Result<T, ContainerError>;

/// Errors produced by container operations, the codec and the high-level API.
///
/// Every mutating operation is all-or-nothing: when one of these errors is
/// returned the container is unchanged from its pre-call state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Malformed input: zero dimensions, out-of-range level or quality, etc.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Operation invoked on a container that is not in the required state.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// The container's current format cannot be source material for this operation.
    #[error("{0:?} data cannot be the source for this operation")]
    UnsupportedFormat(Format),

    /// The stored encoding has no transcode path to the requested format.
    #[error("no transcode path from {source:?} to {target:?}")]
    UnsupportedTargetFormat {
        /// Encoding currently held by the container.
        source: Format,
        /// Requested output format.
        target: Format,
    },

    /// A supercompression scheme is already active on this container.
    #[error("container is already supercompressed with {0:?}")]
    AlreadySupercompressed(SupercompressionScheme),

    /// The byte stream is not a container file, or its structure is malformed.
    #[error("corrupt file: {0}")]
    CorruptFile(&'static str),

    /// Declared offsets or lengths exceed the supplied stream.
    #[error("truncated file: need {required} bytes, stream has {actual}")]
    TruncatedFile {
        /// Bytes the declared layout requires.
        required: usize,
        /// Bytes actually present in the stream.
        actual: usize,
    },

    /// The header declares a version newer than this implementation understands.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),

    /// An encoder or compressor strategy failed internally; opaque to the caller.
    #[error("encoder failure: {0}")]
    EncoderFailure(String),

    /// Pixel data was requested but never loaded or allocated.
    #[error("image data has not been loaded")]
    DataNotLoaded,
}

/// Error raised inside an encoder/compressor/transcoder strategy.
///
/// Strategies do not see the whole container, so they report in their own
/// vocabulary; the API layer folds these into [`ContainerError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// A parameter handed to the strategy is out of range or the wrong variant.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The strategy cannot process this input.
    #[error("unsupported input: {0}")]
    Unsupported(&'static str),

    /// Internal failure of the underlying encoder library.
    #[error("{0}")]
    Internal(String),
}

impl From<StrategyError> for ContainerError {
    fn from(err: StrategyError) -> Self {
        match err {
            StrategyError::InvalidParameter(msg) => ContainerError::InvalidParameter(msg),
            StrategyError::Unsupported(msg) => ContainerError::InvalidOperation(msg),
            StrategyError::Internal(msg) => ContainerError::EncoderFailure(msg),
        }
    }
}
