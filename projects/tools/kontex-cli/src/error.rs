use kontex_api::{ContainerError, FileOperationError, StrategyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;
