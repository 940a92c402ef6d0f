//! Memory-mapped container file I/O.

use kontex_container::{Container, ContainerError};
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::path::Path;
use thiserror::Error;

/// Result type for file operations.
pub type FileOperationResult<T> = Result<T, FileOperationError>;

/// Errors from container file operations.
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// Parsing or serialization failed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Opening, mapping or sizing the file failed.
    #[error("file I/O error: {0}")]
    Io(String),
}

/// Reads a container from a named file.
///
/// The file is memory-mapped and parsed in place; with `load_image_data`
/// unset only the structure is read (see
/// [`kontex_codec::read_container`]).
pub fn read_container_from_file(
    path: &Path,
    load_image_data: bool,
) -> FileOperationResult<Container> {
    let handle = ReadOnlyFileHandle::open(path).map_err(io_error)?;
    let size = handle.size().map_err(io_error)? as usize;
    let mapping = ReadOnlyMmap::new(&handle, 0, size).map_err(io_error)?;

    Ok(kontex_codec::read_container(mapping.as_slice(), load_image_data)?)
}

/// Serializes a container to a named file.
///
/// The output file is preallocated at its final size and written through a
/// memory mapping. The output directory must exist.
pub fn write_container_to_file(container: &Container, path: &Path) -> FileOperationResult<()> {
    let bytes = kontex_codec::write_container(container)?;

    let handle =
        ReadWriteFileHandle::create_preallocated(path, bytes.len() as i64).map_err(io_error)?;
    let mut mapping = ReadWriteMmap::new(&handle, 0, bytes.len()).map_err(io_error)?;
    mapping.as_mut_slice().copy_from_slice(&bytes);

    Ok(())
}

fn io_error<E: std::fmt::Display>(error: E) -> FileOperationError {
    FileOperationError::Io(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontex_container::{AllocateStorage, CreateInfo, Format};

    #[test]
    fn file_round_trip() {
        let info = CreateInfo::texture_2d(8, 8, Format::Rgba8);
        let mut container = Container::create(&info, AllocateStorage::Allocate).unwrap();
        container
            .set_image_from_memory(0, 0, 0, &[7u8; 8 * 8 * 4])
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture.ktex");

        write_container_to_file(&container, &path).unwrap();
        let restored = read_container_from_file(&path, true).unwrap();
        assert_eq!(restored, container);

        let skeleton = read_container_from_file(&path, false).unwrap();
        assert!(!skeleton.has_data());
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_container_from_file(&dir.path().join("absent.ktex"), true);
        assert!(matches!(result, Err(FileOperationError::Io(_))));
    }
}
