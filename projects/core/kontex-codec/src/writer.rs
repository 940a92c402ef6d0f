//! Container to byte-stream serialization.

use crate::constants::*;
use alloc::vec;
use alloc::vec::Vec;
use endian_writer::{EndianWriter, LittleEndianWriter};
use kontex_container::{Container, ContainerError, Result};

/// Serializes a container into the KTEX byte layout.
///
/// Levels are written smallest first (the level index carries the absolute
/// offsets, so readers are order-independent), each blob aligned to
/// [`LEVEL_ALIGNMENT`].
///
/// # Errors
///
/// [`ContainerError::DataNotLoaded`] when the container carries headers
/// only.
pub fn write_container(container: &Container) -> Result<Vec<u8>> {
    let levels = container.levels().ok_or(ContainerError::DataNotLoaded)?;

    let dfd = build_dfd(container);
    let kvd = build_kvd(container);

    // Lay out the level blobs, smallest level first.
    let structure_end =
        HEADER_SIZE + levels.len() * LEVEL_INDEX_ENTRY_SIZE + dfd.len() + kvd.len();
    let mut cursor = structure_end;
    let mut offsets = vec![0usize; levels.len()];
    for (index, level) in levels.iter().enumerate().rev() {
        cursor = align_up(cursor, LEVEL_ALIGNMENT);
        offsets[index] = cursor;
        cursor += level.byte_length();
    }

    let mut output = vec![0u8; cursor];

    // Fixed header. The buffer is sized above; all offsets below stay within
    // HEADER_SIZE.
    output[0..MAGIC.len()].copy_from_slice(&MAGIC);
    let mut writer = unsafe { LittleEndianWriter::new(output.as_mut_ptr()) };
    unsafe {
        writer.write_u32_at(SUPPORTED_VERSION, VERSION_OFFSET as isize);
        writer.write_u32_at(container.vk_format(), VK_FORMAT_OFFSET as isize);
        writer.write_u32_at(TYPE_SIZE, TYPE_SIZE_OFFSET as isize);
        writer.write_u32_at(container.width(), WIDTH_OFFSET as isize);
        writer.write_u32_at(container.height(), HEIGHT_OFFSET as isize);
        writer.write_u32_at(container.depth(), DEPTH_OFFSET as isize);
        writer.write_u32_at(container.layer_count(), LAYER_COUNT_OFFSET as isize);
        writer.write_u32_at(container.face_count(), FACE_COUNT_OFFSET as isize);
        writer.write_u32_at(container.level_count(), LEVEL_COUNT_OFFSET as isize);
        writer.write_u32_at(
            container.supercompression_scheme().tag(),
            SCHEME_OFFSET as isize,
        );
        writer.write_u32_at(dfd.len() as u32, DFD_LENGTH_OFFSET as isize);
        writer.write_u32_at(kvd.len() as u32, KVD_LENGTH_OFFSET as isize);
    }

    // Level index.
    for (index, level) in levels.iter().enumerate() {
        let entry = HEADER_SIZE + index * LEVEL_INDEX_ENTRY_SIZE;
        output[entry..entry + 8].copy_from_slice(&(offsets[index] as u64).to_le_bytes());
        output[entry + 8..entry + 16]
            .copy_from_slice(&(level.byte_length() as u64).to_le_bytes());
        output[entry + 16..entry + 24]
            .copy_from_slice(&level.uncompressed_byte_length().to_le_bytes());
    }

    // Variable-length sections and level data.
    let dfd_start = HEADER_SIZE + levels.len() * LEVEL_INDEX_ENTRY_SIZE;
    output[dfd_start..dfd_start + dfd.len()].copy_from_slice(&dfd);
    let kvd_start = dfd_start + dfd.len();
    output[kvd_start..kvd_start + kvd.len()].copy_from_slice(&kvd);
    for (index, level) in levels.iter().enumerate() {
        output[offsets[index]..offsets[index] + level.byte_length()]
            .copy_from_slice(level.data());
    }

    Ok(output)
}

/// Builds the format descriptor block: (tag, value) u32 pairs.
fn build_dfd(container: &Container) -> Vec<u8> {
    let descriptor = container.descriptor();
    let mut flags = 0u32;
    if descriptor.premultiplied_alpha {
        flags |= DFD_FLAG_PREMULTIPLIED;
    }

    let pairs = [
        (DFD_TAG_COLOR_MODEL, descriptor.format.code()),
        (DFD_TAG_TRANSFER, descriptor.transfer.code()),
        (DFD_TAG_FLAGS, flags),
    ];

    let mut block = Vec::with_capacity(pairs.len() * 8);
    for (tag, value) in pairs {
        block.extend_from_slice(&tag.to_le_bytes());
        block.extend_from_slice(&value.to_le_bytes());
    }
    block
}

/// Builds the key/value block: u32-length-prefixed NUL-separated entries,
/// each padded to 4 bytes.
fn build_kvd(container: &Container) -> Vec<u8> {
    let mut block = Vec::new();
    for (key, value) in container.key_values() {
        let entry_len = key.len() + 1 + value.len();
        block.extend_from_slice(&(entry_len as u32).to_le_bytes());
        block.extend_from_slice(key.as_bytes());
        block.push(0);
        block.extend_from_slice(value);
        let padding = align_up(entry_len, 4) - entry_len;
        block.extend_from_slice(&[0u8; 3][..padding]);
    }
    block
}
