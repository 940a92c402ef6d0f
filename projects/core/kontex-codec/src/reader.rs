//! Byte-stream to container deserialization.

use crate::constants::*;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use endian_writer::{EndianReader, LittleEndianReader};
use kontex_container::{
    Container, ContainerError, CreateInfo, Format, LevelData, Result, SupercompressionScheme,
    TransferFunction,
};

/// Cheap magic check, for format sniffing before a full parse.
pub fn likely_container(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && data[..MAGIC.len()] == MAGIC
}

/// Parses a KTEX byte stream.
///
/// With `load_image_data` unset only the structure is parsed; the resulting
/// container carries headers and metadata but no level storage, and
/// operations that need pixel data fail with
/// [`ContainerError::DataNotLoaded`]. The level index is bounds-checked
/// either way.
///
/// # Errors
///
/// [`ContainerError::CorruptFile`] on magic mismatch or malformed
/// structure, [`ContainerError::TruncatedFile`] when declared offsets or
/// lengths exceed the stream, [`ContainerError::UnsupportedVersion`] for a
/// header version newer than this implementation.
pub fn read_container(data: &[u8], load_image_data: bool) -> Result<Container> {
    if data.len() < HEADER_SIZE {
        return Err(ContainerError::TruncatedFile {
            required: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if !likely_container(data) {
        return Err(ContainerError::CorruptFile("magic mismatch"));
    }

    // Bounds were checked against HEADER_SIZE above; every fixed-field read
    // below stays inside it.
    let mut reader = unsafe { LittleEndianReader::new(data.as_ptr()) };
    let version = unsafe { reader.read_u32_at(VERSION_OFFSET as isize) };
    if version > SUPPORTED_VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }
    let vk_format = unsafe { reader.read_u32_at(VK_FORMAT_OFFSET as isize) };
    let type_size = unsafe { reader.read_u32_at(TYPE_SIZE_OFFSET as isize) };
    if type_size != TYPE_SIZE {
        return Err(ContainerError::CorruptFile("unexpected type size"));
    }
    let width = unsafe { reader.read_u32_at(WIDTH_OFFSET as isize) };
    let height = unsafe { reader.read_u32_at(HEIGHT_OFFSET as isize) };
    let depth = unsafe { reader.read_u32_at(DEPTH_OFFSET as isize) };
    let layer_count = unsafe { reader.read_u32_at(LAYER_COUNT_OFFSET as isize) };
    let face_count = unsafe { reader.read_u32_at(FACE_COUNT_OFFSET as isize) };
    let level_count = unsafe { reader.read_u32_at(LEVEL_COUNT_OFFSET as isize) };
    let scheme_tag = unsafe { reader.read_u32_at(SCHEME_OFFSET as isize) };
    let dfd_length = unsafe { reader.read_u32_at(DFD_LENGTH_OFFSET as isize) } as usize;
    let kvd_length = unsafe { reader.read_u32_at(KVD_LENGTH_OFFSET as isize) } as usize;

    let scheme = SupercompressionScheme::from_tag(scheme_tag)
        .ok_or(ContainerError::CorruptFile("unknown supercompression scheme"))?;

    // Sanity-bound the level count before trusting it for index math.
    if level_count == 0 || level_count > 32 {
        return Err(ContainerError::CorruptFile("implausible level count"));
    }
    let index_end = HEADER_SIZE + level_count as usize * LEVEL_INDEX_ENTRY_SIZE;
    let structure_end = index_end + dfd_length + kvd_length;
    if data.len() < structure_end {
        return Err(ContainerError::TruncatedFile {
            required: structure_end,
            actual: data.len(),
        });
    }

    let (format, transfer, premultiplied_alpha) =
        parse_dfd(&data[index_end..index_end + dfd_length])?;
    if format.vk_format(transfer) != vk_format {
        return Err(ContainerError::CorruptFile(
            "vkFormat disagrees with the format descriptor",
        ));
    }

    let key_values = parse_kvd(&data[index_end + dfd_length..structure_end])?;

    // Level index, bounds-checked against the whole stream.
    let mut levels = Vec::with_capacity(level_count as usize);
    for index in 0..level_count as usize {
        let entry = HEADER_SIZE + index * LEVEL_INDEX_ENTRY_SIZE;
        let byte_offset = read_u64(&data[entry..entry + 8]);
        let byte_length = read_u64(&data[entry + 8..entry + 16]);
        let uncompressed = read_u64(&data[entry + 16..entry + 24]);

        let end = byte_offset
            .checked_add(byte_length)
            .ok_or(ContainerError::CorruptFile("level range overflows"))?;
        if end > data.len() as u64 {
            return Err(ContainerError::TruncatedFile {
                required: end as usize,
                actual: data.len(),
            });
        }

        if load_image_data {
            let blob = data[byte_offset as usize..end as usize].to_vec();
            levels.push(if scheme == SupercompressionScheme::None {
                LevelData::new(blob)
            } else {
                LevelData::supercompressed(blob, uncompressed)
            });
        }
    }

    let info = CreateInfo {
        width,
        height,
        depth,
        level_count,
        layer_count,
        face_count,
        format,
        transfer,
        premultiplied_alpha,
    };
    Container::from_parts(
        &info,
        scheme,
        load_image_data.then_some(levels),
        key_values,
    )
    // Geometry that validate-on-create rejects cannot have been produced by
    // a conforming writer.
    .map_err(|_| ContainerError::CorruptFile("header declares invalid geometry"))
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(bytes.try_into().unwrap())
}

/// Parses the (tag, value) pairs of the format descriptor block.
fn parse_dfd(block: &[u8]) -> Result<(Format, TransferFunction, bool)> {
    if block.len() % 8 != 0 {
        return Err(ContainerError::CorruptFile(
            "format descriptor length is not a whole number of pairs",
        ));
    }

    let mut format = None;
    let mut transfer = None;
    let mut flags = 0u32;
    for pair in block.chunks_exact(8) {
        let tag = u32::from_le_bytes(pair[0..4].try_into().unwrap());
        let value = u32::from_le_bytes(pair[4..8].try_into().unwrap());
        match tag {
            DFD_TAG_COLOR_MODEL => {
                format = Some(
                    Format::from_code(value)
                        .ok_or(ContainerError::CorruptFile("unknown format code"))?,
                );
            }
            DFD_TAG_TRANSFER => {
                transfer = Some(
                    TransferFunction::from_code(value)
                        .ok_or(ContainerError::CorruptFile("unknown transfer function"))?,
                );
            }
            DFD_TAG_FLAGS => flags = value,
            // Unknown tags are ignored for forward compatibility.
            _ => {}
        }
    }

    let format = format.ok_or(ContainerError::CorruptFile(
        "format descriptor lacks a color model",
    ))?;
    let transfer = transfer.ok_or(ContainerError::CorruptFile(
        "format descriptor lacks a transfer function",
    ))?;
    Ok((format, transfer, flags & DFD_FLAG_PREMULTIPLIED != 0))
}

/// Parses the key/value block.
fn parse_kvd(block: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut entries = BTreeMap::new();
    let mut cursor = 0usize;
    while cursor < block.len() {
        if block.len() - cursor < 4 {
            return Err(ContainerError::CorruptFile("dangling metadata length"));
        }
        let entry_len =
            u32::from_le_bytes(block[cursor..cursor + 4].try_into().unwrap()) as usize;
        cursor += 4;
        if entry_len == 0 || block.len() - cursor < entry_len {
            return Err(ContainerError::CorruptFile("metadata entry out of bounds"));
        }

        let entry = &block[cursor..cursor + entry_len];
        let separator = entry
            .iter()
            .position(|&b| b == 0)
            .ok_or(ContainerError::CorruptFile("metadata entry lacks a key"))?;
        let key = core::str::from_utf8(&entry[..separator])
            .map_err(|_| ContainerError::CorruptFile("metadata key is not UTF-8"))?;
        if key.is_empty() {
            return Err(ContainerError::CorruptFile("metadata key is empty"));
        }
        entries.insert(String::from(key), entry[separator + 1..].to_vec());

        cursor += align_up(entry_len, 4);
    }
    Ok(entries)
}
