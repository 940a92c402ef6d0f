//! The in-memory texture container.

use crate::descriptor::FormatDescriptor;
use crate::error::{ContainerError, Result};
use crate::format::{self, Format, TransferFunction};
use crate::scheme::SupercompressionScheme;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

/// Storage allocation policy for [`Container::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocateStorage {
    /// Allocate zero-filled level storage; callers may then store pixel data.
    Allocate,
    /// Headers only. Operations that need pixel data fail with
    /// [`ContainerError::DataNotLoaded`] until data is loaded.
    NoStorage,
}

/// Construction parameters for [`Container::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateInfo {
    /// Base level width in pixels.
    pub width: u32,
    /// Base level height in pixels.
    pub height: u32,
    /// Pixel depth. Only 1 (2D textures) is supported.
    pub depth: u32,
    /// Number of mip levels, including the base level.
    pub level_count: u32,
    /// Number of array layers.
    pub layer_count: u32,
    /// Number of faces: 1, or 6 for cubemaps.
    pub face_count: u32,
    /// Encoding of the stored data.
    pub format: Format,
    /// Transfer function of the encoded channel values.
    pub transfer: TransferFunction,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied_alpha: bool,
}

impl CreateInfo {
    /// Parameters for a plain 2D texture: one level, one layer, one face,
    /// linear transfer.
    pub fn texture_2d(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            depth: 1,
            level_count: 1,
            layer_count: 1,
            face_count: 1,
            format,
            transfer: TransferFunction::Linear,
            premultiplied_alpha: false,
        }
    }
}

/// Data of a single mip level: all (layer, face) planes concatenated, or one
/// compressed stream when a supercompression scheme is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelData {
    data: Vec<u8>,
    /// `Some` iff the owning container is supercompressed.
    uncompressed_len: Option<u64>,
}

impl LevelData {
    /// Wraps an uncompressed level blob.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            uncompressed_len: None,
        }
    }

    /// Wraps a supercompressed level stream and its original length.
    pub fn supercompressed(data: Vec<u8>, uncompressed_len: u64) -> Self {
        Self {
            data,
            uncompressed_len: Some(uncompressed_len),
        }
    }

    /// Stored bytes (compressed when a scheme is active).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the stored bytes.
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// Length the data had (or would have) before supercompression.
    ///
    /// Equals [`Self::byte_length`] when no scheme is active.
    pub fn uncompressed_byte_length(&self) -> u64 {
        self.uncompressed_len.unwrap_or(self.data.len() as u64)
    }

    /// True when this level holds a supercompressed stream.
    pub fn is_supercompressed(&self) -> bool {
        self.uncompressed_len.is_some()
    }
}

/// In-memory representation of a multi-level, multi-layer texture.
///
/// Level count, layer count and face count are fixed at creation and
/// consistent across all levels. A container is a mutable value owned by one
/// caller context at a time; it is not internally synchronized. The commit
/// methods ([`Self::replace_levels`], [`Self::apply_supercompression`],
/// [`Self::clear_supercompression`]) swap in fully built level data and
/// update the format descriptor and scheme tag in the same call, so a failed
/// operation never leaves a mixed-format container behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    width: u32,
    height: u32,
    depth: u32,
    level_count: u32,
    layer_count: u32,
    face_count: u32,
    descriptor: FormatDescriptor,
    scheme: SupercompressionScheme,
    levels: Option<Vec<LevelData>>,
    key_values: BTreeMap<String, Vec<u8>>,
}

impl Container {
    /// Creates a container with the declared geometry and format.
    ///
    /// With [`AllocateStorage::Allocate`] every level is allocated zero
    /// filled, sized for the declared format; with
    /// [`AllocateStorage::NoStorage`] the container carries headers only.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidParameter`] when dimensions or counts are
    /// zero, the depth is not 1, the face count is not 1 or 6, a cubemap is
    /// not square, or the level count exceeds the mip chain of the base
    /// dimensions.
    pub fn create(info: &CreateInfo, storage: AllocateStorage) -> Result<Self> {
        validate_create(info)?;

        let mut container = Self {
            width: info.width,
            height: info.height,
            depth: info.depth,
            level_count: info.level_count,
            layer_count: info.layer_count,
            face_count: info.face_count,
            descriptor: FormatDescriptor::new(info.format, info.transfer, info.premultiplied_alpha),
            scheme: SupercompressionScheme::None,
            levels: None,
            key_values: BTreeMap::new(),
        };

        if storage == AllocateStorage::Allocate {
            let levels = (0..info.level_count)
                .map(|level| LevelData::new(vec![0u8; container.level_byte_length(level)]))
                .collect();
            container.levels = Some(levels);
        }

        Ok(container)
    }

    /// Reassembles a container from deserialized parts.
    ///
    /// Used by the codec; runs the same geometry validation as
    /// [`Self::create`] and checks the level data against the declared
    /// scheme: uncompressed levels must match the format's exact byte
    /// length, supercompressed levels must carry their original length.
    pub fn from_parts(
        info: &CreateInfo,
        scheme: SupercompressionScheme,
        levels: Option<Vec<LevelData>>,
        key_values: BTreeMap<String, Vec<u8>>,
    ) -> Result<Self> {
        validate_create(info)?;

        let container = Self {
            width: info.width,
            height: info.height,
            depth: info.depth,
            level_count: info.level_count,
            layer_count: info.layer_count,
            face_count: info.face_count,
            descriptor: FormatDescriptor::new(info.format, info.transfer, info.premultiplied_alpha),
            scheme,
            levels,
            key_values,
        };

        if let Some(levels) = container.levels.as_ref() {
            if levels.len() != container.level_count as usize {
                return Err(ContainerError::InvalidParameter(
                    "level data count does not match the declared level count",
                ));
            }
            for (index, level) in levels.iter().enumerate() {
                let active = scheme != SupercompressionScheme::None;
                if level.is_supercompressed() != active {
                    return Err(ContainerError::InvalidParameter(
                        "level data does not match the declared supercompression scheme",
                    ));
                }
                if !active && level.byte_length() != container.level_byte_length(index as u32) {
                    return Err(ContainerError::InvalidParameter(
                        "level data length does not match the declared format",
                    ));
                }
            }
        }

        Ok(container)
    }

    /// Base level width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Base level height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel depth (always 1 for the supported 2D textures).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of mip levels.
    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    /// Number of array layers.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Number of faces (1, or 6 for cubemaps).
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    /// Encoding of the stored data.
    pub fn format(&self) -> Format {
        self.descriptor.format
    }

    /// Transfer function of the encoded channel values.
    pub fn transfer_function(&self) -> TransferFunction {
        self.descriptor.transfer
    }

    /// Whether color channels are premultiplied by alpha.
    pub fn premultiplied_alpha(&self) -> bool {
        self.descriptor.premultiplied_alpha
    }

    /// The format descriptor block.
    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    /// vkFormat-equivalent value for the current format (zero for universal).
    pub fn vk_format(&self) -> u32 {
        self.descriptor.format.vk_format(self.descriptor.transfer)
    }

    /// Active supercompression scheme.
    pub fn supercompression_scheme(&self) -> SupercompressionScheme {
        self.scheme
    }

    /// True when a supercompression scheme is active.
    pub fn is_supercompressed(&self) -> bool {
        self.scheme != SupercompressionScheme::None
    }

    /// True iff the stored data requires transcoding before GPU consumption.
    pub fn needs_transcoding(&self) -> bool {
        self.descriptor.format.is_universal()
    }

    /// True when level storage is present (allocated or loaded).
    pub fn has_data(&self) -> bool {
        self.levels.is_some()
    }

    /// Dimensions of the given mip level, clamped to 1.
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        (
            format::level_extent(self.width, level),
            format::level_extent(self.height, level),
        )
    }

    /// Number of image planes per level (layers x faces).
    pub fn plane_count(&self) -> usize {
        self.layer_count as usize * self.face_count as usize
    }

    /// Byte length of a single image plane at the given level, per the
    /// current format.
    pub fn plane_byte_length(&self, level: u32) -> usize {
        let (width, height) = self.level_dimensions(level);
        self.descriptor.format.plane_byte_length(width, height)
    }

    /// Uncompressed byte length of an entire level (all planes).
    pub fn level_byte_length(&self, level: u32) -> usize {
        self.plane_byte_length(level) * self.plane_count()
    }

    /// All level data, when present.
    pub fn levels(&self) -> Option<&[LevelData]> {
        self.levels.as_deref()
    }

    /// Data of one mip level.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DataNotLoaded`] without level storage,
    /// [`ContainerError::InvalidParameter`] for an out-of-range level.
    pub fn level(&self, level: u32) -> Result<&LevelData> {
        let levels = self.levels.as_ref().ok_or(ContainerError::DataNotLoaded)?;
        levels
            .get(level as usize)
            .ok_or(ContainerError::InvalidParameter("level index out of range"))
    }

    /// Total size of the stored level data in bytes (zero when unloaded).
    pub fn data_size(&self) -> usize {
        self.levels
            .as_ref()
            .map(|levels| levels.iter().map(LevelData::byte_length).sum())
            .unwrap_or(0)
    }

    /// Byte offset of one image plane within its level's data blob.
    ///
    /// Planes are stored in `layer * face_count + face` order.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidParameter`] for out-of-range indices,
    /// [`ContainerError::InvalidOperation`] while supercompressed (plane
    /// boundaries do not exist inside a compressed stream).
    pub fn image_offset(&self, level: u32, layer: u32, face: u32) -> Result<usize> {
        if self.is_supercompressed() {
            return Err(ContainerError::InvalidOperation(
                "image planes are not addressable while supercompressed",
            ));
        }
        self.check_image_index(level, layer, face)?;
        let plane = (layer * self.face_count + face) as usize;
        Ok(plane * self.plane_byte_length(level))
    }

    /// Data of one image plane.
    pub fn image_data(&self, level: u32, layer: u32, face: u32) -> Result<&[u8]> {
        let offset = self.image_offset(level, layer, face)?;
        let length = self.plane_byte_length(level);
        let data = self.level(level)?.data();
        Ok(&data[offset..offset + length])
    }

    /// Stores one image plane into allocated level storage.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DataNotLoaded`] if storage was never allocated,
    /// [`ContainerError::InvalidOperation`] while supercompressed,
    /// [`ContainerError::InvalidParameter`] on index or size mismatch.
    pub fn set_image_from_memory(
        &mut self,
        level: u32,
        layer: u32,
        face: u32,
        pixels: &[u8],
    ) -> Result<()> {
        let offset = self.image_offset(level, layer, face)?;
        let length = self.plane_byte_length(level);
        if pixels.len() != length {
            return Err(ContainerError::InvalidParameter(
                "image data length does not match the plane size",
            ));
        }
        let levels = self.levels.as_mut().ok_or(ContainerError::DataNotLoaded)?;
        levels[level as usize].data[offset..offset + length].copy_from_slice(pixels);
        Ok(())
    }

    /// Attaches one key/value metadata pair, replacing any previous value.
    ///
    /// Keys must be non-empty and free of NUL bytes (the serialized form is
    /// NUL-separated).
    pub fn set_key_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if key.is_empty() || key.as_bytes().contains(&0) {
            return Err(ContainerError::InvalidParameter(
                "metadata keys must be non-empty and free of NUL bytes",
            ));
        }
        self.key_values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    /// Value stored under `key`, if any.
    pub fn key_value(&self, key: &str) -> Option<&[u8]> {
        self.key_values.get(key).map(Vec::as_slice)
    }

    /// All key/value metadata pairs, ordered by key.
    pub fn key_values(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.key_values
    }

    /// Commits re-encoded level data, updating the format tag in the same
    /// step.
    ///
    /// `new_levels` holds one uncompressed blob per level, sized for
    /// `format`. On success the supercompression scheme is `None` (encoded
    /// data replaces whatever was stored before). On error the container is
    /// unchanged.
    pub fn replace_levels(&mut self, format: Format, new_levels: Vec<Vec<u8>>) -> Result<()> {
        if !self.has_data() {
            return Err(ContainerError::DataNotLoaded);
        }
        if new_levels.len() != self.level_count as usize {
            return Err(ContainerError::InvalidParameter(
                "encoded level count does not match the container",
            ));
        }
        for (index, blob) in new_levels.iter().enumerate() {
            let (width, height) = self.level_dimensions(index as u32);
            let expected = format.plane_byte_length(width, height) * self.plane_count();
            if blob.len() != expected {
                return Err(ContainerError::InvalidParameter(
                    "encoded level data has the wrong length for the target format",
                ));
            }
        }

        self.levels = Some(new_levels.into_iter().map(LevelData::new).collect());
        self.descriptor.format = format;
        self.scheme = SupercompressionScheme::None;
        Ok(())
    }

    /// Commits supercompressed level streams and activates `scheme`.
    ///
    /// Original lengths are captured from the current levels. On error the
    /// container is unchanged.
    pub fn apply_supercompression(
        &mut self,
        scheme: SupercompressionScheme,
        compressed: Vec<Vec<u8>>,
    ) -> Result<()> {
        if scheme == SupercompressionScheme::None {
            return Err(ContainerError::InvalidParameter(
                "a concrete supercompression scheme is required",
            ));
        }
        if self.is_supercompressed() {
            return Err(ContainerError::AlreadySupercompressed(self.scheme));
        }
        let levels = self.levels.as_ref().ok_or(ContainerError::DataNotLoaded)?;
        if compressed.len() != levels.len() {
            return Err(ContainerError::InvalidParameter(
                "compressed level count does not match the container",
            ));
        }

        let originals: Vec<u64> = levels.iter().map(|l| l.byte_length() as u64).collect();
        self.levels = Some(
            compressed
                .into_iter()
                .zip(originals)
                .map(|(data, len)| LevelData::supercompressed(data, len))
                .collect(),
        );
        self.scheme = scheme;
        Ok(())
    }

    /// Commits inflated level data and clears the scheme tag.
    ///
    /// Each blob must match the recorded uncompressed length of its level.
    /// On error the container is unchanged.
    pub fn clear_supercompression(&mut self, inflated: Vec<Vec<u8>>) -> Result<()> {
        if !self.is_supercompressed() {
            return Err(ContainerError::InvalidOperation(
                "container is not supercompressed",
            ));
        }
        let levels = self.levels.as_ref().ok_or(ContainerError::DataNotLoaded)?;
        if inflated.len() != levels.len() {
            return Err(ContainerError::InvalidParameter(
                "inflated level count does not match the container",
            ));
        }
        for (blob, level) in inflated.iter().zip(levels.iter()) {
            if blob.len() as u64 != level.uncompressed_byte_length() {
                return Err(ContainerError::InvalidParameter(
                    "inflated level data does not match the recorded length",
                ));
            }
        }

        self.levels = Some(inflated.into_iter().map(LevelData::new).collect());
        self.scheme = SupercompressionScheme::None;
        Ok(())
    }

    fn check_image_index(&self, level: u32, layer: u32, face: u32) -> Result<()> {
        if level >= self.level_count || layer >= self.layer_count || face >= self.face_count {
            return Err(ContainerError::InvalidParameter(
                "image index out of range",
            ));
        }
        Ok(())
    }
}

fn validate_create(info: &CreateInfo) -> Result<()> {
    if info.width == 0 || info.height == 0 {
        return Err(ContainerError::InvalidParameter("dimensions must be non-zero"));
    }
    if info.depth != 1 {
        return Err(ContainerError::InvalidParameter(
            "only 2D textures (depth 1) are supported",
        ));
    }
    if info.level_count == 0 || info.layer_count == 0 || info.face_count == 0 {
        return Err(ContainerError::InvalidParameter(
            "level, layer and face counts must be non-zero",
        ));
    }
    if info.face_count != 1 && info.face_count != 6 {
        return Err(ContainerError::InvalidParameter(
            "face count must be 1, or 6 for cubemaps",
        ));
    }
    if info.face_count == 6 && info.width != info.height {
        return Err(ContainerError::InvalidParameter(
            "cubemap faces must be square",
        ));
    }
    if info.level_count > format::max_level_count(info.width, info.height) {
        return Err(ContainerError::InvalidParameter(
            "level count exceeds the mip chain of the base dimensions",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rgba_info(width: u32, height: u32) -> CreateInfo {
        CreateInfo::texture_2d(width, height, Format::Rgba8)
    }

    #[rstest]
    #[case(CreateInfo { width: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { height: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { depth: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { depth: 2, ..rgba_info(4, 4) })]
    #[case(CreateInfo { level_count: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { layer_count: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { face_count: 0, ..rgba_info(4, 4) })]
    #[case(CreateInfo { face_count: 2, ..rgba_info(4, 4) })]
    #[case(CreateInfo { face_count: 6, ..rgba_info(8, 4) })]
    #[case(CreateInfo { level_count: 4, ..rgba_info(4, 4) })]
    fn create_rejects_invalid_parameters(#[case] info: CreateInfo) {
        let result = Container::create(&info, AllocateStorage::Allocate);
        assert!(matches!(result, Err(ContainerError::InvalidParameter(_))));
    }

    #[test]
    fn create_allocates_zeroed_storage() {
        let info = CreateInfo {
            level_count: 3,
            ..rgba_info(16, 16)
        };
        let container = Container::create(&info, AllocateStorage::Allocate).unwrap();

        assert!(container.has_data());
        // 16x16x4 + 8x8x4 + 4x4x4
        assert_eq!(container.data_size(), 1024 + 256 + 64);
        assert!(container.image_data(2, 0, 0).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn create_without_storage_reports_data_not_loaded() {
        let container =
            Container::create(&rgba_info(4, 4), AllocateStorage::NoStorage).unwrap();

        assert!(!container.has_data());
        assert_eq!(container.data_size(), 0);
        assert_eq!(
            container.image_data(0, 0, 0),
            Err(ContainerError::DataNotLoaded)
        );
    }

    #[test]
    fn image_offset_orders_planes_layer_major() {
        let info = CreateInfo {
            layer_count: 2,
            face_count: 6,
            ..rgba_info(8, 8)
        };
        let container = Container::create(&info, AllocateStorage::Allocate).unwrap();

        let plane = container.plane_byte_length(0);
        assert_eq!(container.image_offset(0, 0, 0).unwrap(), 0);
        assert_eq!(container.image_offset(0, 0, 5).unwrap(), 5 * plane);
        assert_eq!(container.image_offset(0, 1, 0).unwrap(), 6 * plane);
        assert_eq!(container.image_offset(0, 1, 5).unwrap(), 11 * plane);
    }

    #[test]
    fn set_image_round_trips_through_accessor() {
        let mut container =
            Container::create(&rgba_info(4, 4), AllocateStorage::Allocate).unwrap();
        let pixels: Vec<u8> = (0..64).collect();

        container.set_image_from_memory(0, 0, 0, &pixels).unwrap();
        assert_eq!(container.image_data(0, 0, 0).unwrap(), pixels.as_slice());
    }

    #[test]
    fn set_image_rejects_wrong_length() {
        let mut container =
            Container::create(&rgba_info(4, 4), AllocateStorage::Allocate).unwrap();
        assert!(matches!(
            container.set_image_from_memory(0, 0, 0, &[0u8; 3]),
            Err(ContainerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn key_values_round_trip_and_validate() {
        let mut container =
            Container::create(&rgba_info(4, 4), AllocateStorage::NoStorage).unwrap();

        container.set_key_value("KTXorientation", b"rd").unwrap();
        assert_eq!(container.key_value("KTXorientation"), Some(&b"rd"[..]));
        assert_eq!(container.key_value("missing"), None);

        assert!(container.set_key_value("", b"x").is_err());
        assert!(container.set_key_value("bad\0key", b"x").is_err());
    }

    #[test]
    fn replace_levels_swaps_format_atomically() {
        let mut container =
            Container::create(&rgba_info(8, 8), AllocateStorage::Allocate).unwrap();

        // Wrong length for BC1: nothing must change.
        let before = container.clone();
        let result = container.replace_levels(Format::Bc1, vec![vec![0u8; 7]]);
        assert!(matches!(result, Err(ContainerError::InvalidParameter(_))));
        assert_eq!(container, before);

        // 8x8 BC1 is 2x2 blocks x 8 bytes.
        container
            .replace_levels(Format::Bc1, vec![vec![0u8; 32]])
            .unwrap();
        assert_eq!(container.format(), Format::Bc1);
        assert_eq!(container.descriptor().format, Format::Bc1);
    }

    #[test]
    fn supercompression_state_machine() {
        let mut container =
            Container::create(&rgba_info(4, 4), AllocateStorage::Allocate).unwrap();

        container
            .apply_supercompression(SupercompressionScheme::Zstd, vec![vec![1, 2, 3]])
            .unwrap();
        assert!(container.is_supercompressed());
        assert_eq!(container.level(0).unwrap().uncompressed_byte_length(), 64);
        assert_eq!(container.level(0).unwrap().byte_length(), 3);

        // Second application must fail and leave the container unchanged.
        let before = container.clone();
        let result =
            container.apply_supercompression(SupercompressionScheme::Zlib, vec![vec![0]]);
        assert_eq!(
            result,
            Err(ContainerError::AlreadySupercompressed(
                SupercompressionScheme::Zstd
            ))
        );
        assert_eq!(container, before);

        // Plane access is not possible while supercompressed.
        assert!(matches!(
            container.image_data(0, 0, 0),
            Err(ContainerError::InvalidOperation(_))
        ));

        container.clear_supercompression(vec![vec![0u8; 64]]).unwrap();
        assert!(!container.is_supercompressed());
        assert_eq!(container.level(0).unwrap().byte_length(), 64);
    }

    #[test]
    fn clear_supercompression_checks_recorded_length() {
        let mut container =
            Container::create(&rgba_info(4, 4), AllocateStorage::Allocate).unwrap();
        container
            .apply_supercompression(SupercompressionScheme::Zlib, vec![vec![9; 5]])
            .unwrap();

        let result = container.clear_supercompression(vec![vec![0u8; 63]]);
        assert!(matches!(result, Err(ContainerError::InvalidParameter(_))));
        assert!(container.is_supercompressed());
    }
}
