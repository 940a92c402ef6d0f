//! Self-describing format metadata attached to a container.

use crate::format::{ChannelSemantic, Format, TransferFunction};

/// Metadata block describing the encoding of the stored data.
///
/// The format tag is updated atomically with the level data by the
/// container's commit methods, so a reader never observes a stale tag
/// against new bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Encoding of the stored level data.
    pub format: Format,
    /// Transfer function of the encoded channel values.
    pub transfer: TransferFunction,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied_alpha: bool,
}

impl FormatDescriptor {
    /// Creates a descriptor for the given encoding.
    pub fn new(format: Format, transfer: TransferFunction, premultiplied_alpha: bool) -> Self {
        Self {
            format,
            transfer,
            premultiplied_alpha,
        }
    }

    /// Channel semantics of a decoded texel; a pure projection of the format tag.
    pub fn channels(&self) -> &'static [ChannelSemantic] {
        self.format.channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_follow_format_tag() {
        let mut descriptor =
            FormatDescriptor::new(Format::Rgba8, TransferFunction::Linear, false);
        assert_eq!(descriptor.channels().len(), 4);

        descriptor.format = Format::Bc4;
        assert_eq!(descriptor.channels(), &[ChannelSemantic::Red]);
    }
}
