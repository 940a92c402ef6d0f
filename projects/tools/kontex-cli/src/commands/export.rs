//! `kontex export`: rasterize one image plane back to a PNG.

use crate::error::{CliError, CliResult};
use argh::FromArgs;
use image::RgbaImage;
use kontex_api::{ops, read_container_from_file, CodecBundle, Format, TranscodeFlags};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Export one image plane of a container to a PNG file, decoding block or
/// universal data on the way.
#[argh(subcommand, name = "export")]
pub struct ExportCmd {
    /// input container file
    #[argh(positional)]
    pub input: PathBuf,

    /// output image file
    #[argh(positional)]
    pub output: PathBuf,

    /// mip level to export (default 0)
    #[argh(option, default = "0")]
    pub level: u32,

    /// array layer to export (default 0)
    #[argh(option, default = "0")]
    pub layer: u32,

    /// face to export (default 0)
    #[argh(option, default = "0")]
    pub face: u32,
}

pub fn run(cmd: ExportCmd) -> CliResult<()> {
    let mut container = read_container_from_file(&cmd.input, true)?;
    if container.is_supercompressed() {
        ops::inflate(&mut container, &CodecBundle::standard())?;
    }

    let (width, height) = container.level_dimensions(cmd.level);
    let data = container.image_data(cmd.level, cmd.layer, cmd.face)?;

    let pixels = match container.format() {
        Format::Rgba8 => data.to_vec(),
        Format::Universal => {
            kontex_universal::transcode::decode_plane(data, width, height, TranscodeFlags::NONE)?
        }
        format => kontex_bcn::decode_plane(format, data, width, height)?,
    };

    let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        CliError::Usage("decoded plane does not match the level dimensions".into())
    })?;
    image.save(&cmd.output)?;

    println!(
        "exported level {} layer {} face {} ({width}x{height}) -> {}",
        cmd.level,
        cmd.layer,
        cmd.face,
        cmd.output.display()
    );
    Ok(())
}
