//! `kontex import`: rasterize an image file into an RGBA8 container.

use crate::error::CliResult;
use argh::FromArgs;
use image::imageops::FilterType;
use kontex_api::{
    write_container_to_file, AllocateStorage, Container, CreateInfo, Format, TransferFunction,
};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Import a PNG/JPEG image as an uncompressed RGBA8 container.
#[argh(subcommand, name = "import")]
pub struct ImportCmd {
    /// input image file (any format the image crate decodes)
    #[argh(positional)]
    pub input: PathBuf,

    /// output container file
    #[argh(positional)]
    pub output: PathBuf,

    /// number of mip levels to generate, including the base level (default 1)
    #[argh(option, default = "1")]
    pub levels: u32,

    /// mark the data as sRGB encoded
    #[argh(switch)]
    pub srgb: bool,

    /// mark the color channels as premultiplied by alpha
    #[argh(switch)]
    pub premultiplied: bool,
}

pub fn run(cmd: ImportCmd) -> CliResult<()> {
    let base = image::open(&cmd.input)?.to_rgba8();
    let (width, height) = (base.width(), base.height());

    let info = CreateInfo {
        level_count: cmd.levels,
        transfer: if cmd.srgb {
            TransferFunction::Srgb
        } else {
            TransferFunction::Linear
        },
        premultiplied_alpha: cmd.premultiplied,
        ..CreateInfo::texture_2d(width, height, Format::Rgba8)
    };
    let mut container = Container::create(&info, AllocateStorage::Allocate)?;

    container.set_image_from_memory(0, 0, 0, base.as_raw())?;
    for level in 1..cmd.levels {
        let (level_width, level_height) = container.level_dimensions(level);
        let resized = image::imageops::resize(&base, level_width, level_height, FilterType::Triangle);
        container.set_image_from_memory(level, 0, 0, resized.as_raw())?;
    }

    write_container_to_file(&container, &cmd.output)?;
    println!(
        "imported {} ({width}x{height}, {} levels) -> {}",
        cmd.input.display(),
        cmd.levels,
        cmd.output.display()
    );
    Ok(())
}
