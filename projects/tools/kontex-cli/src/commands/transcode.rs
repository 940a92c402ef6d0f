//! `kontex transcode`: universal data into a GPU-ready format.

use crate::error::CliResult;
use crate::util::parse_format;
use argh::FromArgs;
use kontex_api::{
    ops, read_container_from_file, write_container_to_file, CodecBundle, Format, TranscodeFlags,
};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Transcode a universal-format container into a concrete format
/// (bc1, bc3 or rgba8). Supercompressed input is decompressed on the fly.
#[argh(subcommand, name = "transcode")]
pub struct TranscodeCmd {
    /// input container file (must hold universal data)
    #[argh(positional)]
    pub input: PathBuf,

    /// output container file
    #[argh(positional)]
    pub output: PathBuf,

    /// target format: bc1, bc3 or rgba8
    #[argh(option, from_str_fn(parse_format))]
    pub target: Format,

    /// re-derive selectors against the quantized endpoints
    #[argh(switch)]
    pub high_quality: bool,

    /// swap the red and blue channels
    #[argh(switch)]
    pub swizzle_bgr: bool,

    /// force the alpha channel fully opaque
    #[argh(switch)]
    pub opaque_alpha: bool,
}

pub fn run(cmd: TranscodeCmd) -> CliResult<()> {
    let bundle = CodecBundle::standard();
    let mut container = read_container_from_file(&cmd.input, true)?;

    let mut flags = TranscodeFlags::NONE;
    if cmd.high_quality {
        flags = flags | TranscodeFlags::HIGH_QUALITY;
    }
    if cmd.swizzle_bgr {
        flags = flags | TranscodeFlags::SWIZZLE_BGR;
    }
    if cmd.opaque_alpha {
        flags = flags | TranscodeFlags::OPAQUE_ALPHA;
    }

    ops::transcode(&mut container, &bundle, cmd.target, flags)?;
    write_container_to_file(&container, &cmd.output)?;

    println!(
        "{} -> {} ({})",
        cmd.input.display(),
        cmd.output.display(),
        cmd.target.name()
    );
    Ok(())
}
