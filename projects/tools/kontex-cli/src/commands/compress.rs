//! `kontex compress`: encode an RGBA8 container, optionally supercompress.

use crate::error::CliResult;
use crate::util::{parse_format, parse_scheme};
use argh::FromArgs;
use bytesize::ByteSize;
use kontex_api::{
    ops, read_container_from_file, write_container_to_file, CodecBundle, Format,
    SupercompressionScheme,
};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Compress an RGBA8 container into a block format (bc1/bc3/bc4/bc5) or the
/// universal transcodable encoding, optionally supercompressing the result.
#[argh(subcommand, name = "compress")]
pub struct CompressCmd {
    /// input container file (must hold RGBA8 data)
    #[argh(positional)]
    pub input: PathBuf,

    /// output container file
    #[argh(positional)]
    pub output: PathBuf,

    /// target encoding: bc1, bc3, bc4, bc5 or universal
    #[argh(option, from_str_fn(parse_format))]
    pub format: Format,

    /// quality/speed trade-off, 0-255 (default 128)
    #[argh(option, default = "128")]
    pub quality: u8,

    /// supercompression scheme to apply afterwards: zstd or zlib
    #[argh(option, from_str_fn(parse_scheme))]
    pub scheme: Option<SupercompressionScheme>,

    /// supercompression level (default: 3 for zstd, 6 for zlib)
    #[argh(option)]
    pub level: Option<i32>,
}

pub fn run(cmd: CompressCmd) -> CliResult<()> {
    let bundle = CodecBundle::standard();
    let mut container = read_container_from_file(&cmd.input, true)?;
    let input_size = container.data_size();

    if cmd.format == Format::Universal {
        ops::compress_universal(&mut container, &bundle, cmd.quality)?;
    } else {
        ops::compress_block(&mut container, &bundle, cmd.format, cmd.quality)?;
    }
    let encoded_size = container.data_size();

    if let Some(scheme) = cmd.scheme {
        let level = cmd.level.unwrap_or(match scheme {
            SupercompressionScheme::Zlib => 6,
            _ => 3,
        });
        ops::deflate(&mut container, &bundle, scheme, level)?;
    }

    write_container_to_file(&container, &cmd.output)?;
    println!(
        "{} -> {}: {} raw, {} encoded, {} stored",
        cmd.input.display(),
        cmd.output.display(),
        ByteSize::b(input_size as u64),
        ByteSize::b(encoded_size as u64),
        ByteSize::b(container.data_size() as u64)
    );
    Ok(())
}
