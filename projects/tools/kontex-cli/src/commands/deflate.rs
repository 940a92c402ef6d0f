//! `kontex deflate` / `kontex inflate`: supercompression of stored data.

use crate::error::CliResult;
use crate::util::parse_scheme;
use argh::FromArgs;
use bytesize::ByteSize;
use kontex_api::{
    ops, read_container_from_file, write_container_to_file, CodecBundle, SupercompressionScheme,
};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Supercompress the level data of a container with zstd (levels 1-22) or
/// zlib (levels 1-9).
#[argh(subcommand, name = "deflate")]
pub struct DeflateCmd {
    /// input container file
    #[argh(positional)]
    pub input: PathBuf,

    /// output container file
    #[argh(positional)]
    pub output: PathBuf,

    /// supercompression scheme: zstd or zlib
    #[argh(option, from_str_fn(parse_scheme))]
    pub scheme: SupercompressionScheme,

    /// compression level (default: 3 for zstd, 6 for zlib)
    #[argh(option)]
    pub level: Option<i32>,
}

#[derive(FromArgs, Debug)]
/// Remove the supercompression of a container, restoring plain level data.
#[argh(subcommand, name = "inflate")]
pub struct InflateCmd {
    /// input container file
    #[argh(positional)]
    pub input: PathBuf,

    /// output container file
    #[argh(positional)]
    pub output: PathBuf,
}

pub fn run(cmd: DeflateCmd) -> CliResult<()> {
    let bundle = CodecBundle::standard();
    let mut container = read_container_from_file(&cmd.input, true)?;
    let before = container.data_size();

    let level = cmd.level.unwrap_or(match cmd.scheme {
        SupercompressionScheme::Zlib => 6,
        _ => 3,
    });
    ops::deflate(&mut container, &bundle, cmd.scheme, level)?;

    write_container_to_file(&container, &cmd.output)?;
    println!(
        "{}: {} -> {} ({} level {level})",
        cmd.output.display(),
        ByteSize::b(before as u64),
        ByteSize::b(container.data_size() as u64),
        cmd.scheme.name()
    );
    Ok(())
}

pub fn run_inflate(cmd: InflateCmd) -> CliResult<()> {
    let bundle = CodecBundle::standard();
    let mut container = read_container_from_file(&cmd.input, true)?;
    let before = container.data_size();

    ops::inflate(&mut container, &bundle)?;

    write_container_to_file(&container, &cmd.output)?;
    println!(
        "{}: {} -> {}",
        cmd.output.display(),
        ByteSize::b(before as u64),
        ByteSize::b(container.data_size() as u64)
    );
    Ok(())
}
