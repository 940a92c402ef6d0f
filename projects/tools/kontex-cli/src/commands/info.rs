//! `kontex info`: print container structure.

use crate::error::CliResult;
use argh::FromArgs;
use bytesize::ByteSize;
use kontex_api::read_container_from_file;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Print the header, format descriptor, level index and metadata of a
/// container file.
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// input container file
    #[argh(positional)]
    pub input: PathBuf,
}

pub fn run(cmd: InfoCmd) -> CliResult<()> {
    let container = read_container_from_file(&cmd.input, true)?;

    println!("{}", cmd.input.display());
    println!(
        "  dimensions:       {}x{}x{}",
        container.width(),
        container.height(),
        container.depth()
    );
    println!("  levels:           {}", container.level_count());
    println!("  layers:           {}", container.layer_count());
    println!("  faces:            {}", container.face_count());
    println!(
        "  format:           {} (vkFormat {})",
        container.format().name(),
        container.vk_format()
    );
    println!("  transfer:         {:?}", container.transfer_function());
    println!("  premultiplied:    {}", container.premultiplied_alpha());
    println!("  needs transcode:  {}", container.needs_transcoding());
    println!(
        "  supercompression: {}",
        container.supercompression_scheme().name()
    );
    println!(
        "  data size:        {}",
        ByteSize::b(container.data_size() as u64)
    );

    println!("  level index:");
    for level in 0..container.level_count() {
        let data = container.level(level)?;
        let (width, height) = container.level_dimensions(level);
        println!(
            "    level {level}: {width}x{height}, stored {}, uncompressed {}",
            ByteSize::b(data.byte_length() as u64),
            ByteSize::b(data.uncompressed_byte_length())
        );
    }

    if !container.key_values().is_empty() {
        println!("  metadata:");
        for (key, value) in container.key_values() {
            match std::str::from_utf8(value) {
                Ok(text) => println!("    {key}: {text}"),
                Err(_) => println!("    {key}: {} binary bytes", value.len()),
            }
        }
    }

    Ok(())
}
