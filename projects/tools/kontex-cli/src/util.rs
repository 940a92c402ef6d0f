//! Argument parsing helpers shared by the subcommands.

use kontex_api::{Format, SupercompressionScheme};

/// Parses a format name as spelled by [`Format::name`].
pub fn parse_format(value: &str) -> Result<Format, String> {
    Format::all_values()
        .iter()
        .copied()
        .find(|format| format.name() == value.to_lowercase())
        .ok_or_else(|| {
            let names: Vec<&str> = Format::all_values()
                .iter()
                .map(|format| format.name())
                .collect();
            format!("unknown format '{value}'; valid formats are: {}", names.join(", "))
        })
}

/// Parses a supercompression scheme name (`zstd` or `zlib`).
pub fn parse_scheme(value: &str) -> Result<SupercompressionScheme, String> {
    match value.to_lowercase().as_str() {
        "zstd" => Ok(SupercompressionScheme::Zstd),
        "zlib" => Ok(SupercompressionScheme::Zlib),
        _ => Err(format!(
            "unknown scheme '{value}'; valid schemes are: zstd, zlib"
        )),
    }
}
