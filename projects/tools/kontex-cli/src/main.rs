mod commands;
mod error;
mod util;

use argh::FromArgs;
use std::process::ExitCode;

#[derive(FromArgs, Debug)]
/// Texture container tool: import, compress, supercompress, transcode and
/// inspect KTEX files.
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Import(commands::import::ImportCmd),
    Export(commands::export::ExportCmd),
    Info(commands::info::InfoCmd),
    Compress(commands::compress::CompressCmd),
    Deflate(commands::deflate::DeflateCmd),
    Inflate(commands::deflate::InflateCmd),
    Transcode(commands::transcode::TranscodeCmd),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli: TopLevel = argh::from_env();
    let result = match cli.command {
        Commands::Import(cmd) => commands::import::run(cmd),
        Commands::Export(cmd) => commands::export::run(cmd),
        Commands::Info(cmd) => commands::info::run(cmd),
        Commands::Compress(cmd) => commands::compress::run(cmd),
        Commands::Deflate(cmd) => commands::deflate::run(cmd),
        Commands::Inflate(cmd) => commands::deflate::run_inflate(cmd),
        Commands::Transcode(cmd) => commands::transcode::run(cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
