//! `decode OUTPUT CHUNK..` — reads as many of the given chunks as are
//! needed to reconstruct the original file, and writes it to `OUTPUT`
//! (or stdout, if `OUTPUT` is `-`).

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cpf::error::Error;

/// Decode Cauchy prime field chunks back into the original file.
#[derive(Parser)]
#[command(name = "decode", version, about)]
struct Args {
    /// Destination path, or `-` for stdout.
    output: String,

    /// Candidate chunk paths; any `K` admissible ones are enough.
    #[arg(required = true, num_args = 1..)]
    chunks: Vec<PathBuf>,
}

fn run(args: Args) -> Result<(), Error> {
    let mut readers = Vec::with_capacity(args.chunks.len());
    for path in &args.chunks {
        readers.push(fs::File::open(path)?);
    }

    let mut output: Box<dyn Write> = if args.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&args.output)?)
    };

    cpf::driver::decode(&mut readers, &mut output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
