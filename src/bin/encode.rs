//! `encode INPUT CHUNK_SIZE CHUNK.. ` — reads `INPUT`, splits it into the
//! number of data blocks that fit in `CHUNK_SIZE`-byte chunks, and writes
//! one coded chunk per output path given.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cpf::error::Error;

/// Encode a file into Cauchy prime field chunks.
#[derive(Parser)]
#[command(name = "encode", version, about)]
struct Args {
    /// Source file to encode.
    input: PathBuf,

    /// Byte size of each output chunk, header included.
    chunk_size: usize,

    /// Output chunk paths; at least as many as the computed block count.
    #[arg(required = true, num_args = 1..)]
    chunks: Vec<PathBuf>,
}

fn run(args: Args) -> Result<(), Error> {
    let data = fs::read(&args.input)?;
    if data.is_empty() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("\"{}\" is empty", args.input.display()),
        )));
    }

    let outcome = cpf::driver::encode(&data, args.chunk_size, args.chunks.len())?;
    log::info!("CPF({}, {})", args.chunks.len(), outcome.k);

    for (chunk, path) in outcome.chunks.iter().zip(&args.chunks) {
        let mut file = fs::File::create(path)?;
        chunk.write_to(&mut file)?;
    }
    Ok(())
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
