// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, hand off to `cli::run`.
// - Errors bubble up as `anyhow::Error`, which prints the chain to stderr and
//   exits non-zero.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use secureshare_cli::{cli, ui};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();
    ui::init_logging();

    let code = cli::run(&args, &mut io::stdout().lock())?;
    Ok(ExitCode::from(code))
}
