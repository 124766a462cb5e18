use clap::Parser;
use sortdir::cli::{Args, run_cli};
use sortdir::logging::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    ExitCode::from(run_cli(&args))
}
