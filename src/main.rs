use std::process::ExitCode;

use clap::Parser;
use doclift::cli::{Arguments, ExitStatus};
use env_logger::{Builder, Env, Target};

fn main() -> ExitCode {
    let args = Arguments::parse();

    let default_filter = if args.verbose() { "debug" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(Target::Stderr)
        .init();

    match doclift::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
