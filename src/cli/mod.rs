//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod report;

pub use args::{Arguments, Command, ExtractCommand};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Extract(cmd)) => {
            let summary = commands::extract(cmd)?;
            report::print_extract_summary(&summary);
            Ok(ExitStatus::Success)
        }
        Some(Command::Init) => commands::init(),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}
