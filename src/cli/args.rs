//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract documentation entities from JavaScript sources
//! - `init`: Initialize doclift configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag of the command.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Files or directories to extract (overrides `includes` from the config file)
    pub paths: Vec<PathBuf>,

    /// Prefix of the source URL recorded for every entity (overrides config file)
    #[arg(long, env = "DOCLIFT_BASE_URL")]
    pub base_url: Option<String>,

    /// Write the entity table to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Repeat relationship resolution until no entity kind changes
    #[arg(long)]
    pub fixed_point: bool,

    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract documentation entities from JavaScript sources as JSON
    Extract(ExtractCommand),
    /// Initialize a new .docliftrc.json configuration file
    Init,
}
