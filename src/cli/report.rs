//! Report formatting and printing utilities.
//!
//! The entity table goes to stdout (or a file); everything printed here goes
//! to stderr so that the JSON output stays clean.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::ExtractSummary;
use crate::core::{Collision, SourceRef};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print the summary of an `extract` run to stderr.
pub fn print_extract_summary(summary: &ExtractSummary) {
    print_extract_summary_to(summary, &mut io::stderr().lock());
}

/// Print the summary of an `extract` run to a custom writer.
pub fn print_extract_summary_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    for collision in &summary.collisions {
        print_collision(collision, writer);
    }

    let msg = format!(
        "Extracted {} {} from {} source {}",
        summary.entities,
        if summary.entities == 1 { "entity" } else { "entities" },
        summary.files,
        if summary.files == 1 { "file" } else { "files" }
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());

    if let Some(output) = &summary.output {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), output.display());
    }
}

fn print_collision<W: Write>(collision: &Collision, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} `{}` at {} overrides the definition at {}",
        "warning:".bold().yellow(),
        collision.id.bold(),
        describe_source(&collision.replacement),
        describe_source(&collision.previous),
    );
}

fn describe_source(source: &SourceRef) -> String {
    match &source.name {
        Some(name) => format!("{}:{}", name, source.line),
        None => format!("line {}", source.line),
    }
}
