use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::args::ExtractCommand;
use crate::config::{ConfigLoadResult, load_config};
use crate::core::file_scanner::scan_files;
use crate::core::{Collision, ResolutionMode, process_files};

/// What an `extract` run did, for reporting.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub files: usize,
    pub entities: usize,
    pub collisions: Vec<Collision>,
    /// File the table was written to, if not stdout.
    pub output: Option<PathBuf>,
}

pub fn extract(cmd: ExtractCommand) -> Result<ExtractSummary> {
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let ConfigLoadResult { config, root } = load_config(&current_dir)?;
    if root.is_none() {
        log::debug!("no config file found, using defaults");
    }

    // Explicit paths replace the configured includes and are relative to the
    // working directory; configured includes are relative to the config file.
    let (base_dir, includes) = if cmd.paths.is_empty() {
        let base_dir = root
            .as_deref()
            .map(|root| relative_root(&current_dir, root))
            .unwrap_or_default();
        (base_dir, config.includes.clone())
    } else {
        let paths = cmd
            .paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        (String::new(), paths)
    };
    let scan = scan_files(&base_dir, &includes, &config.ignores);
    if scan.skipped_count > 0 {
        log::warn!("{} paths could not be read", scan.skipped_count);
    }

    let mut options = config.extract_options();
    if cmd.fixed_point {
        options = options.with_resolution(ResolutionMode::FixedPoint);
    }
    let base_url = cmd.base_url.or(config.base_url);

    let result = process_files(&scan.files, &options, base_url.as_deref())?;

    let json = if cmd.compact {
        serde_json::to_string(&result.table)
    } else {
        serde_json::to_string_pretty(&result.table)
    }
    .context("Failed to serialize entities")?;

    match &cmd.output {
        Some(path) => fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(ExtractSummary {
        files: result.files,
        entities: result.table.len(),
        collisions: result.table.collisions().to_vec(),
        output: cmd.output,
    })
}

/// Path from `current_dir` up to `root`, which is one of its ancestors.
/// Empty when they are the same directory.
fn relative_root(current_dir: &Path, root: &Path) -> String {
    let depth = current_dir
        .strip_prefix(root)
        .map(|rest| {
            rest.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    vec![".."; depth].join("/")
}
